// ABOUTME: Environments command implementation.
// ABOUTME: Lists configured environments with their foundations and policy flags.

use cfdeploy::config::Config;
use cfdeploy::error::Result;

pub fn list_environments(config: &Config) -> Result<()> {
    for env in &config.environments {
        let mut flags = Vec::new();
        if env.disable_rollback {
            flags.push("rollback disabled");
        }
        if env.skip_ssl {
            flags.push("skip ssl");
        }

        println!(
            "{} ({} instance(s){}{})",
            env.name,
            env.instances,
            if flags.is_empty() { "" } else { ", " },
            flags.join(", ")
        );
        if let Some(ref domain) = env.domain {
            println!("  domain: {domain}");
        }
        for foundation in env.foundations.iter() {
            println!("  - {foundation}");
        }
    }
    Ok(())
}
