// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates a cfdeploy.yml template file.

use std::path::Path;

use crate::error::{Error, Result};

use super::CONFIG_FILENAME;

const TEMPLATE: &str = r#"environments:
  - name: staging
    foundations:
      - https://api.sys.staging.example.com
    domain: apps.staging.example.com
  - name: production
    foundations:
      - https://api.sys.east.example.com
      - https://api.sys.west.example.com
    domain: apps.example.com
    instances: 2
    # Keep a failed push in place instead of restoring the previous version.
    # disable_rollback: true
    # skip_ssl: true

credentials:
  username:
    env: CF_USERNAME
  password:
    env: CF_PASSWORD

cf:
  binary: cf
  command_timeout: 10m
"#;

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, TEMPLATE)?;

    Ok(())
}
