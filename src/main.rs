// ABOUTME: Entry point for the cfdeploy CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use cfdeploy::config::{self, Config};
use cfdeploy::error::{Error, Result};
use cfdeploy::output::{Output, OutputMode};
use cfdeploy::strategy::PushOptions;
use clap::Parser;
use cli::{Cli, Commands};
use commands::DeployRequest;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    let result = run(cli, Output::new(mode)).await;

    if let Err(e) = result {
        // Deployment failures were already reported by the command.
        if !matches!(e, Error::Deploy(_)) {
            Output::new(mode).error(&e.to_string());
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    let cwd = env::current_dir()?;

    match cli.command {
        Commands::Init { force } => {
            config::init_config(&cwd, force)?;
            output.success(&format!("Created {}", config::CONFIG_FILENAME));
            Ok(())
        }
        Commands::Environments => {
            let config = load_config(cli.config.as_deref(), &cwd)?;
            commands::list_environments(&config)
        }
        Commands::Push {
            target,
            path,
            instances,
            hostname,
        } => {
            let config = load_config(cli.config.as_deref(), &cwd)?;
            let request = DeployRequest::Push {
                target,
                options: PushOptions {
                    artifact: path,
                    instances,
                    hostname,
                },
            };
            commands::deploy(config, request, output).await
        }
        Commands::Start { target } => {
            let config = load_config(cli.config.as_deref(), &cwd)?;
            commands::deploy(config, DeployRequest::Start(target), output).await
        }
        Commands::Stop { target } => {
            let config = load_config(cli.config.as_deref(), &cwd)?;
            commands::deploy(config, DeployRequest::Stop(target), output).await
        }
        Commands::Delete { target } => {
            let config = load_config(cli.config.as_deref(), &cwd)?;
            commands::deploy(config, DeployRequest::Delete(target), output).await
        }
    }
}

fn load_config(path: Option<&std::path::Path>, cwd: &std::path::Path) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::discover(cwd),
    }
}
