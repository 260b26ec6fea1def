// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cfdeploy")]
#[command(about = "Blue-green deployments across multiple Cloud Foundry foundations")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (default: discovered in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new cfdeploy.yml configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// List configured environments and their foundations
    Environments,

    /// Push a new version of an app to every foundation (blue-green)
    Push {
        #[command(flatten)]
        target: TargetArgs,

        /// Directory or archive to push
        #[arg(short, long)]
        path: PathBuf,

        /// Number of instances (default: the environment's setting)
        #[arg(short, long)]
        instances: Option<u16>,

        /// Route hostname on the environment's domain (default: app name)
        #[arg(long)]
        hostname: Option<String>,
    },

    /// Start an app on every foundation
    Start {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Stop an app on every foundation
    Stop {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Delete an app from every foundation
    Delete {
        #[command(flatten)]
        target: TargetArgs,
    },
}

/// Where an operation runs and on which app.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Environment name (defined in config)
    #[arg(short, long)]
    pub environment: String,

    /// Organization
    #[arg(short, long)]
    pub org: String,

    /// Space
    #[arg(short, long)]
    pub space: String,

    /// Application name
    #[arg(short, long)]
    pub app: String,
}
