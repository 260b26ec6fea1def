// ABOUTME: Library root for cfdeploy - blue-green deployments across foundations.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod courier;
pub mod deploy;
pub mod error;
pub mod hooks;
pub mod output;
pub mod strategy;
pub mod types;
