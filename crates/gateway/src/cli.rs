use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};

use sf_domain::config::Config;

/// Shopfront — a chat-based storefront gateway.
#[derive(Debug, Parser)]
#[command(name = "shopfront", version, about)]
pub struct Cli {
    /// Path to the config file.
    #[arg(long, default_value = "config.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the gateway server (default when no subcommand is given).
    Serve,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

/// Load the config file, falling back to defaults when it is absent.
pub fn load_config(path: &str) -> anyhow::Result<Config> {
    if !Path::new(path).exists() {
        tracing::info!(path = %path, "config file not found, using defaults");
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    toml::from_str(&raw).with_context(|| format!("parsing {path}"))
}
