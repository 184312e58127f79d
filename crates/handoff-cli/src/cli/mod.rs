//! CLI for the handoff credential relay.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use handoff_core::config;

use commands::{run_listen, run_send};

/// Top-level CLI for the handoff credential relay.
#[derive(Debug, Parser)]
#[command(name = "handoff")]
#[command(about = "Relay URL-fragment credentials to a loopback collector", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Parse a fragment and POST it to the collector as JSON.
    Send {
        /// Fragment to deliver, with or without the leading '#'.
        #[arg(required_unless_present = "from_url")]
        fragment: Option<String>,

        /// Extract the fragment from a full redirect URL instead.
        #[arg(long, value_name = "URL", conflicts_with = "fragment")]
        from_url: Option<String>,

        /// Collector endpoint (overrides the configured one).
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,

        /// Abort the request after N seconds instead of waiting forever.
        #[arg(long, value_name = "N")]
        timeout_secs: Option<u64>,
    },

    /// Wait for one payload POSTed by the hand-off page and print it.
    Listen {
        /// Loopback port to bind (overrides the configured one).
        #[arg(long)]
        port: Option<u16>,

        /// Key allowed in the payload; may be repeated. With at least one,
        /// a payload carrying any other key is rejected after receipt.
        #[arg(long = "expect-key", value_name = "KEY")]
        expect_keys: Vec<String>,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Send {
                fragment,
                from_url,
                endpoint,
                timeout_secs,
            } => run_send(
                &cfg,
                fragment.as_deref(),
                from_url.as_deref(),
                endpoint.as_deref(),
                timeout_secs,
            ),
            CliCommand::Listen { port, expect_keys } => run_listen(&cfg, port, &expect_keys),
        }
    }
}

#[cfg(test)]
mod tests;
