// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wahub - a multi-tenant WhatsApp session control plane.
//!
//! This is the CLI entry point. The session manager itself is a library
//! surface (`wahub-session`); the binary covers operational tooling:
//! config inspection, tenant status, and environment diagnostics.

mod doctor;
mod status;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Wahub - a multi-tenant WhatsApp session control plane.
#[derive(Parser, Debug)]
#[command(name = "wahub", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the configuration and print a summary.
    Config,
    /// Show per-tenant session counters and settings.
    Status {
        /// Limit output to one tenant.
        #[arg(long)]
        tenant: Option<String>,
        /// Emit structured JSON for scripting.
        #[arg(long)]
        json: bool,
    },
    /// Run environment diagnostics against the data directory.
    Doctor,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match wahub_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            eprintln!("wahub: configuration errors:");
            eprintln!("{}", wahub_config::render_errors(&errors));
            std::process::exit(1);
        }
    };

    // RUST_LOG wins; the config level is the fallback.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.hub.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Some(Commands::Config) => {
            println!("wahub: configuration OK");
            println!("  hub.name                     = {}", config.hub.name);
            println!("  hub.log_level                = {}", config.hub.log_level);
            println!("  storage.data_dir             = {}", config.storage.data_dir);
            println!("  session.max_tenants          = {}", config.session.max_tenants);
            println!(
                "  session.shutdown_timeout_secs = {}",
                config.session.shutdown_timeout_secs
            );
            Ok(())
        }
        Some(Commands::Status { tenant, json }) => {
            status::run_status(&config, tenant.as_deref(), json).await
        }
        Some(Commands::Doctor) => doctor::run_doctor(&config).await,
        None => {
            println!("wahub: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("wahub: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        super::Cli::command().debug_assert();
    }
}
