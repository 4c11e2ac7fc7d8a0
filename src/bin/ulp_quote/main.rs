//! Quote tool for the ULP pool.
//!
//! This binary loads a pool and vesting snapshot and prints fee-aware
//! quotes for buying, selling and swapping through the pool, or the stake
//! requirement of a vesting deposit.

mod config;
mod error;
mod quote;

use clap::Parser;
use std::process::exit;
use tracing::{error, info};
use ulp_sdk::state::Snapshot;

use config::{CliConfig, EnvConfig, Request};
use error::Result;
use quote::Quoter;

fn main() {
    // Load .env file
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Warning: Failed to load .env file: {}", e);
    }

    // Parse CLI arguments
    let cli_config = CliConfig::parse();

    let request = match cli_config.to_request() {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Invalid request: {}", e);
            exit(1);
        }
    };

    // Set up logging
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(&request) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            error!(%e, "Failed to evaluate request");
            exit(1);
        }
    }
}

fn run(request: &Request) -> Result<String> {
    let env_config = EnvConfig::from_env()?;
    quote(&env_config, request)
}

/// Loads the configured snapshot and evaluates `request` against it.
fn quote(env_config: &EnvConfig, request: &Request) -> Result<String> {
    let snapshot = Snapshot::from_path(&env_config.snapshot_path)?;
    info!(path = %env_config.snapshot_path, "Snapshot read");

    Quoter::new(snapshot, env_config.display_decimals()).run(request)
}
