//! Cisco plugin configuration checker.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Init logger at `CISCO_PLUGIN_LOG_LEVEL` (default `info`)
//!   3. Load and validate the configuration file
//!   4. Print the resolved configuration as JSON, secrets redacted

use cisco_plugin_config::{config, error::AppError, logger};
use tracing::info;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    // .env is optional.
    let _ = dotenvy::dotenv();

    let level = std::env::var("CISCO_PLUGIN_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    logger::init(&level)?;

    let path = std::env::args().nth(1);
    let cfg = config::load(path.as_deref())?;

    for (address, credential) in &cfg.credentials {
        info!(%address, username = %credential.username, "VSM credential");
    }
    for (address, switch) in &cfg.nexus_switches {
        info!(%address, ssh_port = switch.ssh_port, hosts = switch.host_ports.len(), "nexus switch");
    }

    let json = serde_json::to_string_pretty(&cfg)?;
    println!("{json}");
    println!("✓ configuration valid");

    Ok(())
}
