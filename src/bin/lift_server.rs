//! Elevator simulation server.
//!
//! Runs the dispatch loop on real time and exposes it over HTTP.
//!
//! # Usage
//!
//! ```sh
//! cargo run --bin lift_server
//! ```
//!
//! # Environment
//!
//! - `LIFT_CONFIG` - path to a TOML config file (defaults are used when unset)
//! - `PORT` - overrides `web.port`
//! - `RUST_LOG` - log filter (default `info`)

use std::sync::Arc;

use anyhow::Context;
use log::info;

use lift_sim::hal::TokioTimer;
use lift_sim::services::{run_server, WebServerConfig};
use lift_sim::{Config, ElevatorController};

fn load_config() -> anyhow::Result<Config> {
    let mut config = match std::env::var("LIFT_CONFIG") {
        Ok(path) => {
            Config::load(&path).with_context(|| format!("loading config from {}", path))?
        }
        Err(_) => Config::default(),
    };

    if let Ok(port) = std::env::var("PORT") {
        config.web.port = port
            .parse()
            .with_context(|| format!("PORT must be a port number, got {:?}", port))?;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    info!(
        "car at floor {}, bounds {:?}..{:?}",
        config.elevator.home_floor, config.elevator.min_floor, config.elevator.max_floor
    );

    let controller = Arc::new(
        ElevatorController::try_new(config.elevator.clone(), TokioTimer::new())
            .context("invalid elevator configuration")?,
    );

    let web_config = WebServerConfig::from_config(&config.web);
    run_server(controller, web_config)
        .await
        .context("web server failed")
}
