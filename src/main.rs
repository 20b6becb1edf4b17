//! Load balancer rule updater.
//!
//! Adds a port rule for the requested service to a load balancer managed by a
//! remote control plane, then answers with the public `hostname:port`.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                      LB UPDATER                      │
//!  GET /{svc}     │  ┌─────────┐    ┌────────────────────────────────┐   │
//!  ───────────────┼─▶│  http   │───▶│        control_plane           │───┼──▶ GET lb
//!                 │  │ server  │    │   fetch existing config        │◀──┼─── Control
//!                 │  └────┬────┘    └────────────────────────────────┘   │    Plane
//!                 │       ▼                                              │
//!                 │  ┌──────────────────────────────────────────────┐    │
//!                 │  │                 reconcile                    │    │
//!                 │  │  sanitizer (prune + dedup) → merge (+ rule)  │    │
//!                 │  └────┬─────────────────────────────────────────┘    │
//!                 │       ▼                                              │
//!  hostname:port  │  ┌─────────┐    ┌────────────────────────────────┐   │
//!  ◀──────────────┼──│response │◀───│ control_plane submit merged    │───┼──▶ PUT lb
//!                 │  └─────────┘    └────────────────────────────────┘   │
//!                 │                                                      │
//!                 │   config · observability · lifecycle                 │
//!                 └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use lb_updater::config::load_config;
use lb_updater::lifecycle::startup;
use lb_updater::observability::logging;

#[derive(Parser)]
#[command(name = "lb-updater")]
#[command(about = "Adds port rules to a control-plane managed load balancer", long_about = None)]
struct Args {
    /// Optional TOML config file; environment variables override it.
    #[arg(short, long, env = "LB_UPDATER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging("info");
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("lb-updater v{} starting", env!("CARGO_PKG_VERSION"));

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
