//! aliensim HTTP server
//!
//! A standalone server binary for the Alien Simulation JSON API.

use clap::Parser;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use aliensim::config::ServerArgs;
use aliensim::transport;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerArgs::parse().into_config();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "starting aliensim server");

    transport::serve(config).await?;
    Ok(())
}
