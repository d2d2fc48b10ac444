mod config;
mod handler;
mod logging;
mod metrics;

use anyhow::Result;
use clap::Parser;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::config::ProxyConfig;
use crate::handler::state::ProxyState;

#[derive(Parser, Debug)]
#[command(version, about)]
pub(crate) struct Args {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(long)]
    config_file: Option<String>,

    /// Overrides the port from the configuration file.
    #[arg(long)]
    port: Option<u16>,

    #[arg(long, default_value = "info")]
    log_level: String,

    #[arg(long, action)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init(&args)?;

    let mut config = ProxyConfig::load(args.config_file.as_deref())?;
    if let Some(port) = args.port {
        config.port = port;
    }

    config.validate()?;

    if let Some(metrics_port) = config.metrics_port {
        let loopback_address = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));
        metrics::init(SocketAddr::new(loopback_address, metrics_port))?;
    }

    let state = ProxyState::new(config.clone())?;

    let proxy_socket_addr = SocketAddr::new(config.bind_address, config.port);

    let listener = tokio::net::TcpListener::bind(proxy_socket_addr).await?;

    tracing::info!("Serving at http://localhost:{}", config.port);
    tracing::info!(
        "Proxy endpoint available at http://localhost:{}{}?url=...",
        config.port,
        config.proxy_prefix,
    );

    axum::serve(listener, handler::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(?error, "Couldn't listen for Ctrl-C.");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!(?error, "Couldn't listen for SIGTERM.");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C, draining connections."),
        _ = terminate => tracing::info!("Received SIGTERM, draining connections."),
    }
}
