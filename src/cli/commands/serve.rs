//! Implementation of the `ragloom serve` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;
use tracing::{info, warn};

use crate::application::AppContext;
use crate::infrastructure::http;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,
}

pub async fn execute(args: ServeArgs, config_path: Option<&Path>) -> Result<()> {
    let (mut config, _logger) = super::bootstrap(config_path)?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }

    let context = AppContext::build(&config).context("Failed to initialize services")?;
    info!(
        ollama = %config.ollama.base_url,
        chat_model = %config.ollama.chat_model,
        "starting ragloom server"
    );

    http::serve_with_shutdown(context.http_state(), &config.server, shutdown_signal()).await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => {
            warn!(error = %err, "cannot listen for ctrl-c; serving until killed");
            std::future::pending::<()>().await;
        }
    }
}
