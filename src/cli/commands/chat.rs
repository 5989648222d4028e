//! Implementation of the `ragloom chat` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::application::AppContext;
use crate::cli::output::{output, CommandOutput};
use crate::services::StreamEvent;

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Message to send
    pub message: String,

    /// Print tokens as they arrive
    #[arg(short, long)]
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub struct ChatOutput {
    pub response: String,
}

impl CommandOutput for ChatOutput {
    fn to_human(&self) -> String {
        self.response.clone()
    }
}

pub async fn execute(args: ChatArgs, json_mode: bool, config_path: Option<&Path>) -> Result<()> {
    let (config, _logger) = super::bootstrap(config_path)?;
    let context = AppContext::build(&config).context("Failed to initialize services")?;

    if args.stream && !json_mode {
        return stream_to_stdout(&context, &args.message).await;
    }

    let response = context
        .basic_chat
        .chat(&args.message)
        .await
        .context("Chat request failed")?;
    output(&ChatOutput { response }, json_mode);
    Ok(())
}

async fn stream_to_stdout(context: &AppContext, message: &str) -> Result<()> {
    let (mut events, handle) = context.streaming.stream_events(message)?;
    let mut stdout = std::io::stdout();

    while let Some(event) = events.recv().await {
        match event {
            StreamEvent::Token(token) => {
                write!(stdout, "{token}")?;
                stdout.flush()?;
            }
            StreamEvent::Complete(_) => writeln!(stdout)?,
            StreamEvent::Error(_) => break,
        }
    }

    handle.wait().await.context("Streaming chat failed")?;
    Ok(())
}
