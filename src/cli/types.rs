//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::{chat::ChatArgs, demo::DemoArgs, serve::ServeArgs};

#[derive(Parser)]
#[command(name = "ragloom")]
#[command(about = "Ragloom - LLM gateway with memory, RAG, templates and tools", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ragloom.yaml + ragloom.local.yaml)
    #[arg(short, long, global = true, env = "RAGLOOM_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server
    Serve(ServeArgs),

    /// Run the feature demonstrations against the configured models
    Demo(DemoArgs),

    /// Send a single chat message and print the reply
    Chat(ChatArgs),
}
