//! Ragloom CLI entry point.

use clap::Parser;

use ragloom::cli::commands::{chat, demo, serve};
use ragloom::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Serve(args) => serve::execute(args, config_path).await,
        Commands::Demo(args) => demo::execute(args, cli.json, config_path).await,
        Commands::Chat(args) => chat::execute(args, cli.json, config_path).await,
    };

    if let Err(err) = result {
        ragloom::cli::handle_error(err, cli.json);
    }
}
