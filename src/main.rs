//! bler-sweep CLI entry point.

use clap::Parser;

use bler_sweep::cli::{commands, handle_error, Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args, config_path, cli.json).await,
        Commands::Codes(args) => commands::codes::execute(args, cli.json),
        Commands::Config(args) => commands::config::execute(args, config_path, cli.json),
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
