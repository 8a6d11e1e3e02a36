use anyhow::Result;
use clap::Parser;
use std::process::exit;
use transpose::cli::Cli;
use transpose::commands;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for command output
    let default_filter = if cli.verbose {
        "transpose=debug"
    } else {
        "transpose=warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    if let Err(error) = run(cli) {
        eprintln!("Transpose Error: {error:#}");
        exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    commands::execute(cli)
}
