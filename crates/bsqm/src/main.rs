//! bsqm - Beat Saber Quest modding CLI
//!
//! Entry point: argument parsing, logging setup and command dispatch.

mod cli;
mod commands;
mod output;
mod prompter;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    // Initialize rustls crypto provider before any TLS operations
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Configure(args) => commands::configure::run(args, config).await,
        Commands::Create(args) => commands::create::run(args, config).await,
        Commands::Build(args) => commands::build::run(args, config).await,
        Commands::Doctor(args) => commands::doctor::run(args, config),
        Commands::Config(cmd) => commands::config::run(cmd, config),
    };

    if let Err(e) = result {
        output::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
