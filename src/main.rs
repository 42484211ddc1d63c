use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use paypalctl::cli::{self, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logging is driven by RUST_LOG, or turned up for our own crate with --verbose.
    let mut filter = EnvFilter::from_default_env();
    if cli.verbose {
        if let Ok(directive) = "paypalctl=debug".parse() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(error) = cli::run(cli).await {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
