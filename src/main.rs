use anyhow::Result;
use clap::Parser;

use lazytree::browser;
use lazytree::cli::Cli;

fn main() -> Result<()> {
    let cli_args = Cli::parse();
    setup_tracing(&cli_args);

    browser::run(cli_args)
}

fn setup_tracing(cli_args: &Cli) {
    let level = match cli_args.verbose {
        0 => return,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();
}
