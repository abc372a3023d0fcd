mod cmd;
mod json_schema;

use clap::Parser;
use cmd::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = cmd::run(cli) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

/// Log to stderr so stdout stays clean for DOT, DDL and JSON
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "erd_viewer=warn",
        1 => "erd_viewer=info",
        _ => "erd_viewer=debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
