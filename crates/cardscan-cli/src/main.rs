//! Cardscan CLI - ID-card face detection and landmark annotation.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = match cli.command {
        Some(Commands::Scan(args)) => run_scan(args),
        Some(Commands::Models(ref args)) => match commands::models::run(args) {
            Ok(()) => ExitCode::Success,
            Err(e) => {
                eprintln!("error: {e:#}");
                ExitCode::Error
            }
        },
        None => {
            // Default behavior: run scan with flattened args
            if cli.scan.image.is_none() {
                eprintln!("error: No image specified. Use --help for usage information.");
                return ExitCode::Error.into();
            }
            run_scan(cli.scan)
        }
    };

    exit_code.into()
}

fn run_scan(args: commands::scan::ScanArgs) -> ExitCode {
    let config = AppConfig::load();
    let args = commands::scan::ScanArgs::with_config(args, &config);
    match commands::scan::run(&args) {
        Ok(result) => result.exit_code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error
        }
    }
}
