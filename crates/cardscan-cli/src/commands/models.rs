//! Models command - manage ML models.

use std::time::Duration;

use anyhow::Result;
use cardscan_adapters::models::{ensure_models, list_models as adapter_list_models, models_dir, MODELS};
use clap::{Args, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

/// Arguments for the models command
#[derive(Args)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Models subcommands
#[derive(Subcommand)]
pub enum ModelsCommand {
    /// Download required models
    Fetch,
    /// List installed models
    List,
    /// Print model directory path
    Path,
}

/// Run the models command.
pub fn run(args: &ModelsArgs) -> Result<()> {
    match args.command {
        ModelsCommand::Fetch => fetch_models(),
        ModelsCommand::List => list_models(),
        ModelsCommand::Path => print_path(),
    }
}

fn fetch_models() -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .map_err(|e| anyhow::anyhow!("Invalid progress template: {e}"))?,
    );
    spinner.set_message("Downloading models...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = ensure_models();
    match result {
        Ok(()) => {
            spinner.finish_with_message("All models downloaded");
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            Err(e)
        }
    }
}

#[allow(clippy::unnecessary_wraps)]
fn list_models() -> Result<()> {
    let models = adapter_list_models();
    let dir = models_dir();

    println!("Models directory: {}", dir.display());
    println!();

    for (name, installed) in &models {
        let status = if *installed { "✓" } else { "✗" };
        let info = MODELS.iter().find(|m| m.name == name);
        let filename = info.map_or("unknown", |m| m.filename);
        println!("  {status} {name} ({filename})");
    }

    println!();
    let installed_count = models.iter().filter(|(_, installed)| *installed).count();
    println!("{}/{} models installed", installed_count, models.len());

    Ok(())
}

#[allow(clippy::unnecessary_wraps)]
fn print_path() -> Result<()> {
    let path = models_dir();
    println!("{}", path.display());
    Ok(())
}
