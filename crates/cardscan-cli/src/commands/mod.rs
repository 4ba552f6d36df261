//! CLI command definitions and handlers.

pub mod models;
pub mod scan;

use clap::{Parser, Subcommand};

/// Cardscan - ID-card face detection and landmark annotation
#[derive(Parser)]
#[command(name = "cardscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared scan arguments (image, thresholds, output flags).
    #[command(flatten)]
    pub scan: scan::ScanArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Detect faces in an ID-card image and render the annotated result
    Scan(scan::ScanArgs),
    /// Manage ML models
    Models(models::ModelsArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Faces were detected and the annotated image was written.
    Success,
    /// The image was processed but contained no detectable face.
    NoFaces,
    /// Loading, decoding, or detection failed.
    Error,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        match code {
            ExitCode::Success => Self::from(0),
            ExitCode::NoFaces => Self::from(1),
            ExitCode::Error => Self::from(2),
        }
    }
}
