//! Scan command - detect faces in an ID-card image and render annotations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use cardscan_adapters::{model_path, set_models_dir, FsImageDecoder, RasterSurface};
use cardscan_core::inference::{CandleEngineProvider, EngineConfig};
use cardscan_core::{Pipeline, RunOutcome};
use clap::Args;
use tracing::{debug, info};

use super::ExitCode;
use crate::config::AppConfig;
use crate::output::{ConsoleStatus, ScanReport};

/// Parse and validate a threshold value (0.0-1.0).
fn parse_threshold(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not in 0.0..=1.0"))
    }
}

/// Shared arguments for scanning an image.
#[derive(Args, Clone)]
pub struct ScanArgs {
    /// ID-card image to scan
    pub image: Option<PathBuf>,

    /// Where to write the annotated image (default: <IMAGE>.annotated.png)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print a JSON detection report to stdout
    #[arg(long)]
    pub json: bool,

    /// Suppress status output
    #[arg(short, long)]
    pub quiet: bool,

    /// Minimum detection confidence (0.0-1.0)
    #[arg(long, value_parser = parse_threshold)]
    pub score_threshold: Option<f32>,

    /// IoU threshold for non-maximum suppression (0.0-1.0)
    #[arg(long, value_parser = parse_threshold)]
    pub nms_threshold: Option<f32>,

    /// Custom models directory (overrides default and config)
    #[arg(long, value_name = "DIR")]
    pub models_dir: Option<PathBuf>,
}

impl ScanArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Engine defaults
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        args.score_threshold = args.score_threshold.or(config.engine.score_threshold);
        args.nms_threshold = args.nms_threshold.or(config.engine.nms_threshold);

        if args.output.is_none() {
            args.output.clone_from(&config.output.path);
        }
        if !args.json {
            args.json = config.output.json.unwrap_or(false);
        }
        if !args.quiet {
            args.quiet = config.output.quiet.unwrap_or(false);
        }

        if args.models_dir.is_none() {
            args.models_dir.clone_from(&config.models.dir);
        }

        args
    }

    /// Engine tunables from merged args, falling back to engine defaults.
    fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::default();
        if let Some(t) = self.score_threshold {
            config.score_threshold = t;
        }
        if let Some(t) = self.nms_threshold {
            config.nms_threshold = t;
        }
        config
    }
}

/// Result of running the scan command.
#[allow(dead_code)] // Fields exposed for programmatic use
pub struct ScanResult {
    /// Number of faces detected.
    pub faces: usize,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the scan command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &ScanArgs) -> Result<ScanResult> {
    let image = args
        .image
        .as_deref()
        .context("No image specified")?;

    // Apply models directory override if specified
    if let Some(ref models_dir) = args.models_dir {
        debug!("Using custom models directory: {}", models_dir.display());
        set_models_dir(Some(models_dir.clone()));
    }

    let locator = model_path("face_locator").context("unknown model configuration")?;
    let landmarks = model_path("landmarks68").context("unknown model configuration")?;
    for path in [&locator, &landmarks] {
        if !path.exists() {
            anyhow::bail!(
                "Model file {} not found. Run `cardscan models fetch`.",
                path.display()
            );
        }
    }

    let provider = CandleEngineProvider::new(locator, landmarks).with_config(args.engine_config());
    let sink = Arc::new(ConsoleStatus::new(args.quiet));

    let mut pipeline = Pipeline::new(
        Box::new(provider),
        Box::new(FsImageDecoder),
        RasterSurface::new(),
        sink,
    );

    if !pipeline.load_models() {
        return Ok(ScanResult {
            faces: 0,
            exit_code: ExitCode::Error,
        });
    }

    let outcome = pipeline.process(image);
    let output = output_path(image, args.output.as_deref());

    match outcome {
        RunOutcome::Rendered(detections) => {
            pipeline.surface().save(&output)?;
            info!("annotated image written to {}", output.display());
            if args.json {
                let (width, height) = pipeline.surface().dimensions();
                ScanReport::new(image, width, height, &detections).print()?;
            }
            Ok(ScanResult {
                faces: detections.len(),
                exit_code: ExitCode::Success,
            })
        }
        RunOutcome::NoFaces => {
            // The plain image is still written so the result is inspectable.
            pipeline.surface().save(&output)?;
            if args.json {
                let (width, height) = pipeline.surface().dimensions();
                ScanReport::new(image, width, height, &[]).print()?;
            }
            Ok(ScanResult {
                faces: 0,
                exit_code: ExitCode::NoFaces,
            })
        }
        RunOutcome::Failed | RunOutcome::NotReady | RunOutcome::Busy => Ok(ScanResult {
            faces: 0,
            exit_code: ExitCode::Error,
        }),
    }
}

/// The annotated output location: explicit path, or `<stem>.annotated.png`
/// next to the input.
fn output_path(image: &Path, explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let stem = image
        .file_stem()
        .map_or_else(|| "scan".into(), |s| s.to_string_lossy().into_owned());
    image.with_file_name(format!("{stem}.annotated.png"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_threshold_accepts_bounds() {
        assert_eq!(parse_threshold("0.0").unwrap(), 0.0);
        assert_eq!(parse_threshold("1.0").unwrap(), 1.0);
        assert_eq!(parse_threshold("0.6").unwrap(), 0.6);
    }

    #[test]
    fn test_parse_threshold_rejects_out_of_range() {
        assert!(parse_threshold("1.5").is_err());
        assert!(parse_threshold("-0.1").is_err());
        assert!(parse_threshold("abc").is_err());
    }

    #[test]
    fn test_output_path_defaults_next_to_input() {
        let path = output_path(Path::new("/cards/front.jpg"), None);
        assert_eq!(path, PathBuf::from("/cards/front.annotated.png"));
    }

    #[test]
    fn test_output_path_explicit_wins() {
        let path = output_path(Path::new("/cards/front.jpg"), Some(Path::new("/tmp/out.png")));
        assert_eq!(path, PathBuf::from("/tmp/out.png"));
    }
}
