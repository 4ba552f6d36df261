//! Configuration file support for cardscan.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/cardscan/config.toml` (lowest priority)
//! - Project-local: `.cardscan.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Detection engine tunables.
    pub engine: EngineConfig,
    /// Model settings.
    pub models: ModelsConfig,
    /// Output settings.
    pub output: OutputConfig,
}

/// Detection engine configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum detection confidence (0.0-1.0).
    pub score_threshold: Option<f32>,
    /// IoU threshold for non-maximum suppression (0.0-1.0).
    pub nms_threshold: Option<f32>,
}

/// Model configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Custom models directory path.
    pub dir: Option<PathBuf>,
}

/// Output configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where to write the annotated image.
    pub path: Option<PathBuf>,
    /// Print a JSON detection report to stdout.
    pub json: Option<bool>,
    /// Suppress status output.
    pub quiet: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/cardscan/config.toml`
    /// 2. Project-local: `.cardscan.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        // Load XDG config (lowest priority)
        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        // Load project-local config (higher priority, merged)
        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        // Validate merged config
        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    fn validate(&self) -> Result<(), String> {
        if let Some(t) = self.engine.score_threshold {
            if !(0.0..=1.0).contains(&t) {
                return Err(format!("engine.score_threshold must be 0.0-1.0, got {t}"));
            }
        }
        if let Some(t) = self.engine.nms_threshold {
            if !(0.0..=1.0).contains(&t) {
                return Err(format!("engine.nms_threshold must be 0.0-1.0, got {t}"));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        self.engine.score_threshold = other
            .engine
            .score_threshold
            .or(self.engine.score_threshold);
        self.engine.nms_threshold = other.engine.nms_threshold.or(self.engine.nms_threshold);

        self.models.dir = other.models.dir.or_else(|| self.models.dir.take());

        self.output.path = other.output.path.or_else(|| self.output.path.take());
        self.output.json = other.output.json.or(self.output.json);
        self.output.quiet = other.output.quiet.or(self.output.quiet);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cardscan").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.cardscan.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".cardscan.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
