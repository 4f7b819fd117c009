//! Configuration file support for digitpad.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/digitpad/config.toml`. Settings include canvas geometry,
//! the prediction service endpoint, result panel preferences, and rendering tuning.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod types;

// Re-export commonly used types at module level
pub use types::{ArchiveConfig, PerformanceConfig, ServiceConfig, SketchConfig, UiConfig};

use anyhow::{Context, Result};
use chrono::format::{Item, StrftimeItems};
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [sketch]
/// canvas_size = 280
/// display_size = 420
/// stroke_width = 10.0
///
/// [service]
/// base_url = "http://localhost:5000"
/// timeout_secs = 15
///
/// [ui]
/// error_toast_ms = 3000
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Canvas geometry and brush
    #[serde(default)]
    pub sketch: SketchConfig,

    /// Remote classifier endpoint and timeouts
    #[serde(default)]
    pub service: ServiceConfig,

    /// Result panel and notices
    #[serde(default)]
    pub ui: UiConfig,

    /// Performance tuning options
    #[serde(default)]
    pub performance: PerformanceConfig,

    /// Optional archive of submitted drawings
    #[serde(default)]
    pub archive: ArchiveConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `canvas_size`: 28 - 1024
    /// - `display_size`: 28 - 2048
    /// - `stroke_width`: 2.0 - 30.0
    /// - `timeout_secs`: 1 - 120, `connect_timeout_secs`: 1 - 60
    /// - `error_toast_ms`: 500 - 30000
    /// - `max_ranked`: 1 - 10
    /// - `buffer_count`: 2 - 4
    /// - `filename_template`: must be a valid chrono format string
    fn validate_and_clamp(&mut self) {
        if !(28..=1024).contains(&self.sketch.canvas_size) {
            warn!(
                "Invalid canvas_size {}, clamping to 28-1024 range",
                self.sketch.canvas_size
            );
            self.sketch.canvas_size = self.sketch.canvas_size.clamp(28, 1024);
        }

        if !(28..=2048).contains(&self.sketch.display_size) {
            warn!(
                "Invalid display_size {}, clamping to 28-2048 range",
                self.sketch.display_size
            );
            self.sketch.display_size = self.sketch.display_size.clamp(28, 2048);
        }

        if !(2.0..=30.0).contains(&self.sketch.stroke_width) {
            warn!(
                "Invalid stroke_width {:.1}, clamping to 2.0-30.0 range",
                self.sketch.stroke_width
            );
            self.sketch.stroke_width = if self.sketch.stroke_width.is_nan() {
                10.0
            } else {
                self.sketch.stroke_width.clamp(2.0, 30.0)
            };
        }

        if url::Url::parse(&self.service.predict_url()).is_err() {
            warn!(
                "Invalid service base_url '{}', falling back to '{}'",
                self.service.base_url,
                types::default_base_url()
            );
            self.service.base_url = types::default_base_url();
        }

        if !(1..=120).contains(&self.service.timeout_secs) {
            warn!(
                "Invalid timeout_secs {}, clamping to 1-120 range",
                self.service.timeout_secs
            );
            self.service.timeout_secs = self.service.timeout_secs.clamp(1, 120);
        }

        if !(1..=60).contains(&self.service.connect_timeout_secs) {
            warn!(
                "Invalid connect_timeout_secs {}, clamping to 1-60 range",
                self.service.connect_timeout_secs
            );
            self.service.connect_timeout_secs = self.service.connect_timeout_secs.clamp(1, 60);
        }

        if !(500..=30_000).contains(&self.ui.error_toast_ms) {
            warn!(
                "Invalid error_toast_ms {}, clamping to 500-30000 range",
                self.ui.error_toast_ms
            );
            self.ui.error_toast_ms = self.ui.error_toast_ms.clamp(500, 30_000);
        }

        if !(1..=10).contains(&self.ui.max_ranked) {
            warn!(
                "Invalid max_ranked {}, clamping to 1-10 range",
                self.ui.max_ranked
            );
            self.ui.max_ranked = self.ui.max_ranked.clamp(1, 10);
        }

        if !is_valid_filename_template(&self.archive.filename_template) {
            warn!(
                "Invalid archive filename_template '{}', falling back to '{}'",
                self.archive.filename_template,
                types::default_archive_template()
            );
            self.archive.filename_template = types::default_archive_template();
        }

        // Buffer count: 2 - 4
        if !(2..=4).contains(&self.performance.buffer_count) {
            warn!(
                "Invalid buffer_count {}, clamping to 2-4 range",
                self.performance.buffer_count
            );
            self.performance.buffer_count = self.performance.buffer_count.clamp(2, 4);
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/digitpad/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("digitpad");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from `config_path`, or returns defaults if the file is missing.
    ///
    /// All loaded values are validated and clamped to acceptable ranges.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or contains invalid TOML.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Creates a default configuration file with documentation comments.
    ///
    /// Writes the example config from `config.example.toml` to the user's config directory
    /// and returns the path written.
    ///
    /// # Errors
    /// Returns an error if a config file already exists or the file cannot be written.
    pub fn create_default_file() -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let default_config = include_str!("../../config.example.toml");
        fs::write(&config_path, default_config)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Created default config at {}", config_path.display());
        Ok(config_path)
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

/// True when every specifier in `template` is one chrono can format.
fn is_valid_filename_template(template: &str) -> bool {
    !template.trim().is_empty()
        && !StrftimeItems::new(template).any(|item| matches!(item, Item::Error))
}
