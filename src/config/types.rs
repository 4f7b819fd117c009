//! Configuration type definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Sketch canvas settings.
///
/// The canvas is a fixed-size raster; `display_size` is how large it appears
/// on screen, so pointer coordinates are scaled by `canvas_size / display_size`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SketchConfig {
    /// Backing-store edge length in pixels (valid range: 28 - 1024)
    #[serde(default = "default_canvas_size")]
    pub canvas_size: u32,

    /// On-screen edge length of the canvas in logical pixels (valid range: 28 - 2048)
    #[serde(default = "default_display_size")]
    pub display_size: u32,

    /// Brush width in backing-store pixels (valid range: 2.0 - 30.0)
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            canvas_size: default_canvas_size(),
            display_size: default_display_size(),
            stroke_width: default_stroke_width(),
        }
    }
}

/// Remote prediction service settings.
///
/// `base_url` defaults to the endpoint chosen at build time (see `build.rs`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ServiceConfig {
    /// Base URL of the classifier, e.g. `https://digit-classifier-backend.onrender.com`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path appended to `base_url` for predictions
    #[serde(default = "default_predict_path")]
    pub predict_path: String,

    /// Path appended to `base_url` for the health check
    #[serde(default = "default_health_path")]
    pub health_path: String,

    /// Whole-request timeout in seconds (valid range: 1 - 120)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds (valid range: 1 - 60)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            predict_path: default_predict_path(),
            health_path: default_health_path(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl ServiceConfig {
    /// Full URL of the prediction endpoint.
    pub fn predict_url(&self) -> String {
        join_url(&self.base_url, &self.predict_path)
    }

    /// Full URL of the health endpoint.
    pub fn health_url(&self) -> String {
        join_url(&self.base_url, &self.health_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

/// Result panel and notice preferences.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UiConfig {
    /// Font family used for the result panel (e.g., "Sans", "Inter")
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// How long the error notice stays visible, in milliseconds (valid range: 500 - 30000)
    #[serde(default = "default_error_toast_ms")]
    pub error_toast_ms: u64,

    /// Also send a desktop notification when a prediction fails
    #[serde(default)]
    pub desktop_notifications: bool,

    /// Maximum number of ranked alternatives shown (valid range: 1 - 10)
    #[serde(default = "default_max_ranked")]
    pub max_ranked: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            error_toast_ms: default_error_toast_ms(),
            desktop_notifications: false,
            max_ranked: default_max_ranked(),
        }
    }
}

/// Performance tuning options.
///
/// These settings control rendering performance and smoothness. Most users
/// won't need to change these from their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PerformanceConfig {
    /// Number of buffers for buffering (valid range: 2 - 4)
    /// - 2 = double buffering (lower memory, potential tearing)
    /// - 3 = triple buffering (balanced, recommended)
    /// - 4 = quad buffering (highest memory, smoothest)
    #[serde(default = "default_buffer_count")]
    pub buffer_count: u32,

    /// Enable vsync frame synchronization to prevent tearing
    /// Set to false for lower latency at the cost of potential screen tearing
    #[serde(default = "default_enable_vsync")]
    pub enable_vsync: bool,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            buffer_count: default_buffer_count(),
            enable_vsync: default_enable_vsync(),
        }
    }
}

/// Local archive of submitted drawings.
///
/// When enabled, every image sent to the service is also written to disk,
/// which is handy for collecting samples.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArchiveConfig {
    /// Save each submitted PNG
    #[serde(default)]
    pub enabled: bool,

    /// Target directory (supports `~/`)
    #[serde(default = "default_archive_directory")]
    pub directory: String,

    /// Filename template (chrono format specifiers, `.png` is appended)
    #[serde(default = "default_archive_template")]
    pub filename_template: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: default_archive_directory(),
            filename_template: default_archive_template(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_canvas_size() -> u32 {
    280
}

fn default_display_size() -> u32 {
    420
}

fn default_stroke_width() -> f64 {
    10.0
}

pub(crate) fn default_base_url() -> String {
    env!("DIGITPAD_DEFAULT_ENDPOINT").to_string()
}

fn default_predict_path() -> String {
    "/predict".to_string()
}

fn default_health_path() -> String {
    "/test".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_font_family() -> String {
    "Sans".to_string()
}

fn default_error_toast_ms() -> u64 {
    3000
}

fn default_max_ranked() -> usize {
    3
}

fn default_buffer_count() -> u32 {
    3
}

fn default_enable_vsync() -> bool {
    true
}

fn default_archive_directory() -> String {
    "~/Pictures/Digitpad".to_string()
}

pub(crate) fn default_archive_template() -> String {
    "digit_%Y-%m-%d_%H%M%S".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_handles_slashes() {
        assert_eq!(
            join_url("http://localhost:5000/", "/predict"),
            "http://localhost:5000/predict"
        );
        assert_eq!(
            join_url("http://localhost:5000", "predict"),
            "http://localhost:5000/predict"
        );
        assert_eq!(join_url("http://host/api", ""), "http://host/api");
    }

    #[test]
    fn service_urls_use_paths() {
        let service = ServiceConfig {
            base_url: "https://example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(service.predict_url(), "https://example.com/predict");
        assert_eq!(service.health_url(), "https://example.com/test");
    }
}
