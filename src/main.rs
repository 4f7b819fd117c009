use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use clap::{ArgAction, Parser};

use digitpad::archive::SampleArchive;
use digitpad::config::Config;
use digitpad::draw::SketchSurface;
use digitpad::predict::{HttpPredictionService, PredictionService, encode_sketch};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("DIGITPAD_GIT_HASH"),
    ")\ndefault endpoint: ",
    env!("DIGITPAD_DEFAULT_ENDPOINT")
);

#[derive(Parser, Debug)]
#[command(name = "digitpad")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Handwritten digit sketchpad backed by a remote classifier")]
struct Cli {
    /// Classify a PNG image without opening a window and print the result
    #[arg(long, value_name = "PNG", conflicts_with_all = ["check", "init_config"])]
    submit: Option<PathBuf>,

    /// Query the prediction service's health endpoint
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "init_config")]
    check: bool,

    /// Write a documented config file to ~/.config/digitpad/config.toml
    #[arg(long, action = ArgAction::SetTrue)]
    init_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.init_config {
        let path = Config::create_default_file()?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let config = Config::load().context("Failed to load configuration")?;

    if let Some(path) = cli.submit {
        return submit_png(&config, &path);
    }

    if cli.check {
        return check_service(&config);
    }

    if std::env::var("WAYLAND_DISPLAY").is_err() {
        log::error!("WAYLAND_DISPLAY not set - the sketchpad window requires Wayland.");
        log::error!("Use --submit <PNG> to classify an image without a window.");
        return Err(anyhow!(
            "WAYLAND_DISPLAY not set; run inside a Wayland session or use --submit"
        ));
    }

    log::info!("Starting digit sketchpad...");
    log::info!("Controls:");
    log::info!("  - Draw: drag with the mouse or a finger");
    log::info!("  - Brush size: scroll");
    log::info!("  - Clear / Predict: buttons beside the canvas");
    log::info!("  - Exit: Escape");

    digitpad::backend::run_wayland(config)?;

    log::info!("Sketchpad closed.");
    Ok(())
}

/// Headless path: load a PNG into a canvas-sized bitmap and run one prediction.
fn submit_png(config: &Config, path: &Path) -> anyhow::Result<()> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let size = config.sketch.canvas_size;
    let sketch = SketchSurface::from_png(
        &mut BufReader::new(file),
        size,
        size,
        config.sketch.stroke_width,
    )
    .with_context(|| format!("Failed to load {} as PNG", path.display()))?;

    let png = encode_sketch(&sketch)?;
    if let Some(archive) = SampleArchive::from_config(&config.archive) {
        match archive.save(&png) {
            Ok(saved) => log::info!("Archived submission to {}", saved.display()),
            Err(e) => log::warn!("Failed to archive submission: {}", e),
        }
    }

    let service = HttpPredictionService::new(&config.service)?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;

    match runtime.block_on(service.predict(png)) {
        Ok(prediction) => {
            println!("{}", prediction.summary(config.ui.max_ranked));
            Ok(())
        }
        Err(e) => {
            log::warn!("Prediction failed: {}", e);
            Err(anyhow!(e.user_message()))
        }
    }
}

fn check_service(config: &Config) -> anyhow::Result<()> {
    let service = HttpPredictionService::new(&config.service)?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;

    let status = runtime
        .block_on(service.check_health())
        .with_context(|| format!("Health check against {} failed", config.service.health_url()))?;

    println!("{status}");
    if status.is_ok() {
        Ok(())
    } else {
        Err(anyhow!("Prediction service reported an unhealthy status"))
    }
}
