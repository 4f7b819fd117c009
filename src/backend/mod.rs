use anyhow::Result;

use crate::config::Config;

pub mod wayland;

/// Opens the sketchpad window and runs until it is closed.
pub fn run_wayland(config: Config) -> Result<()> {
    let mut backend = wayland::WaylandBackend::new(config)?;
    backend.run()
}
