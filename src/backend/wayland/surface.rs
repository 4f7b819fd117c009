//! Manages layer-surface state and shared memory buffers for the Wayland backend.

use anyhow::{Context, Result};
use log::info;
use smithay_client_toolkit::{
    shell::wlr_layer::LayerSurface,
    shm::{Shm, slot::SlotPool},
};

/// Tracks the layer surface, buffer pool, and the size the compositor granted.
pub struct SurfaceState {
    layer_surface: Option<LayerSurface>,
    pool: Option<SlotPool>,
    width: u32,
    height: u32,
    configured: bool,
    frame_callback_pending: bool,
}

impl SurfaceState {
    /// Creates an unconfigured surface state that expects `width` x `height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            layer_surface: None,
            pool: None,
            width,
            height,
            configured: false,
            frame_callback_pending: false,
        }
    }

    /// Stores the sketchpad's layer surface once it has been created.
    pub fn set_layer_surface(&mut self, surface: LayerSurface) {
        self.layer_surface = Some(surface);
    }

    /// The sketchpad's layer surface, if startup has created it.
    pub fn layer_surface(&self) -> Option<&LayerSurface> {
        self.layer_surface.as_ref()
    }

    /// Updates the surface dimensions, returning `true` if the size changed.
    ///
    /// A size change invalidates the buffer pool.
    pub fn update_dimensions(&mut self, width: u32, height: u32) -> bool {
        let changed = self.width != width || self.height != height;
        self.width = width;
        self.height = height;
        if changed {
            self.pool = None;
        }
        changed
    }

    /// Window width in pixels, as granted by the last configure.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Window height in pixels, as granted by the last configure.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Records that the compositor has configured the window.
    pub fn set_configured(&mut self, configured: bool) {
        self.configured = configured;
    }

    /// Whether the compositor has sent the initial configure.
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Sets whether a frame callback is outstanding; rendering waits on it under vsync.
    pub fn set_frame_callback_pending(&mut self, pending: bool) {
        self.frame_callback_pending = pending;
    }

    /// Whether the compositor still owes a frame callback.
    pub fn frame_callback_pending(&self) -> bool {
        self.frame_callback_pending
    }

    /// Returns the shared memory pool, creating one sized for `buffer_count` frames.
    pub fn ensure_pool(&mut self, shm: &Shm, buffer_count: usize) -> Result<&mut SlotPool> {
        if self.pool.is_none() {
            let buffer_size = (self.width * self.height * 4) as usize;
            let pool_size = buffer_size * buffer_count;
            info!(
                "Creating SlotPool ({}x{}, {} bytes, {} buffers)",
                self.width, self.height, pool_size, buffer_count
            );
            let pool = SlotPool::new(pool_size, shm).context("Failed to create slot pool")?;
            self.pool = Some(pool);
        }

        self.pool
            .as_mut()
            .context("Buffer pool not initialized despite previous check")
    }
}
