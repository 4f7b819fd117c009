// Holds the live Wayland protocol state shared by the backend loop and the handler
// submodules; provides rendering and the submit/outcome plumbing used across them.
use anyhow::{Context, Result};
use log::{debug, info, warn};
use smithay_client_toolkit::{
    compositor::CompositorState,
    output::OutputState,
    registry::RegistryState,
    seat::SeatState,
    shell::{WaylandSurface, wlr_layer::LayerShell},
    shm::Shm,
};
use wayland_client::{QueueHandle, protocol::wl_shm};

use crate::{
    archive::SampleArchive,
    config::Config,
    draw::FontDescriptor,
    input::InputState,
    notification::{self, Notice},
    predict::{PredictionError, PredictionManager, PredictionOutcome, encode_sketch},
    util::Rect,
};

use super::surface::SurfaceState;

/// Internal Wayland state shared across modules.
pub(super) struct WaylandState {
    // Wayland protocol objects
    pub(super) registry_state: RegistryState,
    pub(super) compositor_state: CompositorState,
    pub(super) layer_shell: LayerShell,
    pub(super) shm: Shm,
    pub(super) output_state: OutputState,
    pub(super) seat_state: SeatState,

    // Surface and buffer management
    pub(super) surface: SurfaceState,

    pub(super) config: Config,
    pub(super) font: FontDescriptor,

    // Canvas, presenter and gesture state
    pub(super) input_state: InputState,

    // Prediction round trips
    pub(super) prediction: PredictionManager,
    pub(super) archive: Option<SampleArchive>,

    // Tokio runtime handle for async operations
    pub(super) tokio_handle: tokio::runtime::Handle,
}

/// Protocol globals bound during startup.
pub(super) struct WaylandGlobals {
    pub(super) registry_state: RegistryState,
    pub(super) compositor_state: CompositorState,
    pub(super) layer_shell: LayerShell,
    pub(super) shm: Shm,
    pub(super) output_state: OutputState,
    pub(super) seat_state: SeatState,
}

impl WaylandState {
    pub(super) fn new(
        globals: WaylandGlobals,
        config: Config,
        input_state: InputState,
        prediction: PredictionManager,
        tokio_handle: tokio::runtime::Handle,
    ) -> Self {
        let surface = SurfaceState::new(
            input_state.layout.width as u32,
            input_state.layout.height as u32,
        );
        let font = FontDescriptor::new(config.ui.font_family.clone(), "normal");
        let archive = SampleArchive::from_config(&config.archive);
        if let Some(archive) = &archive {
            info!("Archiving submissions to {}", archive.directory().display());
        }

        Self {
            registry_state: globals.registry_state,
            compositor_state: globals.compositor_state,
            layer_shell: globals.layer_shell,
            shm: globals.shm,
            output_state: globals.output_state,
            seat_state: globals.seat_state,
            surface,
            config,
            font,
            input_state,
            prediction,
            archive,
            tokio_handle,
        }
    }

    /// Sends the canvas to the service if the user pressed Predict.
    pub(super) fn submit_pending(&mut self) {
        if !self.input_state.take_pending_submit() {
            return;
        }

        let png = match encode_sketch(&self.input_state.sketch) {
            Ok(png) => png,
            Err(e) => {
                warn!("Failed to encode canvas: {}", e);
                self.report_failure(&e);
                return;
            }
        };

        if let Some(archive) = &self.archive
            && let Err(e) = archive.save(&png)
        {
            warn!("Failed to archive submission: {}", e);
        }

        info!("Submitting canvas ({} bytes)", png.len());
        if let Err(e) = self.prediction.request(png) {
            warn!("Prediction request rejected: {}", e);
            self.report_failure(&e);
        }
    }

    /// Applies a finished prediction, if one arrived since the last call.
    pub(super) fn poll_prediction(&mut self) {
        let Some(outcome) = self.prediction.try_take_outcome() else {
            return;
        };

        if let PredictionOutcome::Failed(e) = &outcome {
            self.notify_failure(e);
        }
        self.input_state.apply_outcome(outcome);
    }

    fn report_failure(&mut self, err: &PredictionError) {
        self.notify_failure(err);
        self.input_state.submission_failed(err);
    }

    fn notify_failure(&self, err: &PredictionError) {
        if self.config.ui.desktop_notifications {
            notification::send_notice_async(
                &self.tokio_handle,
                Notice::prediction_failed(err, self.config.ui.error_toast_ms),
            );
        }
    }

    pub(super) fn render(&mut self, qh: &QueueHandle<Self>) -> Result<()> {
        debug!("=== RENDER START ===");
        let buffer_count = self.config.performance.buffer_count as usize;
        let width = self.surface.width();
        let height = self.surface.height();

        let (buffer, canvas) = {
            let pool = self.surface.ensure_pool(&self.shm, buffer_count)?;
            pool.create_buffer(
                width as i32,
                height as i32,
                (width * 4) as i32,
                wl_shm::Format::Argb8888,
            )
            .context("Failed to create buffer")?
        };

        // SAFETY: `canvas` is a live SlotPool slice of exactly width * height * 4
        // bytes, matching ARgb32 with a stride of width * 4. The Cairo surface and
        // context are dropped before the buffer is attached, so Cairo never touches
        // the memory after the compositor may read it.
        let cairo_surface = unsafe {
            cairo::ImageSurface::create_for_data_unsafe(
                canvas.as_mut_ptr(),
                cairo::Format::ARgb32,
                width as i32,
                height as i32,
                (width * 4) as i32,
            )
            .context("Failed to create Cairo surface")?
        };

        let ctx = cairo::Context::new(&cairo_surface).context("Failed to create Cairo context")?;
        crate::ui::render_window(&ctx, &self.input_state, &self.font);

        cairo_surface.flush();
        drop(ctx);
        drop(cairo_surface);

        let wl_surface = self
            .surface
            .layer_surface()
            .context("Layer surface not created")?
            .wl_surface();
        wl_surface.attach(Some(buffer.wl_buffer()), 0, 0);

        let surface_width = width.min(i32::MAX as u32) as i32;
        let surface_height = height.min(i32::MAX as u32) as i32;
        let dirty_regions = resolve_damage_regions(
            surface_width,
            surface_height,
            self.input_state.take_dirty_regions(),
        );
        for rect in &dirty_regions {
            debug!(
                "Damaging buffer region x={} y={} w={} h={}",
                rect.x, rect.y, rect.width, rect.height
            );
            wl_surface.damage_buffer(rect.x, rect.y, rect.width, rect.height);
        }

        if self.config.performance.enable_vsync {
            wl_surface.frame(qh, wl_surface.clone());
        }

        wl_surface.commit();
        debug!("=== RENDER COMPLETE ===");

        Ok(())
    }
}

/// Clamps damage to the surface, falling back to full damage when nothing valid remains.
fn resolve_damage_regions(width: i32, height: i32, regions: Vec<Rect>) -> Vec<Rect> {
    let mut regions: Vec<Rect> = regions
        .into_iter()
        .filter_map(|rect| rect.clamp_to_bounds(width, height))
        .collect();

    if regions.is_empty()
        && let Some(full) = Rect::new(0, 0, width, height)
    {
        regions.push(full);
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_damage_returns_full_when_empty() {
        let regions = resolve_damage_regions(708, 524, Vec::new());
        assert_eq!(regions, vec![Rect::new(0, 0, 708, 524).unwrap()]);
    }

    #[test]
    fn resolve_damage_clamps_and_drops_offscreen_rects() {
        let regions = resolve_damage_regions(
            800,
            600,
            vec![
                Rect {
                    x: 790,
                    y: 10,
                    width: 50,
                    height: 40,
                },
                Rect {
                    x: 900,
                    y: 0,
                    width: 10,
                    height: 10,
                },
            ],
        );

        assert_eq!(regions, vec![Rect::new(790, 10, 10, 40).unwrap()]);
    }
}
