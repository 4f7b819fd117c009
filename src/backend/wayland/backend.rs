// Coordinates backend startup/shutdown and drives the event loop while delegating
// rendering & protocol state to `WaylandState` and its handler modules.
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use smithay_client_toolkit::{
    compositor::CompositorState,
    output::OutputState,
    reexports::{calloop::EventLoop, calloop_wayland_source::WaylandSource},
    registry::RegistryState,
    seat::SeatState,
    shell::{
        WaylandSurface,
        wlr_layer::{KeyboardInteractivity, Layer, LayerShell},
    },
    shm::Shm,
};
use wayland_client::{Connection, globals::registry_queue_init};

use super::state::{WaylandGlobals, WaylandState};
use crate::{
    config::Config,
    input::InputState,
    predict::{HttpPredictionService, PredictionManager},
};

/// Upper bound on how long the loop sleeps without events, so prediction
/// outcomes and notice expiry are picked up promptly.
const IDLE_DISPATCH_TIMEOUT: Duration = Duration::from_millis(50);

/// Consecutive render failures tolerated before giving up.
const MAX_RENDER_FAILURES: u32 = 10;

/// Wayland backend state
pub struct WaylandBackend {
    config: Config,
    /// Tokio runtime for prediction requests and desktop notices
    tokio_runtime: tokio::runtime::Runtime,
}

impl WaylandBackend {
    pub fn new(config: Config) -> Result<Self> {
        let tokio_runtime = tokio::runtime::Runtime::new()
            .context("Failed to create Tokio runtime for prediction requests")?;
        Ok(Self {
            config,
            tokio_runtime,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        info!("Starting Wayland backend");

        let conn =
            Connection::connect_to_env().context("Failed to connect to Wayland compositor")?;
        debug!("Connected to Wayland display");

        let (globals, event_queue) =
            registry_queue_init(&conn).context("Failed to initialize Wayland registry")?;
        let qh = event_queue.handle();

        let compositor_state =
            CompositorState::bind(&globals, &qh).context("wl_compositor not available")?;
        let layer_shell =
            LayerShell::bind(&globals, &qh).context("zwlr_layer_shell_v1 not available")?;
        let shm = Shm::bind(&globals, &qh).context("wl_shm not available")?;
        let output_state = OutputState::new(&globals, &qh);
        let seat_state = SeatState::new(&globals, &qh);
        let registry_state = RegistryState::new(&globals);
        debug!("Bound compositor, layer shell, shm, outputs and seats");

        let config = self.config.clone();
        debug!("  Canvas: {0}x{0}px", config.sketch.canvas_size);
        debug!("  Display size: {}px", config.sketch.display_size);
        debug!("  Brush width: {:.1}px", config.sketch.stroke_width);
        debug!("  Endpoint: {}", config.service.predict_url());
        debug!("  Buffer count: {}", config.performance.buffer_count);
        debug!("  VSync: {}", config.performance.enable_vsync);

        let input_state = InputState::new(&config).context("Failed to create canvas")?;

        let service = HttpPredictionService::new(&config.service)
            .context("Failed to set up prediction service")?;
        let prediction = PredictionManager::new(self.tokio_runtime.handle(), Arc::new(service));
        info!("Prediction manager initialized");

        let mut state = WaylandState::new(
            WaylandGlobals {
                registry_state,
                compositor_state,
                layer_shell,
                shm,
                output_state,
                seat_state,
            },
            config,
            input_state,
            prediction,
            self.tokio_runtime.handle().clone(),
        );

        info!("Creating layer shell surface");
        let wl_surface = state.compositor_state.create_surface(&qh);
        let layer_surface = state.layer_shell.create_layer_surface(
            &qh,
            wl_surface,
            Layer::Top,
            Some("digitpad"),
            None,
        );
        // No anchor: the compositor centers the window on the output.
        layer_surface.set_keyboard_interactivity(KeyboardInteractivity::OnDemand);
        layer_surface.set_size(state.surface.width(), state.surface.height());
        layer_surface.commit();
        state.surface.set_layer_surface(layer_surface);
        info!(
            "Layer surface requested at {}x{}",
            state.surface.width(),
            state.surface.height()
        );

        let mut event_loop: EventLoop<WaylandState> =
            EventLoop::try_new().context("Failed to create event loop")?;
        WaylandSource::new(conn.clone(), event_queue)
            .insert(event_loop.handle())
            .map_err(|e| anyhow!("Failed to register Wayland source: {}", e.error))?;

        let mut consecutive_render_failures = 0u32;

        loop {
            if state.input_state.should_exit {
                info!("Exit requested, breaking event loop");
                break;
            }

            let timeout = state
                .input_state
                .presenter
                .time_until_expiry(Instant::now())
                .map_or(IDLE_DISPATCH_TIMEOUT, |left| left.min(IDLE_DISPATCH_TIMEOUT));
            event_loop
                .dispatch(Some(timeout), &mut state)
                .context("Wayland event loop error")?;

            if state.input_state.should_exit {
                info!("Exit requested after dispatch, breaking event loop");
                break;
            }

            state.submit_pending();
            state.poll_prediction();
            state.input_state.tick(Instant::now());

            let can_render = state.surface.is_configured()
                && state.input_state.needs_redraw
                && (!state.surface.frame_callback_pending()
                    || !state.config.performance.enable_vsync);

            if can_render {
                match state.render(&qh) {
                    Ok(()) => {
                        consecutive_render_failures = 0;
                        state.input_state.needs_redraw = false;
                        if state.config.performance.enable_vsync {
                            state.surface.set_frame_callback_pending(true);
                        }
                        if let Err(e) = conn.flush() {
                            warn!("Failed to flush Wayland connection: {}", e);
                        }
                    }
                    Err(e) => {
                        consecutive_render_failures += 1;
                        warn!(
                            "Rendering error (attempt {}/{}): {}",
                            consecutive_render_failures, MAX_RENDER_FAILURES, e
                        );

                        if consecutive_render_failures >= MAX_RENDER_FAILURES {
                            return Err(anyhow!(
                                "Too many consecutive render failures ({}), exiting: {}",
                                consecutive_render_failures,
                                e
                            ));
                        }

                        state.input_state.needs_redraw = false;
                    }
                }
            }
        }

        info!("Wayland backend exiting");
        Ok(())
    }
}
