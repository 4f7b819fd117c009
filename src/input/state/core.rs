//! Sketchpad input state: the canvas, the result presenter, and gesture tracking.

use std::time::{Duration, Instant};

use crate::config::Config;
use crate::draw::{DirtyTracker, SketchError, SketchSurface};
use crate::input::layout::{PanelButton, WindowLayout};
use crate::input::viewport::CanvasViewport;
use crate::presenter::ResultPresenter;
use crate::util::Rect;

/// Everything the Wayland backend needs to turn input events into canvas
/// updates and submissions.
///
/// The backend feeds pointer, touch and key events in window coordinates,
/// renders when [`needs_redraw`](Self::needs_redraw) is set, and picks up
/// submissions with [`take_pending_submit`](Self::take_pending_submit).
pub struct InputState {
    /// The canvas bitmap and active stroke
    pub sketch: SketchSurface,
    /// What the result panel shows
    pub presenter: ResultPresenter,
    /// Window layout (canvas, buttons, panel)
    pub layout: WindowLayout,
    /// Window-to-canvas coordinate mapping
    pub(crate) viewport: CanvasViewport,
    /// Whether user requested to close the window
    pub should_exit: bool,
    /// Whether the display needs to be redrawn
    pub needs_redraw: bool,
    /// Tracks dirty regions between renders
    pub(crate) dirty_tracker: DirtyTracker,
    /// Button that received the press, activated if the release lands on it too
    pub(crate) pressed_button: Option<PanelButton>,
    /// Touch point that owns the current gesture; others are ignored
    pub(crate) active_touch: Option<i32>,
    /// Last position of the active touch point
    pub(crate) touch_position: (f64, f64),
    /// Set by the Predict button, consumed by the backend
    pending_submit: bool,
}

impl InputState {
    /// Builds the input state from configuration.
    pub fn new(config: &Config) -> Result<Self, SketchError> {
        let sketch = SketchSurface::new(
            config.sketch.canvas_size,
            config.sketch.canvas_size,
            config.sketch.stroke_width,
        )?;
        let presenter = ResultPresenter::new(
            Duration::from_millis(config.ui.error_toast_ms),
            config.ui.max_ranked,
        );
        Ok(Self::with_parts(
            sketch,
            presenter,
            WindowLayout::new(config.sketch.display_size),
        ))
    }

    pub(crate) fn with_parts(
        sketch: SketchSurface,
        presenter: ResultPresenter,
        layout: WindowLayout,
    ) -> Self {
        let viewport = CanvasViewport::new(layout.canvas, sketch.width(), sketch.height());
        let mut dirty_tracker = DirtyTracker::new();
        dirty_tracker.mark_full();

        Self {
            sketch,
            presenter,
            layout,
            viewport,
            should_exit: false,
            needs_redraw: true,
            dirty_tracker,
            pressed_button: None,
            active_touch: None,
            touch_position: (0.0, 0.0),
            pending_submit: false,
        }
    }

    pub fn viewport(&self) -> &CanvasViewport {
        &self.viewport
    }

    /// Whether the Predict button currently accepts clicks.
    pub fn can_submit(&self) -> bool {
        !self.presenter.is_awaiting()
    }

    /// Takes the pending submission request, if the user pressed Predict.
    pub fn take_pending_submit(&mut self) -> bool {
        std::mem::take(&mut self.pending_submit)
    }

    pub(crate) fn set_pending_submit(&mut self) {
        self.pending_submit = true;
    }

    /// Marks the whole window for repaint.
    pub fn mark_full_redraw(&mut self) {
        self.dirty_tracker.mark_full();
        self.needs_redraw = true;
    }

    /// Marks a canvas-space rectangle (as returned by the sketch surface) for repaint.
    pub(crate) fn mark_canvas_damage(&mut self, damage: Option<Rect>) {
        if let Some(rect) = damage.and_then(|rect| self.viewport.to_window_rect(rect)) {
            self.dirty_tracker.mark_rect(rect);
            self.needs_redraw = true;
        }
    }

    /// Drains window regions to repaint.
    pub fn take_dirty_regions(&mut self) -> Vec<Rect> {
        self.dirty_tracker
            .take_regions(self.layout.width, self.layout.height)
    }

    /// Expires transient notices. Call once per event loop iteration.
    pub fn tick(&mut self, now: Instant) {
        if self.presenter.tick(now) {
            self.mark_full_redraw();
        }
    }
}
