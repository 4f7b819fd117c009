use log::{debug, info};

use crate::input::layout::PanelButton;
use crate::predict::{PredictionError, PredictionOutcome};

use super::InputState;

impl InputState {
    pub(crate) fn activate_button(&mut self, button: PanelButton) {
        match button {
            PanelButton::Clear => self.clear_canvas(),
            PanelButton::Predict => self.request_prediction(),
        }
    }

    /// Wipes the canvas to white, cancels any stroke and hides the shown result.
    pub fn clear_canvas(&mut self) {
        info!("Canvas cleared");
        self.sketch.clear();
        self.presenter.reset();
        self.mark_full_redraw();
    }

    /// Queues a submission of the current canvas.
    ///
    /// Ignored while a previous submission is awaiting its outcome.
    pub fn request_prediction(&mut self) {
        if !self.can_submit() {
            debug!("Predict ignored: a submission is already in flight");
            return;
        }
        self.presenter.reset();
        self.presenter.begin_awaiting();
        self.set_pending_submit();
        self.mark_full_redraw();
    }

    /// Applies a finished request to the result panel.
    pub fn apply_outcome(&mut self, outcome: PredictionOutcome) {
        match outcome {
            PredictionOutcome::Success(prediction) => self.presenter.show(prediction),
            PredictionOutcome::Failed(err) => self.presenter.show_error(err.user_message()),
        }
        self.mark_full_redraw();
    }

    /// Reports a submission that never reached the service (encoding failed,
    /// or the manager refused it).
    pub fn submission_failed(&mut self, err: &PredictionError) {
        self.presenter.show_error(err.user_message());
        self.mark_full_redraw();
    }
}
