//! Result presenter: what the panel beside the canvas is currently showing.
//!
//! The presenter is a small phase machine:
//!
//! ```text
//! Idle -> Awaiting -> Showing | Error -> Idle
//! ```
//!
//! `Error` expires on its own after the configured toast duration.

use std::time::{Duration, Instant};

use log::debug;

use crate::predict::{Digit, Prediction};

/// What the result panel is displaying.
#[derive(Debug, Clone, PartialEq)]
pub enum PresenterPhase {
    /// Nothing shown.
    Idle,
    /// A request is in flight; the Predict button is disabled.
    Awaiting,
    /// The last prediction.
    Showing(Prediction),
    /// A transient notice, removed once `expires_at` passes.
    Error { message: String, expires_at: Instant },
}

/// One row of the ranked alternatives list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedEntry {
    pub digit: Digit,
    pub confidence: f64,
    /// Set on the first (most confident) row only.
    pub is_top: bool,
}

#[derive(Debug)]
pub struct ResultPresenter {
    phase: PresenterPhase,
    toast_duration: Duration,
    max_ranked: usize,
}

impl ResultPresenter {
    pub fn new(toast_duration: Duration, max_ranked: usize) -> Self {
        Self {
            phase: PresenterPhase::Idle,
            toast_duration,
            max_ranked,
        }
    }

    pub fn phase(&self) -> &PresenterPhase {
        &self.phase
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self.phase, PresenterPhase::Awaiting)
    }

    /// Marks a submission as in flight. Any shown result or notice is hidden.
    pub fn begin_awaiting(&mut self) {
        self.phase = PresenterPhase::Awaiting;
    }

    /// Shows a prediction, replacing whatever was displayed.
    pub fn show(&mut self, prediction: Prediction) {
        debug!("Presenting prediction {}", prediction.digit);
        self.phase = PresenterPhase::Showing(prediction);
    }

    /// Shows a transient notice that dismisses itself after the toast duration.
    /// Any previously shown result is hidden.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.show_error_at(message, Instant::now());
    }

    pub(crate) fn show_error_at(&mut self, message: impl Into<String>, now: Instant) {
        let message = message.into();
        debug!("Presenting error notice: {}", message);
        self.phase = PresenterPhase::Error {
            message,
            expires_at: now + self.toast_duration,
        };
    }

    /// Hides any shown result or notice.
    ///
    /// An in-flight request stays `Awaiting`: its outcome still arrives and is
    /// shown.
    pub fn reset(&mut self) {
        if !self.is_awaiting() {
            self.phase = PresenterPhase::Idle;
        }
    }

    /// Expires the error notice once its time is up. Returns true if the phase changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let PresenterPhase::Error { expires_at, .. } = &self.phase
            && now >= *expires_at
        {
            self.phase = PresenterPhase::Idle;
            return true;
        }
        false
    }

    /// Time left until the notice expires, if one is shown.
    pub fn time_until_expiry(&self, now: Instant) -> Option<Duration> {
        match &self.phase {
            PresenterPhase::Error { expires_at, .. } => {
                Some(expires_at.saturating_duration_since(now))
            }
            _ => None,
        }
    }

    /// The prediction currently on display.
    pub fn current(&self) -> Option<&Prediction> {
        match &self.phase {
            PresenterPhase::Showing(prediction) => Some(prediction),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            PresenterPhase::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Ranked alternatives of the shown prediction, most confident first,
    /// capped at `ui.max_ranked`. Empty when nothing is shown or the service
    /// sent no list.
    pub fn ranked_entries(&self) -> Vec<RankedEntry> {
        let Some(prediction) = self.current() else {
            return Vec::new();
        };
        prediction
            .ranked_by_confidence()
            .into_iter()
            .take(self.max_ranked)
            .enumerate()
            .map(|(index, ranked)| RankedEntry {
                digit: ranked.digit,
                confidence: ranked.confidence,
                is_top: index == 0,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::{PREDICTION_FAILED_NOTICE, PredictionError};

    fn presenter() -> ResultPresenter {
        ResultPresenter::new(Duration::from_millis(3000), 3)
    }

    fn prediction(body: &str) -> Prediction {
        Prediction::from_json(body.as_bytes()).unwrap()
    }

    #[test]
    fn show_displays_digit_without_ranked_list() {
        let mut presenter = presenter();
        presenter.show(prediction(r#"{"prediction":"7","confidence":93}"#));

        let shown = presenter.current().unwrap();
        assert_eq!(shown.digit.value(), 7);
        assert_eq!(shown.confidence, Some(93.0));
        assert!(presenter.ranked_entries().is_empty());
    }

    #[test]
    fn ranked_entries_sorted_with_top_marked() {
        let mut presenter = presenter();
        presenter.show(prediction(
            r#"{"prediction":"3","confidence":80,
                "top_predictions":[{"digit":8,"confidence":15},{"digit":3,"confidence":80}]}"#,
        ));

        let entries = presenter.ranked_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].digit.value(), 3);
        assert!(entries[0].is_top);
        assert_eq!(entries[1].digit.value(), 8);
        assert!(!entries[1].is_top);
    }

    #[test]
    fn ranked_entries_respect_cap() {
        let mut presenter = ResultPresenter::new(Duration::from_secs(1), 2);
        presenter.show(prediction(
            r#"{"prediction":"1","top_predictions":[
                {"digit":1,"confidence":50},{"digit":7,"confidence":30},{"digit":4,"confidence":20}]}"#,
        ));
        assert_eq!(presenter.ranked_entries().len(), 2);
    }

    #[test]
    fn error_hides_previous_result() {
        let mut presenter = presenter();
        presenter.show(prediction(r#"{"prediction":"7","confidence":93}"#));

        presenter.begin_awaiting();
        presenter.show_error(PredictionError::Status(500).user_message());

        assert!(presenter.current().is_none());
        assert_eq!(presenter.error_message(), Some(PREDICTION_FAILED_NOTICE));
    }

    #[test]
    fn error_notice_expires_without_user_action() {
        let mut presenter = presenter();
        let start = Instant::now();
        presenter.show_error_at("boom", start);

        assert!(!presenter.tick(start + Duration::from_millis(2999)));
        assert_eq!(presenter.error_message(), Some("boom"));
        assert_eq!(
            presenter.time_until_expiry(start + Duration::from_millis(1000)),
            Some(Duration::from_millis(2000))
        );

        assert!(presenter.tick(start + Duration::from_millis(3000)));
        assert_eq!(presenter.phase(), &PresenterPhase::Idle);
        assert!(!presenter.tick(start + Duration::from_millis(5000)));
    }

    #[test]
    fn reset_hides_result_but_keeps_pending_request() {
        let mut presenter = presenter();
        presenter.show(prediction(r#"{"prediction":"2"}"#));
        presenter.reset();
        assert_eq!(presenter.phase(), &PresenterPhase::Idle);

        presenter.begin_awaiting();
        presenter.reset();
        assert!(presenter.is_awaiting());
    }
}
