use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::{Mutex, mpsc};

use super::client::PredictionService;
use super::types::{PredictionError, PredictionOutcome};

/// Bridges the async prediction service with the synchronous Wayland loop.
///
/// At most one request is in flight. The loop submits with [`request`] and
/// polls [`try_take_outcome`] on every iteration.
///
/// [`request`]: PredictionManager::request
/// [`try_take_outcome`]: PredictionManager::try_take_outcome
#[derive(Clone)]
pub struct PredictionManager {
    request_tx: mpsc::UnboundedSender<Vec<u8>>,
    in_flight: Arc<AtomicBool>,
    last_outcome: Arc<Mutex<Option<PredictionOutcome>>>,
}

impl PredictionManager {
    /// Creates a manager and spawns its worker task on `runtime_handle`.
    pub fn new(
        runtime_handle: &tokio::runtime::Handle,
        service: Arc<dyn PredictionService>,
    ) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<Vec<u8>>();
        let in_flight = Arc::new(AtomicBool::new(false));
        let last_outcome = Arc::new(Mutex::new(None));

        let in_flight_clone = in_flight.clone();
        let outcome_clone = last_outcome.clone();

        runtime_handle.spawn(async move {
            while let Some(png) = request_rx.recv().await {
                log::debug!("Processing prediction request ({} bytes)", png.len());

                let outcome = match service.predict(png).await {
                    Ok(prediction) => {
                        log::info!(
                            "Prediction received: {} ({:?}%)",
                            prediction.digit,
                            prediction.confidence
                        );
                        PredictionOutcome::Success(prediction)
                    }
                    Err(e) => {
                        log::error!("Prediction failed: {}", e);
                        PredictionOutcome::Failed(e)
                    }
                };

                // The flag clears before the outcome becomes visible, so whoever
                // takes the outcome can submit again right away.
                let mut slot = outcome_clone.lock().await;
                in_flight_clone.store(false, Ordering::Release);
                *slot = Some(outcome);
            }
        });

        Self {
            request_tx,
            in_flight,
            last_outcome,
        }
    }

    /// Queues PNG bytes for prediction. Returns immediately.
    ///
    /// Fails with [`PredictionError::Busy`] while another request is outstanding;
    /// the rejected request never reaches the service.
    pub fn request(&self, png: Vec<u8>) -> Result<(), PredictionError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::debug!("Prediction request rejected: one is already in flight");
            return Err(PredictionError::Busy);
        }

        if self.request_tx.send(png).is_err() {
            self.in_flight.store(false, Ordering::Release);
            return Err(PredictionError::Transport(
                "Prediction worker not running".to_string(),
            ));
        }
        Ok(())
    }

    /// True while a request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Takes the outcome of the last request without waiting.
    pub fn try_take_outcome(&self) -> Option<PredictionOutcome> {
        self.last_outcome.try_lock().ok().and_then(|mut r| r.take())
    }
}

#[cfg(test)]
impl PredictionManager {
    pub(crate) fn with_closed_channel_for_test() -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Vec<u8>>();
        drop(rx);
        Self {
            request_tx: tx,
            in_flight: Arc::new(AtomicBool::new(false)),
            last_outcome: Arc::new(Mutex::new(None)),
        }
    }
}
