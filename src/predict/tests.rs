use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio::time::{Duration, sleep, timeout};

use super::{
    HealthStatus, Prediction, PredictionError, PredictionManager, PredictionOutcome,
    PredictionService,
};

/// Service that blocks each call until released, then replays a canned response.
struct MockService {
    response: Mutex<Option<Result<Prediction, PredictionError>>>,
    release: Arc<Notify>,
    calls: Arc<AtomicUsize>,
    received: Mutex<Vec<Vec<u8>>>,
}

impl MockService {
    fn new(response: Result<Prediction, PredictionError>) -> Self {
        Self {
            response: Mutex::new(Some(response)),
            release: Arc::new(Notify::new()),
            calls: Arc::new(AtomicUsize::new(0)),
            received: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PredictionService for MockService {
    async fn predict(&self, png: Vec<u8>) -> Result<Prediction, PredictionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received.lock().unwrap().push(png);
        self.release.notified().await;
        self.response
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Err(PredictionError::Status(500)))
    }

    async fn check_health(&self) -> Result<HealthStatus, PredictionError> {
        Ok(HealthStatus::default())
    }
}

fn seven() -> Prediction {
    Prediction::from_json(br#"{"prediction":"7","confidence":93}"#).unwrap()
}

async fn wait_for_outcome(manager: &PredictionManager) -> PredictionOutcome {
    timeout(Duration::from_secs(5), async {
        loop {
            if let Some(outcome) = manager.try_take_outcome() {
                return outcome;
            }
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("prediction outcome")
}

#[tokio::test]
async fn successful_request_publishes_prediction() {
    let service = Arc::new(MockService::new(Ok(seven())));
    let release = service.release.clone();
    let manager = PredictionManager::new(&tokio::runtime::Handle::current(), service.clone());

    manager.request(vec![1, 2, 3]).unwrap();
    assert!(manager.is_busy());
    assert!(manager.try_take_outcome().is_none());

    release.notify_one();
    let outcome = wait_for_outcome(&manager).await;

    assert_eq!(outcome, PredictionOutcome::Success(seven()));
    assert_eq!(service.received.lock().unwrap().as_slice(), &[vec![1, 2, 3]]);
}

#[tokio::test]
async fn second_request_while_in_flight_is_rejected() {
    let service = Arc::new(MockService::new(Ok(seven())));
    let release = service.release.clone();
    let calls = service.calls.clone();
    let manager = PredictionManager::new(&tokio::runtime::Handle::current(), service);

    manager.request(vec![1]).unwrap();
    assert_eq!(manager.request(vec![2]), Err(PredictionError::Busy));

    release.notify_one();
    wait_for_outcome(&manager).await;
    // Give a stray second request a chance to surface.
    sleep(Duration::from_millis(20)).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!manager.is_busy());
}

#[tokio::test]
async fn manager_accepts_new_request_after_completion() {
    let service = Arc::new(MockService::new(Ok(seven())));
    let release = service.release.clone();
    let calls = service.calls.clone();
    let manager = PredictionManager::new(&tokio::runtime::Handle::current(), service);

    manager.request(vec![1]).unwrap();
    release.notify_one();
    wait_for_outcome(&manager).await;

    manager.request(vec![2]).unwrap();
    release.notify_one();
    let outcome = wait_for_outcome(&manager).await;

    assert_eq!(
        outcome,
        PredictionOutcome::Failed(PredictionError::Status(500))
    );
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn taken_outcome_frees_manager_for_next_request() {
    let service = Arc::new(MockService::new(Ok(seven())));
    let release = service.release.clone();
    let manager = PredictionManager::new(&tokio::runtime::Handle::current(), service);

    for round in 0..20 {
        manager.request(vec![round]).unwrap();
        release.notify_one();
        wait_for_outcome(&manager).await;
        assert!(!manager.is_busy(), "still busy after round {round}");
    }
}

#[tokio::test]
async fn failed_request_publishes_error() {
    let service = Arc::new(MockService::new(Err(PredictionError::Timeout)));
    let release = service.release.clone();
    let manager = PredictionManager::new(&tokio::runtime::Handle::current(), service);

    manager.request(Vec::new()).unwrap();
    release.notify_one();

    assert_eq!(
        wait_for_outcome(&manager).await,
        PredictionOutcome::Failed(PredictionError::Timeout)
    );
}

#[test]
fn request_fails_when_worker_is_gone() {
    let manager = PredictionManager::with_closed_channel_for_test();
    assert!(matches!(
        manager.request(vec![0]),
        Err(PredictionError::Transport(_))
    ));
    assert!(!manager.is_busy());
}
