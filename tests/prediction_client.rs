use std::net::SocketAddr;
use std::time::Duration;

use digitpad::config::{Config, ServiceConfig};
use digitpad::draw::SketchSurface;
use digitpad::predict::{
    HttpPredictionService, PREDICTION_FAILED_NOTICE, PredictionError, PredictionService,
    encode_sketch,
};
use digitpad::util::Point;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// A one-shot HTTP stub: accepts a single connection, captures the request and
/// answers with `status` and `body` after `delay`.
async fn stub_service(
    status: &'static str,
    body: &'static str,
    delay: Duration,
) -> (SocketAddr, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;
        tokio::time::sleep(delay).await;

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        // The client may already have given up on a delayed response.
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
        request
    });

    (addr, handle)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())?
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn service_for(addr: SocketAddr, timeout_secs: u64) -> HttpPredictionService {
    let config = ServiceConfig {
        base_url: format!("http://{addr}"),
        timeout_secs,
        connect_timeout_secs: 1,
        ..ServiceConfig::default()
    };
    HttpPredictionService::new(&config).unwrap()
}

fn sample_png() -> Vec<u8> {
    let config = Config::default();
    let mut sketch = SketchSurface::new(
        config.sketch.canvas_size,
        config.sketch.canvas_size,
        config.sketch.stroke_width,
    )
    .unwrap();
    sketch.begin(Point::new(140.0, 40.0));
    sketch.extend(Point::new(140.0, 240.0));
    sketch.end();
    encode_sketch(&sketch).unwrap()
}

#[tokio::test]
async fn predict_posts_data_url_and_parses_minimal_response() {
    let (addr, server) = stub_service(
        "200 OK",
        r#"{"prediction":"7","confidence":93}"#,
        Duration::ZERO,
    )
    .await;
    let service = service_for(addr, 5);

    let prediction = service.predict(sample_png()).await.unwrap();
    assert_eq!(prediction.digit.value(), 7);
    assert_eq!(prediction.confidence, Some(93.0));
    assert!(prediction.ranked.is_empty());

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /predict HTTP/1.1"));
    assert!(
        request
            .to_ascii_lowercase()
            .contains("content-type: application/json")
    );
    assert!(request.contains(r#"{"image":"data:image/png;base64,iVBORw0KGgo"#));
}

#[tokio::test]
async fn predict_returns_ranked_alternatives() {
    let (addr, server) = stub_service(
        "200 OK",
        r#"{"prediction":"3","confidence":80,"method":"tensorflow",
            "top_predictions":[{"digit":3,"confidence":80},{"digit":8,"confidence":15},{"digit":5,"confidence":3}]}"#,
        Duration::ZERO,
    )
    .await;
    let service = service_for(addr, 5);

    let prediction = service.predict(sample_png()).await.unwrap();
    assert_eq!(prediction.method_label(), Some("Neural Network"));
    let ranked: Vec<u8> = prediction
        .ranked_by_confidence()
        .iter()
        .map(|r| r.digit.value())
        .collect();
    assert_eq!(ranked, vec![3, 8, 5]);
    server.await.unwrap();
}

#[tokio::test]
async fn server_error_maps_to_status() {
    let (addr, server) = stub_service(
        "500 Internal Server Error",
        r#"{"error":"boom"}"#,
        Duration::ZERO,
    )
    .await;
    let service = service_for(addr, 5);

    let err = service.predict(sample_png()).await.unwrap_err();
    assert_eq!(err, PredictionError::Status(500));
    assert_eq!(err.user_message(), PREDICTION_FAILED_NOTICE);
    server.await.unwrap();
}

#[tokio::test]
async fn body_without_prediction_is_malformed() {
    let (addr, server) = stub_service("200 OK", r#"{"confidence":12}"#, Duration::ZERO).await;
    let service = service_for(addr, 5);

    let err = service.predict(sample_png()).await.unwrap_err();
    assert!(matches!(err, PredictionError::MalformedResponse(_)));
    server.await.unwrap();
}

#[tokio::test]
async fn slow_service_times_out() {
    let (addr, _server) = stub_service(
        "200 OK",
        r#"{"prediction":"1"}"#,
        Duration::from_secs(3),
    )
    .await;
    let service = service_for(addr, 1);

    let err = service.predict(sample_png()).await.unwrap_err();
    assert_eq!(err, PredictionError::Timeout);
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let service = service_for(addr, 2);

    let err = service.predict(sample_png()).await.unwrap_err();
    assert!(
        matches!(err, PredictionError::Transport(_) | PredictionError::Timeout),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn health_check_reads_backend_status() {
    let (addr, server) = stub_service(
        "200 OK",
        r#"{"status":"success","message":"Backend is running","model_status":"loaded","fallback_only":false}"#,
        Duration::ZERO,
    )
    .await;
    let service = service_for(addr, 5);

    let status = service.check_health().await.unwrap();
    assert!(status.is_ok());
    assert_eq!(status.model_status.as_deref(), Some("loaded"));
    assert_eq!(status.fallback_only, Some(false));

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /test HTTP/1.1"));
}
