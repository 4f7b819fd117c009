//! HTTP transport to the digit classification service.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::header::ACCEPT;
use serde::Serialize;
use url::Url;

use super::encode::png_data_url;
use super::types::{HealthStatus, Prediction, PredictionError};
use crate::config::ServiceConfig;

/// Anything that can classify a PNG-encoded canvas. Mocked in tests.
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// Submits PNG bytes and returns the parsed prediction.
    async fn predict(&self, png: Vec<u8>) -> Result<Prediction, PredictionError>;

    /// Queries the service's health endpoint.
    async fn check_health(&self) -> Result<HealthStatus, PredictionError>;
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    image: &'a str,
}

/// Talks to the service over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpPredictionService {
    client: reqwest::Client,
    predict_url: Url,
    health_url: Url,
}

impl HttpPredictionService {
    /// Builds a client for the configured endpoint.
    ///
    /// Every request carries the configured overall and connect timeouts; there
    /// are no retries.
    pub fn new(config: &ServiceConfig) -> Result<Self, PredictionError> {
        let predict_url = parse_endpoint(&config.predict_url())?;
        let health_url = parse_endpoint(&config.health_url())?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(concat!("digitpad/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PredictionError::Transport(e.to_string()))?;

        info!(
            "Prediction service: {} (timeout {}s)",
            predict_url, config.timeout_secs
        );

        Ok(Self {
            client,
            predict_url,
            health_url,
        })
    }

    pub fn predict_url(&self) -> &Url {
        &self.predict_url
    }
}

#[async_trait]
impl PredictionService for HttpPredictionService {
    async fn predict(&self, png: Vec<u8>) -> Result<Prediction, PredictionError> {
        let image = png_data_url(&png);
        debug!(
            "POST {} ({} byte PNG, {} byte payload)",
            self.predict_url,
            png.len(),
            image.len()
        );

        let response = self
            .client
            .post(self.predict_url.clone())
            .header(ACCEPT, "application/json")
            .json(&PredictRequest { image: &image })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PredictionError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let prediction = Prediction::from_json(&body)?;
        debug!(
            "Prediction {} (confidence {:?}, {} ranked)",
            prediction.digit,
            prediction.confidence,
            prediction.ranked.len()
        );
        Ok(prediction)
    }

    async fn check_health(&self) -> Result<HealthStatus, PredictionError> {
        debug!("GET {}", self.health_url);
        let response = self
            .client
            .get(self.health_url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PredictionError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| PredictionError::MalformedResponse(e.to_string()))
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, PredictionError> {
    let url = Url::parse(raw).map_err(|e| PredictionError::InvalidEndpoint(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(PredictionError::InvalidEndpoint(format!(
            "{raw}: unsupported scheme `{other}`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_requires_http_scheme() {
        assert!(parse_endpoint("https://example.com/predict").is_ok());
        assert!(matches!(
            parse_endpoint("ftp://example.com/predict"),
            Err(PredictionError::InvalidEndpoint(_))
        ));
        assert!(matches!(
            parse_endpoint("not a url"),
            Err(PredictionError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn service_joins_configured_paths() {
        let config = ServiceConfig {
            base_url: "http://localhost:5000/".to_string(),
            ..ServiceConfig::default()
        };
        let service = HttpPredictionService::new(&config).unwrap();
        assert_eq!(service.predict_url().as_str(), "http://localhost:5000/predict");
        assert_eq!(service.health_url.as_str(), "http://localhost:5000/test");
    }

    #[test]
    fn request_body_has_image_field() {
        let body = serde_json::to_string(&PredictRequest {
            image: "data:image/png;base64,AA==",
        })
        .unwrap();
        assert_eq!(body, r#"{"image":"data:image/png;base64,AA=="}"#);
    }
}
