//! Data types exchanged with the prediction service.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// The only notice users see when a prediction fails, whatever the cause.
pub const PREDICTION_FAILED_NOTICE: &str =
    "Could not get a prediction. Please check your connection and try again.";

/// A single decimal digit, 0 through 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digit(u8);

impl Digit {
    pub fn new(value: u8) -> Option<Self> {
        (value <= 9).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Accepts `"7"`, `7`, or `7.0`.
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => text.trim().parse::<u8>().ok().and_then(Self::new),
            Value::Number(number) => {
                if let Some(int) = number.as_u64() {
                    u8::try_from(int).ok().and_then(Self::new)
                } else {
                    number
                        .as_f64()
                        .filter(|f| f.fract() == 0.0 && (0.0..=9.0).contains(f))
                        .and_then(|f| Self::new(f as u8))
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of the service's ranked alternatives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedDigit {
    pub digit: Digit,
    /// Percent, as reported by the service.
    pub confidence: f64,
}

/// A parsed prediction. Immutable once built; the next submission replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub digit: Digit,
    /// Percent, as reported by the service.
    pub confidence: Option<f64>,
    /// Ranked alternatives in the order the service sent them; empty when absent.
    pub ranked: Vec<RankedDigit>,
    /// Raw inference method tag (e.g. `"tensorflow"`).
    pub method: Option<String>,
}

impl Prediction {
    /// Parses a response body.
    ///
    /// `prediction` is required and must be a digit. `confidence`,
    /// `top_predictions` and `method` are optional: a missing or malformed value
    /// is treated as absent, and malformed ranked entries are skipped. Unknown
    /// fields are ignored.
    pub fn from_json(body: &[u8]) -> Result<Self, PredictionError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| PredictionError::MalformedResponse(e.to_string()))?;
        let object = value.as_object().ok_or_else(|| {
            PredictionError::MalformedResponse("response is not a JSON object".to_string())
        })?;

        let digit = object
            .get("prediction")
            .ok_or_else(|| PredictionError::MalformedResponse("missing `prediction`".to_string()))
            .and_then(|raw| {
                Digit::from_json(raw).ok_or_else(|| {
                    PredictionError::MalformedResponse(format!(
                        "`prediction` is not a digit: {raw}"
                    ))
                })
            })?;

        let confidence = object
            .get("confidence")
            .and_then(Value::as_f64)
            .filter(|c| c.is_finite());

        let ranked = object
            .get("top_predictions")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(parse_ranked_entry).collect())
            .unwrap_or_default();

        let method = object
            .get("method")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            digit,
            confidence,
            ranked,
            method,
        })
    }

    /// Display label for the inference method.
    pub fn method_label(&self) -> Option<&'static str> {
        self.method.as_deref().map(|method| {
            if method == "tensorflow" {
                "Neural Network"
            } else {
                "Heuristic Analysis"
            }
        })
    }

    /// Ranked alternatives, most confident first. Ties keep the service's order.
    pub fn ranked_by_confidence(&self) -> Vec<RankedDigit> {
        let mut ranked = self.ranked.clone();
        ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        ranked
    }

    /// Plain-text summary, e.g.
    /// `Did you draw a 7? (93% confidence) - Neural Network`.
    ///
    /// When alternatives are present a second line lists at most `max_ranked`.
    pub fn summary(&self, max_ranked: usize) -> String {
        let mut text = format!("Did you draw a {}?", self.digit);
        if let Some(confidence) = self.confidence {
            text.push_str(&format!(" ({} confidence)", format_percent(confidence)));
        }
        if let Some(label) = self.method_label() {
            text.push_str(&format!(" - {label}"));
        }

        let ranked = self.ranked_by_confidence();
        if !ranked.is_empty() && max_ranked > 0 {
            let entries: Vec<String> = ranked
                .iter()
                .take(max_ranked)
                .map(|entry| format!("{} ({})", entry.digit, format_percent(entry.confidence)))
                .collect();
            text.push_str("\nTop predictions: ");
            text.push_str(&entries.join(", "));
        }
        text
    }
}

fn parse_ranked_entry(entry: &Value) -> Option<RankedDigit> {
    let digit = Digit::from_json(entry.get("digit")?)?;
    let confidence = entry.get("confidence")?.as_f64().filter(|c| c.is_finite())?;
    Some(RankedDigit { digit, confidence })
}

/// Formats a percentage with at most one decimal place: `93%`, `92.5%`.
pub fn format_percent(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    format!("{rounded}%")
}

/// Response of the service's health check.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: Option<String>,
    pub message: Option<String>,
    pub model_status: Option<String>,
    pub fallback_only: Option<bool>,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|status| matches!(status, "ok" | "success" | "healthy"))
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status: {}", self.status.as_deref().unwrap_or("unknown"))?;
        if let Some(message) = &self.message {
            write!(f, "\nmessage: {message}")?;
        }
        if let Some(model) = &self.model_status {
            write!(f, "\nmodel: {model}")?;
        }
        if let Some(fallback) = self.fallback_only {
            write!(f, "\nfallback only: {fallback}")?;
        }
        Ok(())
    }
}

/// Why a prediction could not be obtained.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PredictionError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Service responded with HTTP {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Failed to encode canvas: {0}")]
    Encode(String),

    #[error("A prediction is already in progress")]
    Busy,

    #[error("Invalid service endpoint: {0}")]
    InvalidEndpoint(String),
}

impl PredictionError {
    /// The user-facing notice. Every failure collapses to the same text.
    pub fn user_message(&self) -> &'static str {
        PREDICTION_FAILED_NOTICE
    }
}

impl From<reqwest::Error> for PredictionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Outcome of a background prediction request.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    Success(Prediction),
    Failed(PredictionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digit(value: u8) -> Digit {
        Digit::new(value).unwrap()
    }

    #[test]
    fn digit_rejects_values_above_nine() {
        assert!(Digit::new(9).is_some());
        assert!(Digit::new(10).is_none());
    }

    #[test]
    fn minimal_response_parses_without_ranked_list() {
        let prediction = Prediction::from_json(br#"{"prediction":"7","confidence":93}"#).unwrap();
        assert_eq!(prediction.digit, digit(7));
        assert_eq!(prediction.confidence, Some(93.0));
        assert!(prediction.ranked.is_empty());
        assert_eq!(prediction.method, None);
        assert_eq!(prediction.method_label(), None);
    }

    #[test]
    fn integer_prediction_is_accepted() {
        let prediction = Prediction::from_json(br#"{"prediction":4}"#).unwrap();
        assert_eq!(prediction.digit, digit(4));
        assert_eq!(prediction.confidence, None);
    }

    #[test]
    fn missing_or_invalid_prediction_is_malformed() {
        let bodies: [&[u8]; 5] = [
            br#"{"confidence":93}"#,
            br#"{"prediction":"seven"}"#,
            br#"{"prediction":12}"#,
            br#"[1,2,3]"#,
            b"<html>oops</html>",
        ];
        for body in bodies {
            assert!(matches!(
                Prediction::from_json(body),
                Err(PredictionError::MalformedResponse(_))
            ));
        }
    }

    #[test]
    fn malformed_optional_fields_are_treated_as_absent() {
        let body = br#"{
            "prediction": "2",
            "confidence": "high",
            "top_predictions": [{"digit": 2, "confidence": 70}, {"digit": "x"}, 5],
            "method": 17,
            "extra": true
        }"#;
        let prediction = Prediction::from_json(body).unwrap();
        assert_eq!(prediction.confidence, None);
        assert_eq!(
            prediction.ranked,
            vec![RankedDigit {
                digit: digit(2),
                confidence: 70.0
            }]
        );
        assert_eq!(prediction.method, None);
    }

    #[test]
    fn ranked_entries_sort_by_descending_confidence() {
        let body = br#"{
            "prediction": "3",
            "confidence": 80,
            "top_predictions": [
                {"digit": 8, "confidence": 15},
                {"digit": 3, "confidence": 80}
            ]
        }"#;
        let prediction = Prediction::from_json(body).unwrap();
        let ranked = prediction.ranked_by_confidence();
        assert_eq!(ranked[0].digit, digit(3));
        assert_eq!(ranked[1].digit, digit(8));
    }

    #[test]
    fn method_label_maps_tensorflow_and_everything_else() {
        let mut prediction =
            Prediction::from_json(br#"{"prediction":"1","method":"tensorflow"}"#).unwrap();
        assert_eq!(prediction.method_label(), Some("Neural Network"));
        prediction.method = Some("fallback".to_string());
        assert_eq!(prediction.method_label(), Some("Heuristic Analysis"));
    }

    #[test]
    fn summary_matches_result_panel_text() {
        let body = br#"{
            "prediction": "7",
            "confidence": 93,
            "method": "tensorflow",
            "top_predictions": [
                {"digit": 1, "confidence": 5},
                {"digit": 7, "confidence": 93},
                {"digit": 9, "confidence": 1.25},
                {"digit": 4, "confidence": 0.5}
            ]
        }"#;
        let prediction = Prediction::from_json(body).unwrap();
        assert_eq!(
            prediction.summary(3),
            "Did you draw a 7? (93% confidence) - Neural Network\n\
             Top predictions: 7 (93%), 1 (5%), 9 (1.3%)"
        );
    }

    #[test]
    fn every_error_shares_one_notice() {
        for err in [
            PredictionError::Timeout,
            PredictionError::Status(500),
            PredictionError::Busy,
            PredictionError::MalformedResponse("x".into()),
        ] {
            assert_eq!(err.user_message(), PREDICTION_FAILED_NOTICE);
        }
    }

    #[test]
    fn health_status_tolerates_partial_bodies() {
        let health: HealthStatus =
            serde_json::from_str(r#"{"status":"ok","fallback_only":false,"uptime":3}"#).unwrap();
        assert!(health.is_ok());
        assert_eq!(health.message, None);
        assert!(health.to_string().contains("fallback only: false"));
    }
}
