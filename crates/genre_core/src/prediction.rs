use crate::error::TransportError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Genre key the service uses for "no classification". Never displayed.
pub const UNCLASSIFIED_LABEL: &str = "N/A";

/// Genre prediction returned by the inference service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Best genres, most likely first.
    pub top_3_genres: Vec<String>,
    /// Probabilities in [0,1], aligned with `top_3_genres`.
    pub probabilities: Vec<f64>,
    /// Full distribution over every genre the model knows, when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_predictions: Option<BTreeMap<String, f64>>,
    /// Free-form status line from the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PredictionResult {
    /// Parses a response body, rejecting bodies whose genre and probability
    /// lists do not line up.
    pub fn from_json(body: &[u8]) -> Result<Self, TransportError> {
        let result: Self = serde_json::from_slice(body).map_err(TransportError::Malformed)?;
        if result.top_3_genres.len() != result.probabilities.len() {
            return Err(TransportError::Inconsistent {
                genres: result.top_3_genres.len(),
                probabilities: result.probabilities.len(),
            });
        }
        Ok(result)
    }

    /// Genre/probability pairs in ranked order.
    pub fn top_genres(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.top_3_genres
            .iter()
            .map(String::as_str)
            .zip(self.probabilities.iter().copied())
    }

    pub fn best_genre(&self) -> Option<(&str, f64)> {
        self.top_genres().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parses_full_service_response() {
        let body = br#"{
            "top_3_genres": ["Action", "Comedy", "Drama"],
            "probabilities": [0.82, 0.10, 0.05],
            "all_predictions": {"Action": 0.82, "N/A": 0.02, "Comedy": 0.10, "Drama": 0.05},
            "message": "Prediction successful"
        }"#;
        let result = PredictionResult::from_json(body).unwrap();
        assert_eq!(result.top_3_genres, ["Action", "Comedy", "Drama"]);
        let (best, p) = result.best_genre().unwrap();
        assert_eq!(best, "Action");
        assert_relative_eq!(p, 0.82);
        assert_eq!(result.all_predictions.as_ref().map(|m| m.len()), Some(4));
        assert_eq!(result.message.as_deref(), Some("Prediction successful"));
    }

    #[test]
    fn distribution_is_optional() {
        let body = br#"{"top_3_genres": ["Horror"], "probabilities": [0.4]}"#;
        let result = PredictionResult::from_json(body).unwrap();
        assert!(result.all_predictions.is_none());
        assert!(result.message.is_none());
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let body = br#"{"top_3_genres": ["Action", "Comedy"], "probabilities": [0.9]}"#;
        let err = PredictionResult::from_json(body).unwrap_err();
        assert!(matches!(
            err,
            TransportError::Inconsistent {
                genres: 2,
                probabilities: 1
            }
        ));
    }

    #[test]
    fn error_bodies_are_malformed_predictions() {
        let body = br#"{"error": "No image file provided"}"#;
        let err = PredictionResult::from_json(body).unwrap_err();
        assert!(matches!(err, TransportError::Malformed(_)));
    }
}
