//! Upload of staged posters to the genre inference service.

use crate::error::{ConfigError, TransportError};
use crate::intake::SelectedImage;
use crate::prediction::PredictionResult;
use crate::settings::{EndpointConfig, Settings};
use reqwest::Url;
use reqwest::blocking::{Client, multipart};
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Multipart field the service reads the poster from.
pub const IMAGE_FIELD: &str = "image";

/// Anything able to turn a poster into a genre prediction.
pub trait Predictor: Send + Sync {
    fn predict(&self, image: &SelectedImage) -> Result<PredictionResult, TransportError>;
}

/// Predictor backed by the remote HTTP service.
#[derive(Debug, Clone)]
pub struct HttpPredictor {
    client: Client,
    endpoint: Url,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpPredictor {
    pub fn new(endpoint: Url, timeout: Option<Duration>) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ConfigError::Client)?;
        Ok(Self { client, endpoint })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        Self::new(settings.endpoint_url()?, settings.request_timeout())
    }

    /// Like [`HttpPredictor::from_settings`], but an unusable endpoint falls
    /// back to the default one. `settings` keeps the configured value.
    pub fn from_settings_or_default(settings: &Settings) -> Result<Self, ConfigError> {
        match Self::from_settings(settings) {
            Err(ConfigError::InvalidUrl { url, reason }) => {
                tracing::error!("Configured endpoint {url:?} is unusable ({reason}); using default");
                Self::new(EndpointConfig::default().url()?, settings.request_timeout())
            }
            other => other,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl Predictor for HttpPredictor {
    fn predict(&self, image: &SelectedImage) -> Result<PredictionResult, TransportError> {
        let part = multipart::Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name().to_string())
            .mime_str(image.media_type())?;
        let form = multipart::Form::new().part(IMAGE_FIELD, part);

        let started = Instant::now();
        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()?;
        let status = response.status();
        let body = response.bytes()?;
        tracing::debug!(
            endpoint = %self.endpoint,
            status = status.as_u16(),
            bytes = body.len(),
            elapsed = ?started.elapsed(),
            "Prediction response"
        );

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                detail: server_error_detail(&body),
            });
        }
        PredictionResult::from_json(&body)
    }
}

/// Extracts `{"error": "..."}` from a failed response, if present.
fn server_error_detail(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .map(|b| b.error)
        .filter(|e| !e.trim().is_empty())
}
