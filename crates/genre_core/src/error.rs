//! Error types shared across the crate.
//!
//! Every variant carries enough context for a log record. The strings shown
//! to users are fixed and come from [`IntakeError::user_message`],
//! [`SubmitError::user_message`] and [`crate::PREDICTION_FAILED`]; transport
//! causes never reach the UI.

use crate::intake::ImageSource;
use crate::session::SubmissionId;
use std::path::PathBuf;

/// Shown when a dropped file is not an image.
pub const DROP_NOT_IMAGE: &str = "Please drop an image file";
/// Shown when a picked file is not an image.
pub const PICK_NOT_IMAGE: &str = "Please select an image file";
/// Shown when the chosen file cannot be read.
pub const UNREADABLE_FILE: &str = "Could not read the selected file";
/// Shown when a submission is requested with nothing staged.
pub const NO_IMAGE_SELECTED: &str = "Please select an image!";

/// A candidate file was refused at intake.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("{path} is not an image (declared type {media_type})")]
    NotAnImage {
        path: PathBuf,
        media_type: String,
        origin: ImageSource,
    },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IntakeError {
    /// Message displayed in place of a prediction.
    pub fn user_message(&self) -> &'static str {
        match self {
            IntakeError::NotAnImage {
                origin: ImageSource::Drop,
                ..
            } => DROP_NOT_IMAGE,
            IntakeError::NotAnImage {
                origin: ImageSource::Picker,
                ..
            } => PICK_NOT_IMAGE,
            IntakeError::Read { .. } => UNREADABLE_FILE,
        }
    }
}

/// A submission could not be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("no image staged")]
    NoImage,
    #[error("submission {0} is still in flight")]
    Busy(SubmissionId),
}

impl SubmitError {
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            SubmitError::NoImage => Some(NO_IMAGE_SELECTED),
            SubmitError::Busy(_) => None,
        }
    }
}

/// Anything that went wrong between sending the poster and holding a
/// usable prediction.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server answered {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: Option<String> },
    #[error("response body is not a prediction: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("response lists {genres} genres but {probabilities} probabilities")]
    Inconsistent { genres: usize, probabilities: usize },
    #[error("could not start prediction worker: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("prediction worker ended without reporting an outcome")]
    Interrupted,
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {d}"))
        .unwrap_or_default()
}

/// Settings could not be loaded, saved or turned into an endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write settings {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid endpoint url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
}
