//! Core of the poster genre predictor: intake of poster files, the
//! upload/predict session state machine, the HTTP client for the inference
//! service and the display model for its answers.
//!
//! Nothing in here touches a UI toolkit; the GUI crate drives an
//! [`UploadSession`] and a [`PredictionWorker`] from its frame loop.

pub mod client;
pub mod error;
pub mod intake;
pub mod prediction;
pub mod render;
pub mod session;
pub mod settings;
pub mod worker;

pub use client::{HttpPredictor, IMAGE_FIELD, Predictor};
pub use error::{
    ConfigError, DROP_NOT_IMAGE, IntakeError, NO_IMAGE_SELECTED, PICK_NOT_IMAGE, SubmitError,
    TransportError, UNREADABLE_FILE,
};
pub use intake::{
    ImageSource, PreviewKey, SelectedImage, image_extensions, media_type_for_path,
};
pub use prediction::{PredictionResult, UNCLASSIFIED_LABEL};
pub use render::{GenreBar, ResultView};
pub use session::{
    Completion, DragEvent, PREDICTION_FAILED, Phase, Submission, SubmissionId, UploadSession,
};
pub use settings::{EndpointConfig, Settings, Theme};
pub use worker::PredictionWorker;
