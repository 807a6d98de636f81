//! Upload/predict interaction state.
//!
//! [`UploadSession`] owns everything the window shows: the staged poster,
//! the latest prediction or error, the in-flight submission and the drag
//! affordance. Every change goes through one of its methods; network
//! outcomes arrive as [`Completion`]s and are applied by [`UploadSession::complete`].

use crate::error::{IntakeError, SubmitError, TransportError};
use crate::intake::{ImageSource, SelectedImage};
use crate::prediction::PredictionResult;
use std::fmt;
use std::path::{Path, PathBuf};

/// Shown for every failed submission; the cause only goes to the log.
pub const PREDICTION_FAILED: &str = "Failed to make prediction. Please try again.";

/// Monotonically increasing identifier of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmissionId(u64);

impl SubmissionId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where the session stands in the select/submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Ready,
    Pending,
    Success,
    Failed,
}

/// Drag notifications for the drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
    Drop,
}

/// Work handed to a predictor: the poster and the id its outcome must carry.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: SubmissionId,
    pub image: SelectedImage,
}

/// Outcome of one submission, as reported by the worker.
#[derive(Debug)]
pub struct Completion {
    pub id: SubmissionId,
    pub outcome: Result<PredictionResult, TransportError>,
}

#[derive(Debug, Default)]
pub struct UploadSession {
    selected: Option<SelectedImage>,
    result: Option<PredictionResult>,
    error: Option<String>,
    in_flight: Option<SubmissionId>,
    /// Whether the latest applied submission failed.
    submission_failed: bool,
    last_submission: u64,
    drag_active: bool,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages `image`, replacing any earlier selection.
    ///
    /// Non-images are refused and leave the staged image in place. A
    /// submission still in flight is abandoned: its completion will no longer
    /// match and is dropped when it arrives.
    pub fn select_file(
        &mut self,
        image: SelectedImage,
        origin: ImageSource,
    ) -> Result<(), IntakeError> {
        if !image.is_image() {
            return Err(self.reject(IntakeError::NotAnImage {
                path: image.path().to_path_buf(),
                media_type: image.media_type().to_string(),
                origin,
            }));
        }
        if let Some(id) = self.in_flight.take() {
            tracing::info!(submission = %id, "Abandoning in-flight submission for new selection");
        }
        tracing::info!(
            file = %image.path().display(),
            media_type = image.media_type(),
            bytes = image.len(),
            ?origin,
            "Poster selected"
        );
        self.selected = Some(image);
        self.result = None;
        self.error = None;
        self.submission_failed = false;
        Ok(())
    }

    /// Reads and stages the file at `path`.
    pub fn select_path(&mut self, path: &Path, origin: ImageSource) -> Result<(), IntakeError> {
        match SelectedImage::load(path, origin) {
            Ok(image) => self.select_file(image, origin),
            Err(err) => Err(self.reject(err)),
        }
    }

    /// Handles files dropped on the window. Only the first path counts;
    /// returns `None` when nothing usable was dropped.
    pub fn drop_files<I>(&mut self, paths: I) -> Option<Result<(), IntakeError>>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.on_drag(DragEvent::Drop);
        let first = paths.into_iter().next()?;
        Some(self.select_path(&first, ImageSource::Drop))
    }

    pub fn on_drag(&mut self, event: DragEvent) {
        self.drag_active = matches!(event, DragEvent::Enter | DragEvent::Over);
    }

    /// Starts a submission of the staged poster.
    ///
    /// With nothing staged the session shows [`crate::NO_IMAGE_SELECTED`]
    /// and no request must be made. While another submission is in flight
    /// the call is refused without touching state.
    pub fn begin_submission(&mut self) -> Result<Submission, SubmitError> {
        if let Some(id) = self.in_flight {
            return Err(SubmitError::Busy(id));
        }
        let Some(image) = self.selected.clone() else {
            let err = SubmitError::NoImage;
            self.error = err.user_message().map(str::to_string);
            self.result = None;
            return Err(err);
        };
        self.last_submission += 1;
        let id = SubmissionId(self.last_submission);
        self.in_flight = Some(id);
        self.error = None;
        self.result = None;
        self.submission_failed = false;
        tracing::info!(
            submission = %id,
            file = %image.path().display(),
            "Submitting poster for prediction"
        );
        Ok(Submission { id, image })
    }

    /// Applies a worker outcome. Returns `false` when the completion belongs
    /// to a submission that is no longer current and was discarded.
    pub fn complete(&mut self, completion: Completion) -> bool {
        let Completion { id, outcome } = completion;
        if self.in_flight != Some(id) {
            tracing::debug!(submission = %id, current = ?self.in_flight, "Discarding stale completion");
            return false;
        }
        match outcome {
            Ok(result) => {
                tracing::info!(
                    submission = %id,
                    best = ?result.best_genre(),
                    "Prediction received"
                );
                self.result = Some(result);
                self.error = None;
            }
            Err(err) => {
                tracing::error!(submission = %id, "Error during prediction: {err}");
                self.result = None;
                self.error = Some(PREDICTION_FAILED.to_string());
                self.submission_failed = true;
            }
        }
        self.in_flight = None;
        true
    }

    pub fn selected(&self) -> Option<&SelectedImage> {
        self.selected.as_ref()
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn in_flight(&self) -> Option<SubmissionId> {
        self.in_flight
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn drag_active(&self) -> bool {
        self.drag_active
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && self.in_flight.is_none()
    }

    pub fn phase(&self) -> Phase {
        if self.in_flight.is_some() {
            Phase::Pending
        } else if self.selected.is_none() {
            Phase::Idle
        } else if self.result.is_some() {
            Phase::Success
        } else if self.submission_failed {
            Phase::Failed
        } else {
            Phase::Ready
        }
    }

    fn reject(&mut self, err: IntakeError) -> IntakeError {
        tracing::warn!("Rejected poster: {err}");
        self.error = Some(err.user_message().to_string());
        self.result = None;
        self.submission_failed = false;
        err
    }
}
