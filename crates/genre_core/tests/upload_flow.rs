use genre_core::render::ResultView;
use genre_core::{
    Completion, ImageSource, Phase, PredictionResult, PredictionWorker, Predictor, SelectedImage,
    SubmitError, TransportError, UploadSession,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::{TempDir, tempdir};

/// Scripted predictor that counts how often it is asked.
struct Scripted {
    calls: AtomicUsize,
    fail: bool,
}

impl Scripted {
    fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: true,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Predictor for Scripted {
    fn predict(&self, _image: &SelectedImage) -> Result<PredictionResult, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TransportError::Status {
                status: 503,
                detail: None,
            });
        }
        let all: BTreeMap<String, f64> = [("Action", 0.82), ("N/A", 0.02), ("Comedy", 0.10)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        Ok(PredictionResult {
            top_3_genres: vec!["Action".into(), "Comedy".into(), "Drama".into()],
            probabilities: vec![0.82, 0.10, 0.05],
            all_predictions: Some(all),
            message: Some("Prediction successful".into()),
        })
    }
}

fn fixture_dir() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("poster.jpg"), b"\xFF\xD8\xFFjpeg").unwrap();
    fs::write(dir.path().join("second.png"), b"\x89PNGpng").unwrap();
    fs::write(dir.path().join("notes.txt"), b"plain text").unwrap();
    dir
}

fn wait_for(worker: &PredictionWorker) -> Completion {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(completion) = worker.try_recv() {
            return completion;
        }
        assert!(Instant::now() < deadline, "no completion within 5s");
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn picker_then_drop_stage_images_and_clear_state() {
    let dir = fixture_dir();
    let mut session = UploadSession::new();

    session
        .select_path(&dir.path().join("poster.jpg"), ImageSource::Picker)
        .unwrap();
    assert_eq!(session.phase(), Phase::Ready);

    let dropped = session
        .drop_files(vec![dir.path().join("second.png"), dir.path().join("poster.jpg")])
        .unwrap();
    assert!(dropped.is_ok());
    let selected = session.selected().unwrap();
    assert_eq!(selected.file_name(), "second.png");
    assert_eq!(selected.bytes(), b"\x89PNGpng");
    assert!(session.result().is_none());
    assert!(session.error().is_none());
}

#[test]
fn dropping_a_non_image_keeps_the_staged_poster() {
    let dir = fixture_dir();
    let mut session = UploadSession::new();
    session
        .select_path(&dir.path().join("poster.jpg"), ImageSource::Picker)
        .unwrap();

    let outcome = session.drop_files(vec![dir.path().join("notes.txt")]).unwrap();
    assert!(outcome.is_err());
    assert_eq!(session.selected().unwrap().file_name(), "poster.jpg");
    assert_eq!(session.error(), Some("Please drop an image file"));
    assert!(!session.drag_active());
}

#[test]
fn submitting_nothing_makes_no_request() {
    let predictor = Scripted::succeeding();
    let worker = PredictionWorker::new(predictor.clone());
    let mut session = UploadSession::new();

    match session.begin_submission() {
        Ok(submission) => worker.spawn(submission, || {}),
        Err(err) => assert_eq!(err, SubmitError::NoImage),
    }
    thread::sleep(Duration::from_millis(20));
    assert_eq!(predictor.calls(), 0);
    assert!(worker.drain().is_empty());
    assert_eq!(session.error(), Some("Please select an image!"));
}

#[test]
fn successful_round_trip_renders_ranked_genres() {
    let dir = fixture_dir();
    let predictor = Scripted::succeeding();
    let worker = PredictionWorker::new(predictor.clone());
    let mut session = UploadSession::new();
    session
        .select_path(&dir.path().join("poster.jpg"), ImageSource::Picker)
        .unwrap();

    let submission = session.begin_submission().unwrap();
    assert!(!session.can_submit());
    worker.spawn(submission, || {});
    assert!(session.complete(wait_for(&worker)));

    assert_eq!(predictor.calls(), 1);
    assert_eq!(session.phase(), Phase::Success);
    assert!(session.can_submit());

    let view = ResultView::from_result(session.result().unwrap());
    let top: Vec<_> = view
        .top
        .iter()
        .map(|b| (b.label.as_str(), b.percent.as_str()))
        .collect();
    assert_eq!(
        top,
        [("Action", "82.0%"), ("Comedy", "10.0%"), ("Drama", "5.0%")]
    );
    let extended: Vec<_> = view
        .distribution
        .unwrap()
        .into_iter()
        .map(|b| b.label)
        .collect();
    assert_eq!(extended, ["Action", "Comedy"]);
    assert_eq!(view.message.as_deref(), Some("Prediction successful"));
}

#[test]
fn failed_round_trip_shows_generic_message_and_allows_retry() {
    let dir = fixture_dir();
    let worker = PredictionWorker::new(Scripted::failing());
    let mut session = UploadSession::new();
    session
        .select_path(&dir.path().join("poster.jpg"), ImageSource::Picker)
        .unwrap();

    let submission = session.begin_submission().unwrap();
    worker.spawn(submission, || {});
    session.complete(wait_for(&worker));

    assert_eq!(session.phase(), Phase::Failed);
    assert_eq!(
        session.error(),
        Some("Failed to make prediction. Please try again.")
    );
    assert!(!session.is_in_flight());
    assert!(session.can_submit());
}

#[test]
fn reselecting_during_flight_discards_the_late_answer() {
    let dir = fixture_dir();
    let worker = PredictionWorker::new(Scripted::succeeding());
    let mut session = UploadSession::new();
    session
        .select_path(&dir.path().join("poster.jpg"), ImageSource::Picker)
        .unwrap();
    let submission = session.begin_submission().unwrap();
    worker.spawn(submission, || {});

    let second: PathBuf = dir.path().join("second.png");
    session.select_path(&second, ImageSource::Picker).unwrap();
    assert!(session.can_submit());

    assert!(!session.complete(wait_for(&worker)));
    assert_eq!(session.phase(), Phase::Ready);
    assert!(session.result().is_none());
}
