//! Background execution of submissions.
//!
//! Each submission runs on its own short-lived thread; outcomes come back
//! over a channel the UI drains once per frame.

use crate::client::Predictor;
use crate::error::TransportError;
use crate::prediction::PredictionResult;
use crate::session::{Completion, Submission, SubmissionId};
use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

pub struct PredictionWorker {
    predictor: Arc<dyn Predictor>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl PredictionWorker {
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { predictor, tx, rx }
    }

    /// Swaps the predictor used by later submissions. Requests already
    /// running keep the one they started with.
    pub fn set_predictor(&mut self, predictor: Arc<dyn Predictor>) {
        self.predictor = predictor;
    }

    /// Runs `submission` in the background. `notify` is called once the
    /// outcome has been queued, whatever it is.
    ///
    /// If no thread can be started the failure is queued straight away, so
    /// the session still leaves its in-flight state.
    pub fn spawn<F>(&self, submission: Submission, notify: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let Submission { id, image } = submission;
        let predictor = Arc::clone(&self.predictor);
        let tx = self.tx.clone();
        let notify = Arc::new(notify);
        let worker_notify = Arc::clone(&notify);
        let spawned = thread::Builder::new()
            .name(format!("predict-{}", id.as_u64()))
            .spawn(move || {
                let guard = CompletionGuard::new(id, tx, move || worker_notify());
                let outcome = predictor.predict(&image);
                guard.finish(outcome);
            });
        if let Err(err) = spawned {
            self.report_spawn_failure(id, err, || notify());
        }
    }

    fn report_spawn_failure(&self, id: SubmissionId, err: io::Error, notify: impl FnOnce()) {
        tracing::error!(submission = %id, "Failed to spawn prediction worker: {err}");
        let _ = self.tx.send(Completion {
            id,
            outcome: Err(TransportError::Spawn(err)),
        });
        notify();
    }

    /// Next queued outcome, if any.
    pub fn try_recv(&self) -> Option<Completion> {
        match self.rx.try_recv() {
            Ok(completion) => Some(completion),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// All outcomes queued so far.
    pub fn drain(&self) -> Vec<Completion> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

/// Reports exactly one outcome for a submission. Dropped without
/// [`CompletionGuard::finish`] (the predictor panicked), it reports
/// [`TransportError::Interrupted`].
struct CompletionGuard<F: FnOnce()> {
    id: SubmissionId,
    tx: Sender<Completion>,
    notify: Option<F>,
    reported: bool,
}

impl<F: FnOnce()> CompletionGuard<F> {
    fn new(id: SubmissionId, tx: Sender<Completion>, notify: F) -> Self {
        Self {
            id,
            tx,
            notify: Some(notify),
            reported: false,
        }
    }

    fn finish(mut self, outcome: Result<PredictionResult, TransportError>) {
        self.report(outcome);
    }

    fn report(&mut self, outcome: Result<PredictionResult, TransportError>) {
        if self.reported {
            return;
        }
        self.reported = true;
        let completion = Completion {
            id: self.id,
            outcome,
        };
        if self.tx.send(completion).is_err() {
            tracing::debug!(submission = %self.id, "Session gone before completion");
        }
        if let Some(notify) = self.notify.take() {
            notify();
        }
    }
}

impl<F: FnOnce()> Drop for CompletionGuard<F> {
    fn drop(&mut self) {
        if !self.reported {
            tracing::warn!(submission = %self.id, "Prediction worker ended without an outcome");
            self.report(Err(TransportError::Interrupted));
        }
    }
}
