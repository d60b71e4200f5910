//! Deterministic fakes for the capability traits, shared across test modules.

use crate::capture::{
    CaptureDevice, CaptureError, MediaStream, StreamChunk, StreamConstraints, VideoFrame,
};
use crate::detection::{ClassifierError, Detection, FrameClassifier};
use crate::recorder::AnswerArtifact;
use crate::scoring::{
    AnswerFeedback, ScoringError, ScoringService, SummarizeRequest, SummaryReport, SummaryService,
};
use crate::session::{Difficulty, Exchange};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Notify};
use tokio::time::Duration;

/// Scripted media stream: frames are handed out with per-frame delays and
/// chunks are pushed by the test.
pub(crate) struct FakeStream {
    frames: Mutex<VecDeque<(Duration, VideoFrame)>>,
    chunk_tx: broadcast::Sender<StreamChunk>,
    stopped: AtomicBool,
    stop_notify: Notify,
}

impl FakeStream {
    pub fn new() -> Self {
        let (chunk_tx, _) = broadcast::channel(32);
        Self {
            frames: Mutex::new(VecDeque::new()),
            chunk_tx,
            stopped: AtomicBool::new(false),
            stop_notify: Notify::new(),
        }
    }

    /// Queue a frame to be delivered after `delay` of stream time.
    pub fn queue_frame(&self, delay: Duration, frame: VideoFrame) {
        self.frames.lock().push_back((delay, frame));
    }

    /// Deliver one encoded chunk to subscribers.
    pub fn push_chunk(&self, chunk: StreamChunk) {
        let _ = self.chunk_tx.send(chunk);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn stop_stream(&self) {
        MediaStream::stop(self);
    }
}

#[async_trait]
impl MediaStream for FakeStream {
    async fn next_frame(&self) -> Option<VideoFrame> {
        loop {
            if self.is_stopped() {
                return None;
            }
            let next = self.frames.lock().pop_front();
            match next {
                Some((delay, frame)) => {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    if self.is_stopped() {
                        return None;
                    }
                    return Some(frame);
                }
                // No scripted frames left: park until the stream stops.
                None => self.stop_notify.notified().await,
            }
        }
    }

    fn chunks(&self) -> broadcast::Receiver<StreamChunk> {
        self.chunk_tx.subscribe()
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.stop_notify.notify_waiters();
    }
}

/// Capture device that hands out one shared [`FakeStream`], optionally
/// denying access.
pub(crate) struct FakeCaptureDevice {
    stream: Arc<FakeStream>,
    deny: AtomicBool,
}

impl FakeCaptureDevice {
    pub fn new() -> Self {
        Self {
            stream: Arc::new(FakeStream::new()),
            deny: AtomicBool::new(false),
        }
    }

    /// The stream every `acquire` call resolves to.
    pub fn stream(&self) -> Arc<FakeStream> {
        Arc::clone(&self.stream)
    }

    pub fn deny_access(&self) {
        self.deny.store(true, Ordering::SeqCst);
    }

    pub fn allow_access(&self) {
        self.deny.store(false, Ordering::SeqCst);
    }
}

struct SharedStream(Arc<FakeStream>);

#[async_trait]
impl MediaStream for SharedStream {
    async fn next_frame(&self) -> Option<VideoFrame> {
        self.0.next_frame().await
    }

    fn chunks(&self) -> broadcast::Receiver<StreamChunk> {
        self.0.chunks()
    }

    fn stop(&self) {
        MediaStream::stop(self.0.as_ref());
    }
}

#[async_trait]
impl CaptureDevice for FakeCaptureDevice {
    async fn acquire(
        &self,
        _constraints: StreamConstraints,
    ) -> Result<Box<dyn MediaStream>, CaptureError> {
        if self.deny.load(Ordering::SeqCst) {
            return Err(CaptureError::PermissionDenied(
                "camera access denied".into(),
            ));
        }
        Ok(Box::new(SharedStream(self.stream())))
    }
}

/// Classifier with scripted per-tick detections.
///
/// When the script runs out it reports a single confident person, which
/// derives no signal.
pub(crate) struct FakeClassifier {
    load_error: Mutex<Option<ClassifierError>>,
    detections: Mutex<VecDeque<Vec<Detection>>>,
    fail_next_detect: AtomicBool,
}

impl FakeClassifier {
    pub fn new() -> Self {
        Self {
            load_error: Mutex::new(None),
            detections: Mutex::new(VecDeque::new()),
            fail_next_detect: AtomicBool::new(false),
        }
    }

    pub fn fail_load(&self) {
        *self.load_error.lock() = Some(ClassifierError::LoadFailed("model missing".into()));
    }

    pub fn queue_detections(&self, detections: Vec<Detection>) {
        self.detections.lock().push_back(detections);
    }

    pub fn fail_next_detect(&self) {
        self.fail_next_detect.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl FrameClassifier for FakeClassifier {
    async fn load(&self) -> Result<(), ClassifierError> {
        match self.load_error.lock().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn detect(&self, _frame: &VideoFrame) -> Result<Vec<Detection>, ClassifierError> {
        if self.fail_next_detect.swap(false, Ordering::SeqCst) {
            return Err(ClassifierError::Inference("injected failure".into()));
        }
        Ok(self
            .detections
            .lock()
            .pop_front()
            .unwrap_or_else(|| vec![Detection::new("person", 0.9)]))
    }
}

/// One recorded scoring call
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScoredAnswer {
    pub question: String,
    pub job_description: String,
    pub artifact_bytes: Vec<u8>,
}

/// Scoring service with a scripted opening question and answer feedback.
pub(crate) struct FakeScoringService {
    opening: Mutex<String>,
    feedback: Mutex<VecDeque<AnswerFeedback>>,
    fail_opening: AtomicBool,
    fail_next_answer: AtomicBool,
    scored: Mutex<Vec<ScoredAnswer>>,
}

impl FakeScoringService {
    pub fn new(opening: impl Into<String>) -> Self {
        Self {
            opening: Mutex::new(opening.into()),
            feedback: Mutex::new(VecDeque::new()),
            fail_opening: AtomicBool::new(false),
            fail_next_answer: AtomicBool::new(false),
            scored: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_feedback(&self, feedback: impl Into<String>, next_question: impl Into<String>) {
        self.feedback.lock().push_back(AnswerFeedback {
            feedback: feedback.into(),
            next_question: next_question.into(),
        });
    }

    pub fn fail_opening(&self) {
        self.fail_opening.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_answer(&self) {
        self.fail_next_answer.store(true, Ordering::SeqCst);
    }

    /// Calls recorded by `score_answer`, in order.
    pub fn scored(&self) -> Vec<ScoredAnswer> {
        self.scored.lock().clone()
    }

    fn unavailable() -> ScoringError {
        ScoringError::Status {
            status: 500,
            message: "scoring backend unavailable".into(),
        }
    }
}

#[async_trait]
impl ScoringService for FakeScoringService {
    async fn opening_question(
        &self,
        _job_description: &str,
        _history: &[Exchange],
        _difficulty: Difficulty,
    ) -> Result<String, ScoringError> {
        if self.fail_opening.swap(false, Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        Ok(self.opening.lock().clone())
    }

    async fn score_answer(
        &self,
        artifact: &AnswerArtifact,
        question: &str,
        job_description: &str,
    ) -> Result<AnswerFeedback, ScoringError> {
        if self.fail_next_answer.swap(false, Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.scored.lock().push(ScoredAnswer {
            question: question.to_owned(),
            job_description: job_description.to_owned(),
            artifact_bytes: artifact.data.clone(),
        });
        Ok(self.feedback.lock().pop_front().unwrap_or(AnswerFeedback {
            feedback: "Reasonable answer.".into(),
            next_question: "Tell me more.".into(),
        }))
    }
}

/// Summarization service that captures the requests it receives.
pub(crate) struct FakeSummaryService {
    report: Mutex<SummaryReport>,
    fail_next: AtomicBool,
    requests: Mutex<Vec<SummarizeRequest>>,
}

impl FakeSummaryService {
    pub fn new(report: SummaryReport) -> Self {
        Self {
            report: Mutex::new(report),
            fail_next: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn last_request(&self) -> Option<SummarizeRequest> {
        self.requests.lock().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl SummaryService for FakeSummaryService {
    async fn summarize(&self, request: SummarizeRequest) -> Result<SummaryReport, ScoringError> {
        self.requests.lock().push(request);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ScoringError::Status {
                status: 503,
                message: "summarizer unavailable".into(),
            });
        }
        Ok(self.report.lock().clone())
    }
}
