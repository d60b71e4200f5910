//! Interview session controller
//!
//! The top-level state machine. Owns the session configuration and the
//! transcript, sequences media acquisition, the detection loop, answer
//! recording and submission, and invokes the summary generator exactly once
//! at end of session (normal or forced).

use super::state::{
    Difficulty, Exchange, SessionPhase, ANSWER_PLACEHOLDER, SUBMISSION_RETRY_MESSAGE,
    TERMINATION_SUMMARY_DELAY,
};
use super::summary::{SummaryGenerator, SummaryOutcome};
use crate::capture::{CaptureDevice, CaptureError, MediaStream, StreamConstraints};
use crate::detection::{detection_loop, ClassifierError, FrameClassifier};
use crate::proctor::{
    IntegritySignal, ProctoringTelemetry, SignalCategory, Verdict, WarningAggregator, MAX_WARNINGS,
};
use crate::recorder::{RecordingController, RecordingError};
use crate::scoring::{AnswerFeedback, ScoringError, ScoringService, SummaryService};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Session errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Job description cannot be empty")]
    EmptyJobDescription,

    #[error("Invalid session phase: {actual:?} (expected {expected:?})")]
    InvalidPhase {
        expected: SessionPhase,
        actual: SessionPhase,
    },

    #[error("Capture device unavailable: {0}")]
    DeviceUnavailable(#[source] CaptureError),

    #[error("Classifier unavailable: {0}")]
    ClassifierUnavailable(#[source] ClassifierError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error(transparent)]
    Recording(#[from] RecordingError),
}

/// Events emitted over the session's broadcast channel
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The interview started; carries the opening question
    Started { question: String },
    /// An answer was scored; the transcript advanced
    AnswerAccepted {
        feedback: String,
        next_question: String,
    },
    /// An answer submission failed; the candidate may retry the same question
    SubmissionFailed { message: String },
    /// An integrity warning was accepted
    Warning {
        number: u32,
        max: u32,
        message: String,
    },
    /// The warning limit was crossed; the session is over
    Terminated { reason: String },
    /// The end-of-session summary settled
    SummaryReady(SummaryOutcome),
    /// The user ended the session normally
    Ended,
}

struct SessionInner {
    id: Uuid,
    phase: RwLock<SessionPhase>,
    job_description: RwLock<String>,
    difficulty: RwLock<Difficulty>,
    history: RwLock<Vec<Exchange>>,
    current_question: RwLock<String>,
    termination_reason: RwLock<Option<String>>,
    aggregator: WarningAggregator,
    recorder: tokio::sync::Mutex<RecordingController>,
    stream: Mutex<Option<Arc<dyn MediaStream>>>,
    loop_token: Mutex<Option<CancellationToken>>,
    signal_tx: Mutex<Option<mpsc::Sender<IntegritySignal>>>,
    capture: Arc<dyn CaptureDevice>,
    classifier: Arc<dyn FrameClassifier>,
    scoring: Arc<dyn ScoringService>,
    summary: SummaryGenerator,
    event_tx: broadcast::Sender<SessionEvent>,
}

/// Drives one proctored mock-interview session
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<SessionInner>,
}

impl SessionController {
    pub fn new(
        capture: Arc<dyn CaptureDevice>,
        classifier: Arc<dyn FrameClassifier>,
        scoring: Arc<dyn ScoringService>,
        summary_service: Arc<dyn SummaryService>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            inner: Arc::new(SessionInner {
                id: Uuid::new_v4(),
                phase: RwLock::new(SessionPhase::Setup),
                job_description: RwLock::new(String::new()),
                difficulty: RwLock::new(Difficulty::default()),
                history: RwLock::new(Vec::new()),
                current_question: RwLock::new(String::new()),
                termination_reason: RwLock::new(None),
                aggregator: WarningAggregator::new(),
                recorder: tokio::sync::Mutex::new(RecordingController::new()),
                stream: Mutex::new(None),
                loop_token: Mutex::new(None),
                signal_tx: Mutex::new(None),
                capture,
                classifier,
                scoring,
                summary: SummaryGenerator::new(summary_service),
                event_tx,
            }),
        }
    }

    /// Session id
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Current session phase
    pub fn phase(&self) -> SessionPhase {
        *self.inner.phase.read()
    }

    /// Snapshot of the transcript so far
    pub fn history(&self) -> Vec<Exchange> {
        self.inner.history.read().clone()
    }

    /// The question currently awaiting an answer
    pub fn current_question(&self) -> String {
        self.inner.current_question.read().clone()
    }

    /// The job description the interview is conducted against
    pub fn job_description(&self) -> String {
        self.inner.job_description.read().clone()
    }

    /// The chosen interview difficulty
    pub fn difficulty(&self) -> Difficulty {
        *self.inner.difficulty.read()
    }

    /// Per-category warning counts
    pub fn telemetry(&self) -> ProctoringTelemetry {
        self.inner.aggregator.snapshot()
    }

    /// Termination reason, populated only on forced termination
    pub fn termination_reason(&self) -> Option<String> {
        self.inner.termination_reason.read().clone()
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.event_tx.subscribe()
    }

    fn expect_phase(&self, expected: SessionPhase) -> Result<(), SessionError> {
        let actual = *self.inner.phase.read();
        if actual == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidPhase { expected, actual })
        }
    }

    /// Supply the job description the interview is conducted against.
    ///
    /// Setup -> DifficultySelect. Rejects empty or whitespace-only text.
    pub fn set_job_description(&self, text: &str) -> Result<(), SessionError> {
        self.expect_phase(SessionPhase::Setup)?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SessionError::EmptyJobDescription);
        }
        *self.inner.job_description.write() = trimmed.to_owned();
        *self.inner.phase.write() = SessionPhase::DifficultySelect;
        Ok(())
    }

    /// Choose the interview difficulty. DifficultySelect -> Confirmed.
    pub fn choose_difficulty(&self, difficulty: Difficulty) -> Result<(), SessionError> {
        self.expect_phase(SessionPhase::DifficultySelect)?;
        *self.inner.difficulty.write() = difficulty;
        *self.inner.phase.write() = SessionPhase::Confirmed;
        Ok(())
    }

    /// Start the interview. Confirmed -> Active.
    ///
    /// Acquires the capture stream, loads the classifier, and fetches the
    /// opening question. Any failure releases what was acquired and leaves
    /// the session in Confirmed so the caller can retry.
    pub async fn start(&self) -> Result<(), SessionError> {
        self.expect_phase(SessionPhase::Confirmed)?;

        let stream = self
            .inner
            .capture
            .acquire(StreamConstraints::default())
            .await
            .map_err(SessionError::DeviceUnavailable)?;
        let stream: Arc<dyn MediaStream> = Arc::from(stream);

        if let Err(err) = self.inner.classifier.load().await {
            stream.stop();
            return Err(SessionError::ClassifierUnavailable(err));
        }

        let job_description = self.inner.job_description.read().clone();
        let difficulty = *self.inner.difficulty.read();
        let opening = match self
            .inner
            .scoring
            .opening_question(&job_description, &[], difficulty)
            .await
        {
            Ok(reply) => reply,
            Err(err) => {
                stream.stop();
                return Err(SessionError::Scoring(err));
            }
        };

        self.inner
            .history
            .write()
            .push(Exchange::interviewer(opening.clone()));
        *self.inner.current_question.write() = opening.clone();
        *self.inner.stream.lock() = Some(Arc::clone(&stream));

        // Arm proctoring: the detection loop feeds the same ordered side
        // channel the visibility collaborator uses, and one router task
        // applies every signal to the aggregator in arrival order.
        self.inner.aggregator.arm();
        let (signal_tx, signal_rx) = mpsc::channel(32);
        let token = CancellationToken::new();
        tokio::spawn(detection_loop(
            stream,
            Arc::clone(&self.inner.classifier),
            signal_tx.clone(),
            token.clone(),
        ));
        *self.inner.loop_token.lock() = Some(token);
        *self.inner.signal_tx.lock() = Some(signal_tx);
        tokio::spawn(SessionInner::route_signals(
            Arc::clone(&self.inner),
            signal_rx,
        ));

        *self.inner.phase.write() = SessionPhase::Active;
        let _ = self.inner.event_tx.send(SessionEvent::Started {
            question: opening,
        });
        tracing::info!(session = %self.inner.id, "interview session started");
        Ok(())
    }

    /// Begin recording an answer to the current question.
    pub async fn begin_answer(&self) -> Result<(), SessionError> {
        self.expect_phase(SessionPhase::Active)?;

        let chunks = {
            let stream = self.inner.stream.lock();
            let stream = stream
                .as_ref()
                .ok_or(SessionError::DeviceUnavailable(CaptureError::StreamClosed))?;
            stream.chunks()
        };

        self.inner.recorder.lock().await.start(chunks)?;
        Ok(())
    }

    /// Stop recording, submit the answer for scoring, and advance the
    /// transcript.
    ///
    /// On success three exchanges are appended (the question, the spoken
    /// answer placeholder, the combined feedback plus next question) and
    /// `current_question` advances. On failure nothing is appended, the
    /// question is unchanged, and recording is re-enabled so the candidate
    /// can retry; the retry message is surfaced as an interviewer-voice
    /// event.
    pub async fn submit_answer(&self) -> Result<(), SessionError> {
        self.expect_phase(SessionPhase::Active)?;

        let artifact = self.inner.recorder.lock().await.stop().await?;
        let question = self.inner.current_question.read().clone();
        let job_description = self.inner.job_description.read().clone();

        let result = self
            .inner
            .scoring
            .score_answer(&artifact, &question, &job_description)
            .await;

        // Success or failure, the recorder returns to idle.
        self.inner.recorder.lock().await.finish_submission();

        match result {
            Ok(AnswerFeedback {
                feedback,
                next_question,
            }) => {
                if *self.inner.phase.read() != SessionPhase::Active {
                    tracing::warn!("session ended during submission; feedback discarded");
                    return Ok(());
                }

                {
                    let mut history = self.inner.history.write();
                    history.push(Exchange::interviewer(question));
                    history.push(Exchange::candidate(ANSWER_PLACEHOLDER));
                    history.push(Exchange::interviewer(format!(
                        "{feedback}\n\nNext question: {next_question}"
                    )));
                }
                *self.inner.current_question.write() = next_question.clone();

                let _ = self.inner.event_tx.send(SessionEvent::AnswerAccepted {
                    feedback,
                    next_question,
                });
                Ok(())
            }
            Err(err) => {
                tracing::warn!("answer submission failed: {err}");
                let _ = self.inner.event_tx.send(SessionEvent::SubmissionFailed {
                    message: SUBMISSION_RETRY_MESSAGE.to_owned(),
                });
                Err(SessionError::Scoring(err))
            }
        }
    }

    /// Visibility collaborator entry point: the page lost visibility.
    ///
    /// Consumed only while Active; routed through the same ordered channel
    /// as the detection loop's signals.
    pub fn report_tab_hidden(&self) {
        if *self.inner.phase.read() != SessionPhase::Active {
            return;
        }
        let guard = self.inner.signal_tx.lock();
        if let Some(tx) = guard.as_ref() {
            if tx
                .try_send(IntegritySignal::now(SignalCategory::TabSwitch))
                .is_err()
            {
                tracing::warn!("dropping tab-switch signal: channel closed or full");
            }
        }
    }

    /// End the session at the user's request. Active -> Summarized,
    /// skipping Terminated.
    pub async fn end(&self) -> Result<SummaryOutcome, SessionError> {
        {
            let mut phase = self.inner.phase.write();
            if *phase != SessionPhase::Active {
                return Err(SessionError::InvalidPhase {
                    expected: SessionPhase::Active,
                    actual: *phase,
                });
            }
            *phase = SessionPhase::Summarized;
        }

        self.inner.shutdown_active().await;
        let outcome = self.inner.run_summary(None).await;

        let _ = self.inner.event_tx.send(SessionEvent::Ended);
        let _ = self
            .inner
            .event_tx
            .send(SessionEvent::SummaryReady(outcome.clone()));
        tracing::info!(session = %self.inner.id, "interview session ended");
        Ok(outcome)
    }
}

impl SessionInner {
    /// Apply integrity signals to the aggregator in arrival order.
    async fn route_signals(inner: Arc<SessionInner>, mut rx: mpsc::Receiver<IntegritySignal>) {
        while let Some(signal) = rx.recv().await {
            match inner.aggregator.report(&signal) {
                Verdict::Ignored => {}
                Verdict::Warned {
                    number,
                    max,
                    message,
                } => {
                    let _ = inner.event_tx.send(SessionEvent::Warning {
                        number,
                        max,
                        message,
                    });
                }
                Verdict::Terminated { warning, reason } => {
                    let _ = inner.event_tx.send(SessionEvent::Warning {
                        number: MAX_WARNINGS,
                        max: MAX_WARNINGS,
                        message: warning,
                    });
                    tokio::spawn(SessionInner::force_terminate(Arc::clone(&inner), reason));
                }
            }
        }
    }

    /// Forced termination: Active -> Terminated -> (delay) -> Summarized.
    async fn force_terminate(inner: Arc<SessionInner>, reason: String) {
        {
            let mut phase = inner.phase.write();
            if *phase != SessionPhase::Active {
                return;
            }
            *phase = SessionPhase::Terminated;
        }
        *inner.termination_reason.write() = Some(reason.clone());
        tracing::warn!(session = %inner.id, %reason, "session forcibly terminated");

        inner.shutdown_active().await;
        let _ = inner.event_tx.send(SessionEvent::Terminated {
            reason: reason.clone(),
        });

        // The summary request always carries the termination reason; it is
        // never silently dropped.
        tokio::time::sleep(TERMINATION_SUMMARY_DELAY).await;
        let outcome = inner.run_summary(Some(reason)).await;
        *inner.phase.write() = SessionPhase::Summarized;
        let _ = inner.event_tx.send(SessionEvent::SummaryReady(outcome));
    }

    /// Tear down everything that entering Active set up: cancel the
    /// detection loop, close the signal channel, disarm the aggregator,
    /// abandon any open recording, release the capture stream.
    async fn shutdown_active(&self) {
        if let Some(token) = self.loop_token.lock().take() {
            token.cancel();
        }
        self.signal_tx.lock().take();
        self.aggregator.disarm();
        self.recorder.lock().await.abort();
        let stream = self.stream.lock().take();
        if let Some(stream) = stream {
            stream.stop();
        }
    }

    async fn run_summary(&self, termination_reason: Option<String>) -> SummaryOutcome {
        let job_description = self.job_description.read().clone();
        let history = self.history.read().clone();
        let telemetry = self.aggregator.snapshot();
        self.summary
            .generate(&job_description, &history, telemetry, termination_reason)
            .await
    }
}
