//! Answer recording controller
//!
//! Captures one answer segment at a time from the live stream. A buffering
//! task subscribes to the stream's chunk channel and appends segments in
//! arrival order; `stop()` finalizes them into a single [`AnswerArtifact`]
//! for the submission pipeline.

use super::state::{AnswerArtifact, RecordingPhase};
use crate::capture::StreamChunk;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Recording contract errors
///
/// These are programming-contract failures, not user-facing conditions: a
/// correct caller never starts a recording while one is active.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecordingError {
    #[error("A recording is already in progress")]
    AlreadyRecording,

    #[error("No recording in progress")]
    NotRecording,
}

/// Records one answer segment at a time
pub struct RecordingController {
    phase: Arc<RwLock<RecordingPhase>>,
    buffer: Arc<Mutex<Vec<StreamChunk>>>,
    worker: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl RecordingController {
    pub fn new() -> Self {
        Self {
            phase: Arc::new(RwLock::new(RecordingPhase::Idle)),
            buffer: Arc::new(Mutex::new(Vec::new())),
            worker: None,
            cancel_token: None,
        }
    }

    /// Current recorder phase
    pub fn phase(&self) -> RecordingPhase {
        *self.phase.read()
    }

    /// Begin buffering stream data for a new answer.
    ///
    /// Fails with [`RecordingError::AlreadyRecording`] unless the recorder is
    /// idle: at most one recording exists per session at any time.
    pub fn start(
        &mut self,
        mut chunks: broadcast::Receiver<StreamChunk>,
    ) -> Result<(), RecordingError> {
        if *self.phase.read() != RecordingPhase::Idle {
            return Err(RecordingError::AlreadyRecording);
        }

        self.buffer.lock().clear();

        let token = CancellationToken::new();
        let worker_token = token.clone();
        let buffer = Arc::clone(&self.buffer);

        let worker = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = worker_token.cancelled() => {
                        // Drain whatever the stream already delivered so the
                        // artifact holds every segment up to the stop call.
                        while let Ok(chunk) = chunks.try_recv() {
                            buffer.lock().push(chunk);
                        }
                        break;
                    }
                    received = chunks.recv() => match received {
                        Ok(chunk) => buffer.lock().push(chunk),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "recording buffer lagged behind the stream");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
        });

        self.worker = Some(worker);
        self.cancel_token = Some(token);
        *self.phase.write() = RecordingPhase::Recording;
        tracing::info!("answer recording started");
        Ok(())
    }

    /// Finalize the buffered segment into a single answer artifact.
    ///
    /// Fails with [`RecordingError::NotRecording`] unless a recording is in
    /// progress. On success the recorder moves to `Submitting` and the buffer
    /// is cleared; call [`finish_submission`](Self::finish_submission) once
    /// the submission settles.
    pub async fn stop(&mut self) -> Result<AnswerArtifact, RecordingError> {
        if *self.phase.read() != RecordingPhase::Recording {
            return Err(RecordingError::NotRecording);
        }

        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        if let Some(worker) = self.worker.take() {
            if let Err(err) = worker.await {
                tracing::error!("recording buffer task failed to join: {err}");
            }
        }

        let chunks = std::mem::take(&mut *self.buffer.lock());
        let artifact = AnswerArtifact {
            data: chunks.concat(),
            finalized_at: Utc::now(),
        };

        *self.phase.write() = RecordingPhase::Submitting;
        tracing::info!(bytes = artifact.len(), "answer recording finalized");
        Ok(artifact)
    }

    /// Return to idle after a submission completes, success or failure.
    pub fn finish_submission(&self) {
        *self.phase.write() = RecordingPhase::Idle;
    }

    /// Abandon any recording in progress and reset to idle.
    ///
    /// Used when the session leaves Active while a recording is open; the
    /// buffered data is discarded.
    pub fn abort(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        self.worker = None;
        self.buffer.lock().clear();
        *self.phase.write() = RecordingPhase::Idle;
    }
}

impl Default for RecordingController {
    fn default() -> Self {
        Self::new()
    }
}
