//! Proctored mock-interview session controller.
//!
//! Runs a live mock interview end to end: acquires the local capture stream,
//! continuously monitors the candidate through an injected frame classifier,
//! aggregates integrity warnings with a global cooldown (forcing termination
//! at the limit), records one spoken answer at a time, submits answers to a
//! remote AI scoring service, and produces a final session summary.
//!
//! The embedding UI drives everything through [`SessionController`] and the
//! capability traits; no platform capture, model, or rendering code lives in
//! this crate.

pub mod capture;
pub mod detection;
pub mod proctor;
pub mod recorder;
pub mod scoring;
pub mod session;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use capture::{CaptureDevice, CaptureError, MediaStream, StreamConstraints, VideoFrame};
pub use detection::{ClassifierError, Detection, FrameClassifier};
pub use proctor::{ProctoringTelemetry, SignalCategory, WarningAggregator};
pub use recorder::{AnswerArtifact, RecordingController, RecordingError, RecordingPhase};
pub use scoring::{HttpInterviewClient, ScoringError, ScoringService, SummaryReport, SummaryService};
pub use session::{
    Difficulty, Exchange, Role, SessionController, SessionError, SessionEvent, SessionPhase,
    SummaryOutcome,
};
pub use utils::{AppError, AppResult, ErrorResponse};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging for the embedding application.
///
/// Call once at startup; honors `RUST_LOG` when set.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "interview_proctor=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
