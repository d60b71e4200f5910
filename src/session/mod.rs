//! Interview session orchestration
//!
//! - state types define the phase machine and the transcript model
//! - SessionController sequences capture, proctoring, recording, scoring
//! - the summary generator runs once at end of session

pub mod controller;
pub mod state;
pub mod summary;

pub use controller::{SessionController, SessionError, SessionEvent};
pub use state::{
    Difficulty, Exchange, Role, SessionPhase, ANSWER_PLACEHOLDER, SUBMISSION_RETRY_MESSAGE,
    TERMINATION_SUMMARY_DELAY,
};
pub use summary::{SummaryGenerator, SummaryOutcome};
