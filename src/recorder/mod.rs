//! Answer recording
//!
//! One answer segment is captured at a time from the live stream:
//! - RecordingController owns the Idle/Recording/Submitting state machine
//! - state types define the phases and the finalized artifact

pub mod controller;
pub mod state;

pub use controller::{RecordingController, RecordingError};
pub use state::{AnswerArtifact, RecordingPhase};
