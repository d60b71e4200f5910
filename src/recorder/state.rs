//! Recording state types
//!
//! Defines the answer-recording state machine and the finalized artifact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current phase of the answer recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingPhase {
    /// No recording in progress
    Idle,
    /// Buffering stream data for the current answer
    Recording,
    /// Answer finalized and handed to the submission pipeline
    Submitting,
}

impl Default for RecordingPhase {
    fn default() -> Self {
        Self::Idle
    }
}

/// The finalized recorded segment for one spoken answer
///
/// Exactly one artifact exists per recording; its bytes are the buffered
/// chunks concatenated in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerArtifact {
    /// Encoded audio/video data
    pub data: Vec<u8>,

    /// When the recording was finalized
    pub finalized_at: DateTime<Utc>,
}

impl AnswerArtifact {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
