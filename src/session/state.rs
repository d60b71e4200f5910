//! Session state machine types and transcript model

use serde::{Deserialize, Serialize};
use tokio::time::Duration;

/// Phase of an interview session (initial = Setup, terminal = Summarized)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    /// Waiting for a job description
    Setup,
    /// Waiting for a difficulty choice
    DifficultySelect,
    /// Ready to start; capture and classifier not yet acquired
    Confirmed,
    /// Interview running: questions, answers, proctoring
    Active,
    /// Forcibly ended after crossing the warning limit
    Terminated,
    /// Summary produced; session complete
    Summarized,
}

/// Speaker of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Interviewer,
    Candidate,
}

/// One transcript entry
///
/// Appended only, never mutated; insertion order is significant because the
/// transcript is what the scoring and summarization services see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub role: Role,
    pub content: String,
}

impl Exchange {
    pub fn interviewer(content: impl Into<String>) -> Self {
        Self {
            role: Role::Interviewer,
            content: content.into(),
        }
    }

    pub fn candidate(content: impl Into<String>) -> Self {
        Self {
            role: Role::Candidate,
            content: content.into(),
        }
    }
}

/// Interview difficulty, forwarded verbatim to the scoring service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Transcript placeholder standing in for the candidate's spoken answer
pub const ANSWER_PLACEHOLDER: &str = "(spoken answer submitted)";

/// Interviewer-voice message surfaced when an answer submission fails
pub const SUBMISSION_RETRY_MESSAGE: &str =
    "Sorry, an error occurred. Please try recording again.";

/// User-visible pause between forced termination and the summary request
pub const TERMINATION_SUMMARY_DELAY: Duration = Duration::from_secs(3);
