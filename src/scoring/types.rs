//! Wire types for the remote scoring and summarization endpoints
//!
//! Field names are dictated by the remote API and stay snake_case on the
//! wire. The transcript is sent verbatim as `chat_history`.

use crate::proctor::ProctoringTelemetry;
use crate::session::{Difficulty, Exchange};
use serde::{Deserialize, Serialize};

/// Request body for the opening-question endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub job_description: String,
    pub chat_history: Vec<Exchange>,
    pub difficulty: Difficulty,
}

/// Response from the opening-question endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Feedback for one scored answer plus the next question to ask
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnswerFeedback {
    pub feedback: String,
    pub next_question: String,
}

/// Proctoring payload attached to the summarize request
///
/// `termination_reason` is present only when the session was forcibly ended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProctoringData {
    #[serde(flatten)]
    pub telemetry: ProctoringTelemetry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_reason: Option<String>,
}

/// Request body for the summarize endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummarizeRequest {
    pub job_description: String,
    pub chat_history: Vec<Exchange>,
    pub proctoring_data: ProctoringData,
}

/// Performance summary returned by the summarization service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub overall_score: u32,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub overall_feedback: String,
}
