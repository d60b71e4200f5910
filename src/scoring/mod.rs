//! Submission pipeline
//!
//! Capability traits for the remote AI scoring and summarization services,
//! plus the HTTP client that implements them against the interview API.

pub mod client;
pub mod types;

use crate::recorder::AnswerArtifact;
use crate::session::{Difficulty, Exchange};
use async_trait::async_trait;
use thiserror::Error;

pub use client::HttpInterviewClient;
pub use types::{AnswerFeedback, ProctoringData, SummarizeRequest, SummaryReport};

/// Submission errors
///
/// No client-side timeout is applied; failures are only observed through
/// rejected or failed responses.
#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response from service: {0}")]
    InvalidResponse(String),
}

/// Remote scoring capability
#[async_trait]
pub trait ScoringService: Send + Sync {
    /// Fetch the opening interview question for a new session.
    async fn opening_question(
        &self,
        job_description: &str,
        history: &[Exchange],
        difficulty: Difficulty,
    ) -> Result<String, ScoringError>;

    /// Submit one recorded answer for scoring.
    ///
    /// Returns feedback on the answer and the next question to ask.
    async fn score_answer(
        &self,
        artifact: &AnswerArtifact,
        question: &str,
        job_description: &str,
    ) -> Result<AnswerFeedback, ScoringError>;
}

/// Remote summarization capability
#[async_trait]
pub trait SummaryService: Send + Sync {
    /// Submit the full transcript plus proctoring telemetry for a final
    /// performance summary.
    async fn summarize(&self, request: SummarizeRequest) -> Result<SummaryReport, ScoringError>;
}
