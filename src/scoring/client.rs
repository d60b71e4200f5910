//! HTTP client for the interview API
//!
//! Implements [`ScoringService`] and [`SummaryService`] against the remote
//! interview endpoints. Answer artifacts are uploaded as a multipart file
//! part alongside the question and job-description form fields.

use super::types::{AnswerFeedback, ChatRequest, ChatResponse, SummarizeRequest, SummaryReport};
use super::{ScoringError, ScoringService, SummaryService};
use crate::recorder::AnswerArtifact;
use crate::session::{Difficulty, Exchange};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

const CHAT_PATH: &str = "/interview/chat";
const VIDEO_PATH: &str = "/interview/video";
const SUMMARIZE_PATH: &str = "/interview/summarize";

/// File name and MIME type the scoring endpoint expects for answer uploads
const ANSWER_FILE_NAME: &str = "answer.webm";
const ANSWER_MIME_TYPE: &str = "audio/webm";

/// HTTP implementation of the scoring and summarization capabilities
pub struct HttpInterviewClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpInterviewClient {
    /// Create a client against `base_url` (no trailing slash)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a client reusing an existing `reqwest::Client`
    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ScoringError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ScoringError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|err| ScoringError::InvalidResponse(err.to_string()))
    }
}

#[async_trait]
impl ScoringService for HttpInterviewClient {
    async fn opening_question(
        &self,
        job_description: &str,
        history: &[Exchange],
        difficulty: Difficulty,
    ) -> Result<String, ScoringError> {
        let body = ChatRequest {
            job_description: job_description.to_owned(),
            chat_history: history.to_vec(),
            difficulty,
        };

        let response = self
            .http
            .post(self.url(CHAT_PATH))
            .json(&body)
            .send()
            .await?;

        let chat: ChatResponse = Self::read_json(response).await?;
        Ok(chat.reply)
    }

    async fn score_answer(
        &self,
        artifact: &AnswerArtifact,
        question: &str,
        job_description: &str,
    ) -> Result<AnswerFeedback, ScoringError> {
        let part = reqwest::multipart::Part::bytes(artifact.data.clone())
            .file_name(ANSWER_FILE_NAME)
            .mime_str(ANSWER_MIME_TYPE)?;

        let form = reqwest::multipart::Form::new()
            .part("video_file", part)
            .text("question", question.to_owned())
            .text("job_description", job_description.to_owned());

        tracing::info!(bytes = artifact.len(), "submitting answer for scoring");

        let response = self
            .http
            .post(self.url(VIDEO_PATH))
            .multipart(form)
            .send()
            .await?;

        Self::read_json(response).await
    }
}

#[async_trait]
impl SummaryService for HttpInterviewClient {
    async fn summarize(&self, request: SummarizeRequest) -> Result<SummaryReport, ScoringError> {
        let response = self
            .http
            .post(self.url(SUMMARIZE_PATH))
            .json(&request)
            .send()
            .await?;

        Self::read_json(response).await
    }
}
