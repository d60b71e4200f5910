//! Error types and handling
//!
//! Aggregates the subsystem errors into one application-wide type with a
//! stable code/message mapping for the embedding frontend.

use crate::capture::CaptureError;
use crate::detection::ClassifierError;
use crate::recorder::RecordingError;
use crate::scoring::ScoringError;
use crate::session::SessionError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Recording error: {0}")]
    Recording(#[from] RecordingError),

    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error response for the embedding frontend
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        let code = match &error {
            AppError::Capture(CaptureError::PermissionDenied(_)) => "PERMISSION_DENIED",
            AppError::Capture(_) => "CAPTURE_ERROR",
            AppError::Classifier(_) => "CLASSIFIER_ERROR",
            AppError::Recording(_) => "RECORDING_ERROR",
            AppError::Scoring(_) => "SCORING_ERROR",
            AppError::Session(_) => "SESSION_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
        };

        ErrorResponse {
            code: code.to_string(),
            message: error.to_string(),
        }
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_maps_to_its_own_code() {
        let error = AppError::Capture(CaptureError::PermissionDenied("camera".into()));
        let response = ErrorResponse::from(error);
        assert_eq!(response.code, "PERMISSION_DENIED");
        assert!(response.message.contains("camera"));
    }

    #[test]
    fn recording_contract_errors_keep_their_message() {
        let error = AppError::Recording(RecordingError::AlreadyRecording);
        let response = ErrorResponse::from(error);
        assert_eq!(response.code, "RECORDING_ERROR");
        assert!(response.message.contains("already in progress"));
    }
}
