//! Frame classification and integrity detection
//!
//! Each tick of the detection loop runs one frame through the injected
//! [`FrameClassifier`] and derives at most one integrity signal from the
//! detections it returns.

pub mod loop_worker;

use crate::capture::VideoFrame;
use crate::proctor::SignalCategory;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use loop_worker::detection_loop;

/// Minimum confidence for a "phone" detection to count
pub const PHONE_CONFIDENCE_THRESHOLD: f32 = 0.65;

/// Minimum confidence for a "person" detection to count
pub const PERSON_CONFIDENCE_THRESHOLD: f32 = 0.6;

/// One object detected in a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Object class label, e.g. "person" or "phone"
    pub class: String,

    /// Confidence score in `[0, 1]`
    pub score: f32,
}

impl Detection {
    pub fn new(class: impl Into<String>, score: f32) -> Self {
        Self {
            class: class.into(),
            score,
        }
    }
}

/// Classifier errors
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Failed to load classifier model: {0}")]
    LoadFailed(String),

    #[error("Frame classification failed: {0}")]
    Inference(String),
}

/// Object classifier capability, injected by the embedding application
#[async_trait]
pub trait FrameClassifier: Send + Sync {
    /// Load the model. Must succeed before the session can start.
    async fn load(&self) -> Result<(), ClassifierError>;

    /// Classify a single video frame.
    async fn detect(&self, frame: &VideoFrame) -> Result<Vec<Detection>, ClassifierError>;
}

/// Derive the integrity signal for one tick's detections.
///
/// At most one signal fires per tick even when several conditions hold,
/// evaluated in priority order: phone, then nobody present, then multiple
/// people. Exactly one person and no phone yields no signal.
pub fn signal_for_tick(detections: &[Detection]) -> Option<SignalCategory> {
    let phone_detected = detections
        .iter()
        .any(|d| d.class == "phone" && d.score >= PHONE_CONFIDENCE_THRESHOLD);
    if phone_detected {
        return Some(SignalCategory::PhoneDetected);
    }

    let person_count = detections
        .iter()
        .filter(|d| d.class == "person" && d.score >= PERSON_CONFIDENCE_THRESHOLD)
        .count();
    match person_count {
        0 => Some(SignalCategory::NoPersonPresent),
        1 => None,
        _ => Some(SignalCategory::MultiplePeoplePresent),
    }
}
