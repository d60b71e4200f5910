//! Capture trait definitions
//!
//! Device-agnostic traits for live audio/video capture sources. The session
//! controller never talks to platform capture APIs directly; it is handed a
//! [`CaptureDevice`] and works against the stream it produces.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;

/// Constraints requested when acquiring a capture stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamConstraints {
    /// Whether a video track is required
    pub video: bool,

    /// Whether an audio track is required
    pub audio: bool,
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self {
            video: true,
            audio: true,
        }
    }
}

/// A single decoded video frame sampled from the live stream
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGBA pixel data
    pub data: Vec<u8>,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,
}

/// One encoded segment of stream data, delivered in arrival order
pub type StreamChunk = Vec<u8>;

/// Capture errors
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Capture device error: {0}")]
    Device(String),

    #[error("Capture stream is no longer available")]
    StreamClosed,
}

/// Local capture hardware, injected by the embedding application
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Acquire a live stream satisfying `constraints`.
    ///
    /// Fails with [`CaptureError::PermissionDenied`] when the user or the
    /// platform denies access to the camera/microphone.
    async fn acquire(
        &self,
        constraints: StreamConstraints,
    ) -> Result<Box<dyn MediaStream>, CaptureError>;
}

/// A live audio/video stream with exactly one owner (the active session)
///
/// The detection loop and the recording controller both read from the stream
/// concurrently; neither mutates it. Stopping the stream releases the shared
/// hardware resource and closes the chunk channel, which is the only
/// cancellation path its readers need.
#[async_trait]
pub trait MediaStream: Send + Sync {
    /// Pull the next available video frame.
    ///
    /// Returns `None` once the stream has been stopped. Frames are delivered
    /// one at a time; a caller that is still processing a frame simply does
    /// not ask for the next one.
    async fn next_frame(&self) -> Option<VideoFrame>;

    /// Subscribe to the encoded data segments produced by the stream.
    ///
    /// Segments arrive in recording order; the channel closes when the stream
    /// stops.
    fn chunks(&self) -> broadcast::Receiver<StreamChunk>;

    /// Release the underlying hardware. Idempotent.
    fn stop(&self);
}
