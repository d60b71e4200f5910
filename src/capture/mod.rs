//! Media acquisition
//!
//! This module owns the contract between the session controller and the
//! local capture hardware. Concrete device implementations live in the
//! embedding application; the controller only sees the traits defined here.

pub mod traits;

// Re-export traits and stream types
pub use traits::{CaptureDevice, CaptureError, MediaStream, StreamChunk, StreamConstraints, VideoFrame};
