//! Frame-sampling detection loop
//!
//! A self-rescheduling cooperative task: each tick pulls one frame from the
//! stream and runs it through the classifier, and the next tick is only
//! scheduled after the current classification settles, so at most one
//! classification is ever in flight. Stopping the session cancels the token;
//! an in-flight tick completes silently and no further ticks are scheduled.

use super::{signal_for_tick, FrameClassifier};
use crate::capture::MediaStream;
use crate::proctor::IntegritySignal;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Run the detection loop until the stream ends or the token is cancelled.
///
/// Derived signals are pushed onto `signal_tx`; the consumer (the session's
/// signal router) applies them to the warning aggregator in arrival order.
pub async fn detection_loop(
    stream: Arc<dyn MediaStream>,
    classifier: Arc<dyn FrameClassifier>,
    signal_tx: mpsc::Sender<IntegritySignal>,
    cancel_token: CancellationToken,
) {
    loop {
        let frame = tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                tracing::info!("detection loop shutting down");
                break;
            }
            frame = stream.next_frame() => match frame {
                Some(frame) => frame,
                None => {
                    tracing::info!("capture stream ended, detection loop exiting");
                    break;
                }
            },
        };

        // The classification is never raced against cancellation: a tick that
        // is already in flight runs to completion, its result is simply
        // discarded once the session has ended.
        let detections = match classifier.detect(&frame).await {
            Ok(detections) => detections,
            Err(err) => {
                tracing::warn!("frame classification failed, skipping tick: {err}");
                continue;
            }
        };

        if cancel_token.is_cancelled() {
            break;
        }

        if let Some(category) = signal_for_tick(&detections) {
            let signal = IntegritySignal::now(category);
            if signal_tx.send(signal).await.is_err() {
                // Router gone: the session is tearing down.
                break;
            }
        }
    }
}
