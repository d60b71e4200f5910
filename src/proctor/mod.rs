//! Proctoring signals and warning aggregation
//!
//! Integrity signals are produced by the detection loop (and the visibility
//! collaborator) and consumed immediately by the [`WarningAggregator`], which
//! owns the single mutable warning record for a session.

pub mod aggregator;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use aggregator::{Verdict, WarningAggregator, MAX_WARNINGS, WARNING_COOLDOWN};

/// Category of a detected integrity violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignalCategory {
    /// The interview page lost visibility
    TabSwitch,
    /// A phone was detected in the camera frame
    PhoneDetected,
    /// Nobody was detected in the camera frame
    NoPersonPresent,
    /// More than one person was detected in the camera frame
    MultiplePeoplePresent,
}

impl SignalCategory {
    /// Human-readable detail used in warning messages and termination reasons
    pub fn detail(&self) -> &'static str {
        match self {
            SignalCategory::TabSwitch => "Tab Switching Detected",
            SignalCategory::PhoneDetected => "Phone Detected",
            SignalCategory::NoPersonPresent => "No Person Detected",
            SignalCategory::MultiplePeoplePresent => "Multiple People Detected",
        }
    }
}

/// A single detected integrity event
///
/// Ephemeral: produced by a monitor, handed to the aggregator, then dropped.
#[derive(Debug, Clone)]
pub struct IntegritySignal {
    pub category: SignalCategory,
    pub at: DateTime<Utc>,
}

impl IntegritySignal {
    /// Create a signal stamped with the current wall-clock time
    pub fn now(category: SignalCategory) -> Self {
        Self {
            category,
            at: Utc::now(),
        }
    }
}

/// Read-only snapshot of the per-category warning counts
///
/// Field names follow the summarization service's `proctoring_data` schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProctoringTelemetry {
    pub tab_switch_count: u32,
    pub phone_detection_count: u32,
    pub no_person_warnings: u32,
    pub multiple_person_warnings: u32,
}

impl ProctoringTelemetry {
    /// Total accepted warnings across all categories
    pub fn total(&self) -> u32 {
        self.tab_switch_count
            + self.phone_detection_count
            + self.no_person_warnings
            + self.multiple_person_warnings
    }
}
