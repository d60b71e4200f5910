//! Warning aggregation
//!
//! Consumes integrity signals, applies the global cooldown, counts warnings
//! per category, and decides on forced termination. All mutable warning state
//! for a session lives behind this type; callers only see `report()` and
//! `snapshot()`.

use super::{IntegritySignal, ProctoringTelemetry, SignalCategory};
use parking_lot::Mutex;
use tokio::time::{Duration, Instant};

/// Number of accepted warnings that forces termination
pub const MAX_WARNINGS: u32 = 3;

/// Window after an accepted warning during which further signals are ignored.
/// Global across categories: a burst of simultaneous detections (phone plus
/// no-person in one frame) counts as a single incident.
pub const WARNING_COOLDOWN: Duration = Duration::from_secs(7);

/// Outcome of reporting one integrity signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Signal suppressed: session not armed, cooldown active, or already terminated
    Ignored,

    /// Warning accepted and counted
    Warned {
        number: u32,
        max: u32,
        message: String,
    },

    /// The warning limit was reached; the session must terminate
    Terminated { warning: String, reason: String },
}

#[derive(Debug, Default)]
struct WarningState {
    total_warnings: u32,
    counts: ProctoringTelemetry,
    cooldown_until: Option<Instant>,
    armed: bool,
    terminated: bool,
}

impl WarningState {
    fn bump(&mut self, category: SignalCategory) {
        match category {
            SignalCategory::TabSwitch => self.counts.tab_switch_count += 1,
            SignalCategory::PhoneDetected => self.counts.phone_detection_count += 1,
            SignalCategory::NoPersonPresent => self.counts.no_person_warnings += 1,
            SignalCategory::MultiplePeoplePresent => self.counts.multiple_person_warnings += 1,
        }
    }
}

/// Owns the warning record for one session
pub struct WarningAggregator {
    state: Mutex<WarningState>,
}

impl WarningAggregator {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(WarningState::default()),
        }
    }

    /// Start accepting signals (session entered Active)
    pub fn arm(&self) {
        self.state.lock().armed = true;
    }

    /// Stop accepting signals (session left Active)
    pub fn disarm(&self) {
        self.state.lock().armed = false;
    }

    /// Report one integrity signal and decide what happens to it.
    ///
    /// Accepted warnings restart the global cooldown. Termination is yielded
    /// exactly once; every report after it is a no-op.
    pub fn report(&self, signal: &IntegritySignal) -> Verdict {
        let mut state = self.state.lock();

        if !state.armed || state.terminated {
            return Verdict::Ignored;
        }

        let now = Instant::now();
        if let Some(until) = state.cooldown_until {
            if now < until {
                tracing::debug!(category = ?signal.category, "signal suppressed by cooldown");
                return Verdict::Ignored;
            }
        }

        state.total_warnings += 1;
        state.bump(signal.category);
        state.cooldown_until = Some(now + WARNING_COOLDOWN);

        let number = state.total_warnings;
        let message = format!(
            "Warning {}/{}: {}",
            number,
            MAX_WARNINGS,
            signal.category.detail()
        );
        tracing::warn!(number, category = ?signal.category, "integrity warning accepted");

        if number >= MAX_WARNINGS {
            state.terminated = true;
            let reason = format!(
                "Warning limit reached ({}/{}). Last violation: {}",
                number,
                MAX_WARNINGS,
                signal.category.detail()
            );
            return Verdict::Terminated {
                warning: message,
                reason,
            };
        }

        Verdict::Warned {
            number,
            max: MAX_WARNINGS,
            message,
        }
    }

    /// Read-only snapshot of the per-category counts
    pub fn snapshot(&self) -> ProctoringTelemetry {
        self.state.lock().counts
    }

    /// Whether the warning limit has been crossed
    pub fn is_terminated(&self) -> bool {
        self.state.lock().terminated
    }
}

impl Default for WarningAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, Duration};

    fn armed() -> WarningAggregator {
        let aggregator = WarningAggregator::new();
        aggregator.arm();
        aggregator
    }

    fn signal(category: SignalCategory) -> IntegritySignal {
        IntegritySignal::now(category)
    }

    #[tokio::test(start_paused = true)]
    async fn signals_inside_cooldown_are_ignored() {
        let aggregator = armed();

        let first = aggregator.report(&signal(SignalCategory::PhoneDetected));
        assert!(matches!(first, Verdict::Warned { number: 1, .. }));

        // A different category inside the window is still suppressed: the
        // cooldown is global, not per category.
        advance(Duration::from_secs(3)).await;
        let second = aggregator.report(&signal(SignalCategory::TabSwitch));
        assert_eq!(second, Verdict::Ignored);

        advance(Duration::from_secs(5)).await;
        let third = aggregator.report(&signal(SignalCategory::TabSwitch));
        assert!(matches!(third, Verdict::Warned { number: 2, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn third_warning_terminates_exactly_once() {
        let aggregator = armed();

        for expected in 1..=2u32 {
            let verdict = aggregator.report(&signal(SignalCategory::PhoneDetected));
            assert!(matches!(verdict, Verdict::Warned { number, .. } if number == expected));
            advance(Duration::from_secs(8)).await;
        }

        let third = aggregator.report(&signal(SignalCategory::PhoneDetected));
        match third {
            Verdict::Terminated { warning, reason } => {
                assert_eq!(warning, "Warning 3/3: Phone Detected");
                assert!(reason.contains("Phone Detected"));
            }
            other => panic!("expected termination, got {other:?}"),
        }
        assert!(aggregator.is_terminated());

        // A fourth signal, even outside the cooldown, changes nothing.
        advance(Duration::from_secs(8)).await;
        let fourth = aggregator.report(&signal(SignalCategory::NoPersonPresent));
        assert_eq!(fourth, Verdict::Ignored);
        assert_eq!(aggregator.snapshot().total(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn counts_are_tracked_per_category() {
        let aggregator = armed();

        aggregator.report(&signal(SignalCategory::TabSwitch));
        advance(Duration::from_secs(8)).await;
        aggregator.report(&signal(SignalCategory::NoPersonPresent));

        let telemetry = aggregator.snapshot();
        assert_eq!(telemetry.tab_switch_count, 1);
        assert_eq!(telemetry.no_person_warnings, 1);
        assert_eq!(telemetry.phone_detection_count, 0);
        assert_eq!(telemetry.multiple_person_warnings, 0);
        assert_eq!(telemetry.total(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn unarmed_aggregator_ignores_signals() {
        let aggregator = WarningAggregator::new();
        let verdict = aggregator.report(&signal(SignalCategory::PhoneDetected));
        assert_eq!(verdict, Verdict::Ignored);
        assert_eq!(aggregator.snapshot().total(), 0);

        aggregator.arm();
        aggregator.disarm();
        let verdict = aggregator.report(&signal(SignalCategory::PhoneDetected));
        assert_eq!(verdict, Verdict::Ignored);
    }

    #[tokio::test(start_paused = true)]
    async fn warning_message_format() {
        let aggregator = armed();
        match aggregator.report(&signal(SignalCategory::MultiplePeoplePresent)) {
            Verdict::Warned { message, max, .. } => {
                assert_eq!(message, "Warning 1/3: Multiple People Detected");
                assert_eq!(max, MAX_WARNINGS);
            }
            other => panic!("expected warning, got {other:?}"),
        }
    }
}
