//! Session summary generation
//!
//! Runs exactly once at end of session, normal or forced. Submits the full
//! transcript plus proctoring telemetry to the summarization service and
//! turns the response into a renderable outcome. Failures here are non-fatal
//! to the rest of the application.

use crate::proctor::ProctoringTelemetry;
use crate::scoring::{ProctoringData, SummarizeRequest, SummaryReport, SummaryService};
use crate::session::Exchange;
use std::fmt::Write as _;
use std::sync::Arc;

/// Final outcome of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// Normal end: full performance report
    Completed(SummaryReport),

    /// Forced end: termination notice, score breakdown suppressed
    Terminated { reason: String },

    /// The summarization service failed; generic notice
    Unavailable,
}

impl SummaryOutcome {
    /// Render the outcome as user-facing text.
    ///
    /// A termination notice never includes the score breakdown.
    pub fn render(&self) -> String {
        match self {
            SummaryOutcome::Completed(report) => {
                let mut out = String::new();
                let _ = writeln!(out, "Overall score: {}/100", report.overall_score);
                let _ = writeln!(out, "\nStrengths:");
                for strength in &report.strengths {
                    let _ = writeln!(out, "- {strength}");
                }
                let _ = writeln!(out, "\nAreas for improvement:");
                for area in &report.areas_for_improvement {
                    let _ = writeln!(out, "- {area}");
                }
                let _ = writeln!(out, "\n{}", report.overall_feedback);
                out
            }
            SummaryOutcome::Terminated { reason } => {
                format!("Interview terminated.\n{reason}")
            }
            SummaryOutcome::Unavailable => {
                "We couldn't generate your interview summary. Please try again later.".to_owned()
            }
        }
    }
}

/// Builds and submits the end-of-session summary request
pub struct SummaryGenerator {
    service: Arc<dyn SummaryService>,
}

impl SummaryGenerator {
    pub fn new(service: Arc<dyn SummaryService>) -> Self {
        Self { service }
    }

    /// Generate the final summary.
    ///
    /// `termination_reason` is populated only on forced termination and is
    /// forwarded to the service; when present, the rendered outcome is a
    /// termination notice regardless of what the service scores.
    pub async fn generate(
        &self,
        job_description: &str,
        history: &[Exchange],
        telemetry: ProctoringTelemetry,
        termination_reason: Option<String>,
    ) -> SummaryOutcome {
        let request = SummarizeRequest {
            job_description: job_description.to_owned(),
            chat_history: history.to_vec(),
            proctoring_data: ProctoringData {
                telemetry,
                termination_reason: termination_reason.clone(),
            },
        };

        match self.service.summarize(request).await {
            Ok(report) => match termination_reason {
                Some(reason) => SummaryOutcome::Terminated { reason },
                None => SummaryOutcome::Completed(report),
            },
            Err(err) => {
                tracing::error!("summary generation failed: {err}");
                SummaryOutcome::Unavailable
            }
        }
    }
}
