//! New-request form: gate check, validation, and the create call.

use std::sync::Arc;

use shared::protocol::CreateRequestPayload;
use tracing::{debug, info, warn};

use crate::{
    error::{StoreError, ValidationError},
    feed::FeedSynchronizer,
    gate::RequestGate,
    view::FormView,
    RequestStore,
};

pub const GATE_LOCKED_MESSAGE: &str =
    "Please confirm your location & availability first (click Continue).";
const SUBMITTING_MESSAGE: &str = "Submitting…";
const SAVED_MESSAGE: &str = "Saved.";
const NETWORK_ERROR_MESSAGE: &str = "Network error.";

/// Raw form inputs as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub title: String,
    pub category: String,
    pub details: String,
    pub scheduled_date: String,
    pub scheduled_time: String,
    pub duration_min: String,
    pub hourly_wage: String,
}

/// Which fields the form requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormFlow {
    /// Title and category only.
    Basic,
    /// Title, category, schedule, duration and wage.
    #[default]
    Extended,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Gate still locked; nothing was sent.
    Locked,
    Invalid(ValidationError),
    Created,
    Rejected(String),
    TransportFailed,
}

pub struct SubmissionController {
    store: Arc<dyn RequestStore>,
    gate: Arc<RequestGate>,
    form: Arc<dyn FormView>,
    feed: Arc<FeedSynchronizer>,
    flow: FormFlow,
}

impl SubmissionController {
    pub fn new(
        store: Arc<dyn RequestStore>,
        gate: Arc<RequestGate>,
        form: Arc<dyn FormView>,
        feed: Arc<FeedSynchronizer>,
        flow: FormFlow,
    ) -> Self {
        Self {
            store,
            gate,
            form,
            feed,
            flow,
        }
    }

    pub async fn submit(&self, values: &FormValues) -> SubmitOutcome {
        self.gate.observe_form_visibility(self.form.is_visible());
        if !self.gate.can_submit() {
            debug!("submission blocked by request gate");
            self.form.show_message(GATE_LOCKED_MESSAGE);
            return SubmitOutcome::Locked;
        }

        let payload = build_payload(values);
        if let Err(err) = validate(&payload, self.flow) {
            debug!(field = err.field(), "request form incomplete");
            self.form.show_message(&err.to_string());
            return SubmitOutcome::Invalid(err);
        }

        self.form.show_message(SUBMITTING_MESSAGE);
        match self.store.create_request(&payload).await {
            Ok(created) => {
                info!(request_id = ?created.id, "service request created");
                self.form.show_message(SAVED_MESSAGE);
                self.form.reset();
                self.feed.refresh().await;
                SubmitOutcome::Created
            }
            Err(err @ StoreError::Rejected { .. }) => {
                warn!(error = %err, "service request rejected");
                let message = err.user_message(
                    |status| format!("Error submitting request ({status})."),
                    NETWORK_ERROR_MESSAGE,
                );
                self.form.show_message(&message);
                SubmitOutcome::Rejected(message)
            }
            Err(err @ StoreError::Transport(_)) => {
                warn!(error = %err, "service request not sent");
                self.form.show_message(NETWORK_ERROR_MESSAGE);
                SubmitOutcome::TransportFailed
            }
        }
    }
}

/// Trims text inputs and parses numeric ones. Blank or unparseable numbers
/// become `None`, never zero.
pub fn build_payload(values: &FormValues) -> CreateRequestPayload {
    CreateRequestPayload {
        title: values.title.trim().to_string(),
        category: values.category.trim().to_string(),
        details: values.details.trim().to_string(),
        scheduled_date: non_blank(&values.scheduled_date),
        scheduled_time: non_blank(&values.scheduled_time),
        duration_min: parse_minutes(&values.duration_min),
        hourly_wage: parse_wage(&values.hourly_wage),
    }
}

/// Reports the first missing field only, in form order.
pub fn validate(payload: &CreateRequestPayload, flow: FormFlow) -> Result<(), ValidationError> {
    if payload.title.is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    if payload.category.is_empty() {
        return Err(ValidationError::MissingCategory);
    }
    if flow == FormFlow::Basic {
        return Ok(());
    }
    if payload.scheduled_date.is_none() {
        return Err(ValidationError::MissingScheduledDate);
    }
    if payload.scheduled_time.is_none() {
        return Err(ValidationError::MissingScheduledTime);
    }
    // A zero duration or wage is as good as none.
    if payload.duration_min.unwrap_or(0) == 0 {
        return Err(ValidationError::MissingDuration);
    }
    if payload.hourly_wage.unwrap_or(0.0) == 0.0 {
        return Err(ValidationError::MissingHourlyWage);
    }
    Ok(())
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Leading whole number, so "90 min" reads as 90 and "45.9" as 45.
fn parse_minutes(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let sign = usize::from(trimmed.starts_with(['+', '-']));
    let digits = trimmed[sign..].bytes().take_while(u8::is_ascii_digit).count();
    trimmed[..sign + digits].parse().ok()
}

/// Longest leading decimal, so "15/hr" reads as 15.
fn parse_wage(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    (1..=trimmed.len())
        .rev()
        .filter(|&end| trimmed.is_char_boundary(end))
        .find_map(|end| trimmed[..end].parse::<f64>().ok())
        .filter(|wage| wage.is_finite())
}

#[cfg(test)]
#[path = "tests/submission_tests.rs"]
mod tests;
