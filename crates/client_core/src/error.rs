//! Failure taxonomy for calls against the request store and for local form checks.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Non-2xx reply. `message` is the store's `error` text when it sent one.
    #[error("request store rejected call with status {status}")]
    Rejected { status: u16, message: Option<String> },
    /// Network failure or a body that could not be decoded.
    #[error("request store transport failure: {0}")]
    Transport(String),
}

impl StoreError {
    /// Text to put in front of the user.
    ///
    /// Rejections surface the store's own message verbatim and fall back to
    /// `rejected` applied to the status code. Transport failures always use
    /// the generic `transport` text.
    pub fn user_message(&self, rejected: impl FnOnce(u16) -> String, transport: &str) -> String {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Rejected {
                status,
                message: None,
            } => rejected(*status),
            Self::Transport(_) => transport.to_string(),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

/// First missing field of a request form. The display text is what the user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Enter a title.")]
    MissingTitle,
    #[error("Enter a category.")]
    MissingCategory,
    #[error("Pick a date.")]
    MissingScheduledDate,
    #[error("Pick a start time.")]
    MissingScheduledTime,
    #[error("Pick a duration.")]
    MissingDuration,
    #[error("Enter hourly wage.")]
    MissingHourlyWage,
}

impl ValidationError {
    pub fn field(self) -> &'static str {
        match self {
            Self::MissingTitle => "title",
            Self::MissingCategory => "category",
            Self::MissingScheduledDate => "scheduled_date",
            Self::MissingScheduledTime => "scheduled_time",
            Self::MissingDuration => "duration_min",
            Self::MissingHourlyWage => "hourly_wage",
        }
    }
}
