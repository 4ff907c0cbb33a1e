//! Render targets and input sources the controller is constructed with.

use shared::domain::{RequestId, RequestStatus};

pub const MARK_SERVICED_LABEL: &str = "Mark Serviced";
pub const MARKING_LABEL: &str = "Marking…";
pub const ALREADY_SERVICED_LABEL: &str = "Already serviced";

/// Whole-container content of the feed. Each render replaces the previous one.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedRender {
    Loading,
    Failed(String),
    Empty,
    Items(Vec<FeedItemView>),
}

impl FeedRender {
    /// Placeholder text for the non-item states.
    pub fn placeholder(&self) -> Option<&str> {
        match self {
            Self::Loading => Some("Loading…"),
            Self::Failed(message) => Some(message),
            Self::Empty => Some("No requests yet."),
            Self::Items(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedItemView {
    pub id: RequestId,
    pub title: String,
    pub category: String,
    /// Creation time in viewer-local format, empty when unknown.
    pub created: String,
    pub status: RequestStatus,
    pub details: Option<String>,
    pub receiver_name: Option<String>,
    pub location: Option<String>,
    /// Service time in viewer-local format, empty while open.
    pub serviced: String,
    /// Provider feed only.
    pub distance_km: Option<f64>,
    /// Provider feed only: whether the request lies in this provider's area.
    pub reach: Option<Reach>,
    pub action: ItemAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reach {
    pub can_serve: bool,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAction {
    MarkServiced,
    /// Informational marker; nothing to click.
    AlreadyServiced,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    pub enabled: bool,
    pub label: String,
}

impl ControlState {
    pub fn ready() -> Self {
        Self {
            enabled: true,
            label: MARK_SERVICED_LABEL.to_string(),
        }
    }

    pub fn in_progress() -> Self {
        Self {
            enabled: false,
            label: MARKING_LABEL.to_string(),
        }
    }
}

pub trait FeedView: Send + Sync {
    fn render(&self, render: &FeedRender);
    fn update_control(&self, id: &RequestId, state: &ControlState);
}

/// The new-request form: its visibility, its status line, and reset.
pub trait FormView: Send + Sync {
    fn is_visible(&self) -> bool;
    fn show_message(&self, message: &str);
    fn reset(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationStatus {
    Saving,
    Available,
    Unavailable,
    Failed,
}

impl LocationStatus {
    pub fn text(self) -> &'static str {
        match self {
            Self::Saving => "Saving…",
            Self::Available => "Saved. Service available.",
            Self::Unavailable => "Saved. Service not available.",
            Self::Failed => "Save failed.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
    pub extra: Option<String>,
    /// One line per listed entry, e.g. providers in range.
    pub lines: Vec<String>,
}

pub trait DialogView: Send + Sync {
    /// Blocking-style notice for a failed action.
    fn alert(&self, message: &str);
    fn show_location_status(&self, status: LocationStatus);
    fn show_dialog(&self, dialog: &Dialog);
}
