//! Plain-text renderer for the feed, the form status line and dialogs.

use std::sync::Arc;

use client_core::{
    view::{
        ControlState, Dialog, DialogKind, DialogView, FeedItemView, FeedRender, FeedView,
        FormView, ItemAction, LocationStatus, ALREADY_SERVICED_LABEL, MARK_SERVICED_LABEL,
    },
    Views,
};
use shared::domain::RequestId;

pub struct TerminalView {
    form_visible: bool,
}

impl TerminalView {
    pub fn new(form_visible: bool) -> Arc<Self> {
        Arc::new(Self { form_visible })
    }

    pub fn views(self: &Arc<Self>) -> Views {
        Views {
            feed: Arc::clone(self) as Arc<dyn FeedView>,
            form: Arc::clone(self) as Arc<dyn FormView>,
            dialogs: Arc::clone(self) as Arc<dyn DialogView>,
        }
    }
}

pub fn feed_lines(render: &FeedRender) -> Vec<String> {
    match render {
        FeedRender::Items(items) => items.iter().flat_map(item_lines).collect(),
        other => other.placeholder().map(str::to_string).into_iter().collect(),
    }
}

fn item_lines(item: &FeedItemView) -> Vec<String> {
    let mut meta = item.category.clone();
    if !item.created.is_empty() {
        meta.push_str(" • ");
        meta.push_str(&item.created);
    }
    if let Some(km) = item.distance_km {
        meta.push_str(&format!(" • {km} km away"));
    }

    let mut lines = vec![
        format!("#{} {} [{}]", item.id, item.title, item.status),
        format!("    {meta}"),
    ];
    let who_where: Vec<String> = [
        item.receiver_name.as_ref().map(|name| format!("Receiver: {name}")),
        item.location.as_ref().map(|location| format!("Location: {location}")),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !who_where.is_empty() {
        lines.push(format!("    {}", who_where.join(" • ")));
    }
    if let Some(details) = &item.details {
        lines.push(format!("    {details}"));
    }
    if let Some(reach) = &item.reach {
        let verdict = if reach.can_serve {
            "In your area"
        } else {
            "Outside your area"
        };
        lines.push(match &reach.reason {
            Some(reason) => format!("    {verdict}: {reason}"),
            None => format!("    {verdict}"),
        });
    }
    if !item.serviced.is_empty() {
        lines.push(format!("    Serviced at {}", item.serviced));
    }
    lines.push(match item.action {
        ItemAction::MarkServiced => format!("    ({MARK_SERVICED_LABEL}: mark-serviced {})", item.id),
        ItemAction::AlreadyServiced => format!("    {ALREADY_SERVICED_LABEL}"),
    });
    lines
}

pub fn dialog_lines(dialog: &Dialog) -> Vec<String> {
    let tag = match dialog.kind {
        DialogKind::Success => "ok",
        DialogKind::Warning => "warning",
        DialogKind::Error => "error",
    };
    let mut lines = vec![format!("[{tag}] {}", dialog.title)];
    if !dialog.message.is_empty() {
        lines.push(format!("    {}", dialog.message));
    }
    if let Some(extra) = &dialog.extra {
        lines.push(format!("    {extra}"));
    }
    lines.extend(dialog.lines.iter().map(|line| format!("      {line}")));
    lines
}

impl FeedView for TerminalView {
    fn render(&self, render: &FeedRender) {
        // Each render replaces the previous one; loading is transient here.
        if matches!(render, FeedRender::Loading) {
            tracing::debug!("loading request feed");
            return;
        }
        for line in feed_lines(render) {
            println!("{line}");
        }
    }

    fn update_control(&self, id: &RequestId, state: &ControlState) {
        tracing::debug!(request_id = %id, enabled = state.enabled, label = %state.label, "action control updated");
    }
}

impl FormView for TerminalView {
    fn is_visible(&self) -> bool {
        self.form_visible
    }

    fn show_message(&self, message: &str) {
        println!("{message}");
    }

    fn reset(&self) {
        tracing::debug!("request form cleared");
    }
}

impl DialogView for TerminalView {
    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }

    fn show_location_status(&self, status: LocationStatus) {
        println!("{}", status.text());
    }

    fn show_dialog(&self, dialog: &Dialog) {
        for line in dialog_lines(dialog) {
            println!("{line}");
        }
    }
}
