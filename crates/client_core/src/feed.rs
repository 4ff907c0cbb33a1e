//! Fetching and rendering the request feed, and wiring its action controls.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
};

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use shared::{
    domain::{FeedSource, RequestId},
    protocol::ServiceRequest,
};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    view::{FeedItemView, FeedRender, FeedView, ItemAction, Reach},
    RequestStore,
};

const FEED_LOAD_FAILED: &str = "Failed to load feed.";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Clickable "Mark Serviced" control for one rendered request.
///
/// A control only lives as long as the render that produced it.
#[derive(Debug)]
pub struct ActionControl {
    request_id: RequestId,
    in_flight: AtomicBool,
}

impl ActionControl {
    fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Claims the control; false when a call from it is already outstanding.
    pub(crate) fn try_begin(&self) -> bool {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub(crate) fn release(&self) {
        self.in_flight.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Rendered { items: usize },
    Empty,
    Failed(String),
    /// A later refresh was started before this one's response arrived.
    Superseded,
}

pub struct FeedSynchronizer {
    store: Arc<dyn RequestStore>,
    view: Arc<dyn FeedView>,
    source: FeedSource,
    latest_token: AtomicU64,
    controls: Mutex<HashMap<RequestId, Arc<ActionControl>>>,
}

impl FeedSynchronizer {
    pub fn new(store: Arc<dyn RequestStore>, view: Arc<dyn FeedView>, source: FeedSource) -> Self {
        Self {
            store,
            view,
            source,
            latest_token: AtomicU64::new(0),
            controls: Mutex::new(HashMap::new()),
        }
    }

    /// Control wired for `id` by the most recent render, if any.
    pub async fn control_for(&self, id: &RequestId) -> Option<Arc<ActionControl>> {
        self.controls.lock().await.get(id).cloned()
    }

    /// True while `control` is still the one the latest render wired for its id.
    pub async fn is_wired(&self, control: &ActionControl) -> bool {
        self.controls
            .lock()
            .await
            .get(control.request_id())
            .is_some_and(|wired| std::ptr::eq(Arc::as_ptr(wired), control))
    }

    pub async fn wired_ids(&self) -> Vec<RequestId> {
        let mut ids: Vec<_> = self.controls.lock().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Reloads the whole feed from the store and renders it.
    ///
    /// Never fails: every error ends up rendered in the feed itself. Only the
    /// most recently started refresh may render its response.
    pub async fn refresh(&self) -> RefreshOutcome {
        let token = self.latest_token.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut controls = self.controls.lock().await;
            controls.clear();
            self.view.render(&FeedRender::Loading);
        }

        let result = self.store.list_requests(self.source).await;

        let mut controls = self.controls.lock().await;
        if self.latest_token.load(Ordering::SeqCst) != token {
            debug!(token, "dropping stale feed response");
            return RefreshOutcome::Superseded;
        }

        let (render, outcome) = match result {
            Err(err) => {
                warn!(error = %err, "failed to load request feed");
                let message = err.user_message(
                    |status| format!("Failed to load ({status})"),
                    FEED_LOAD_FAILED,
                );
                (FeedRender::Failed(message.clone()), RefreshOutcome::Failed(message))
            }
            Ok(requests) if requests.is_empty() => (FeedRender::Empty, RefreshOutcome::Empty),
            Ok(requests) => {
                let items: Vec<FeedItemView> = requests.iter().map(feed_item).collect();
                let count = items.len();
                (FeedRender::Items(items), RefreshOutcome::Rendered { items: count })
            }
        };

        *controls = wire_controls(&render);
        self.view.render(&render);
        outcome
    }
}

fn wire_controls(render: &FeedRender) -> HashMap<RequestId, Arc<ActionControl>> {
    let FeedRender::Items(items) = render else {
        return HashMap::new();
    };
    items
        .iter()
        .filter(|item| item.action == ItemAction::MarkServiced)
        .map(|item| (item.id.clone(), Arc::new(ActionControl::new(item.id.clone()))))
        .collect()
}

pub fn feed_item(request: &ServiceRequest) -> FeedItemView {
    let action = if request.status.is_serviced() {
        ItemAction::AlreadyServiced
    } else {
        ItemAction::MarkServiced
    };
    FeedItemView {
        id: request.id.clone(),
        title: request.title.clone(),
        category: request.category.clone(),
        created: format_timestamp(request.created_at.as_deref()),
        status: request.status,
        details: non_blank(request.details.as_deref()),
        receiver_name: non_blank(request.receiver_name.as_deref()),
        location: non_blank(request.location_text.as_deref()),
        serviced: format_timestamp(request.serviced_at.as_deref()),
        distance_km: request.distance_km,
        reach: request.can_serve.map(|can_serve| Reach {
            can_serve,
            reason: non_blank(request.serve_reason.as_deref()),
        }),
        action,
    }
}

fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Renders a store timestamp in the viewer's local time zone.
///
/// The store writes naive UTC timestamps; those are read as UTC. Text that is
/// not a timestamp is shown as-is.
pub fn format_timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return String::new();
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Utc
            .from_utc_datetime(&naive)
            .with_timezone(&Local)
            .format(TIMESTAMP_FORMAT)
            .to_string();
    }
    raw.to_string()
}

#[cfg(test)]
#[path = "tests/feed_tests.rs"]
mod tests;
