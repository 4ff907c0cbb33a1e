//! "Mark serviced" dispatch against the store.

use std::sync::Arc;

use shared::domain::RequestId;
use tracing::{debug, info, warn};

use crate::{
    feed::{ActionControl, FeedSynchronizer},
    view::{ControlState, DialogView, FeedView},
    RequestStore,
};

const MARK_FAILED: &str = "Could not mark serviced. Try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The store accepted the call; `already` means it had been applied before.
    Serviced { already: bool },
    Failed(String),
    /// The control already has a call outstanding.
    Ignored,
    /// The current render has no clickable control for this id.
    NotWired,
}

pub struct ActionDispatcher {
    store: Arc<dyn RequestStore>,
    feed: Arc<FeedSynchronizer>,
    feed_view: Arc<dyn FeedView>,
    dialogs: Arc<dyn DialogView>,
}

impl ActionDispatcher {
    pub fn new(
        store: Arc<dyn RequestStore>,
        feed: Arc<FeedSynchronizer>,
        feed_view: Arc<dyn FeedView>,
        dialogs: Arc<dyn DialogView>,
    ) -> Self {
        Self {
            store,
            feed,
            feed_view,
            dialogs,
        }
    }

    /// Clicks the control the latest render wired for `id`.
    pub async fn mark_serviced_by_id(&self, id: &RequestId) -> DispatchOutcome {
        match self.feed.control_for(id).await {
            Some(control) => self.mark_serviced(&control).await,
            None => {
                debug!(request_id = %id, "no action control wired for request");
                DispatchOutcome::NotWired
            }
        }
    }

    /// Marks the control's request serviced, then reloads the feed.
    ///
    /// The feed is never patched locally; what the user sees next is whatever
    /// the store reports on refresh.
    pub async fn mark_serviced(&self, control: &ActionControl) -> DispatchOutcome {
        if !control.try_begin() {
            debug!(request_id = %control.request_id(), "mark serviced already in progress");
            return DispatchOutcome::Ignored;
        }

        let id = control.request_id().clone();
        self.feed_view.update_control(&id, &ControlState::in_progress());

        match self.store.resolve_request(&id).await {
            Ok(receipt) => {
                if receipt.already {
                    info!(request_id = %id, "request was already serviced");
                } else {
                    info!(request_id = %id, "request marked serviced");
                }
                self.feed.refresh().await;
                DispatchOutcome::Serviced {
                    already: receipt.already,
                }
            }
            Err(err) => {
                warn!(request_id = %id, error = %err, "failed to mark request serviced");
                let message = err.user_message(|status| format!("Failed ({status})"), MARK_FAILED);
                self.dialogs.alert(&message);
                control.release();
                // A newer render owns this id now and already shows what the store said.
                if self.feed.is_wired(control).await {
                    self.feed_view.update_control(&id, &ControlState::ready());
                } else {
                    debug!(request_id = %id, "control replaced by a newer render; not restoring");
                }
                DispatchOutcome::Failed(message)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/actions_tests.rs"]
mod tests;
