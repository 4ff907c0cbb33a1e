use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use serde_json::json;
use shared::{
    domain::{FeedSource, RequestId, RequestStatus},
    protocol::{
        CreateRequestPayload, CreateRequestResponse, LocationCheckResult, LocationUpdate,
        ResolveReceipt, ServiceRequest,
    },
};
use tokio::sync::oneshot;

use crate::{
    error::StoreError,
    view::{
        ControlState, Dialog, DialogView, FeedRender, FeedView, FormView, LocationStatus,
    },
    RequestStore, Views,
};

pub fn sample_request(id: &str, status: &str) -> ServiceRequest {
    serde_json::from_value(json!({
        "id": id,
        "title": format!("Request {id}"),
        "category": "Errand",
        "details": "Bring bags",
        "status": status,
        "created_at": "2024-05-01T09:00:00",
    }))
    .expect("sample request")
}

/// In-memory store that behaves like the remote one: resolve is idempotent
/// and create appends an open request.
#[derive(Default)]
pub struct FakeStore {
    requests: Mutex<Vec<ServiceRequest>>,
    list_failure: Mutex<Option<StoreError>>,
    create_failure: Mutex<Option<StoreError>>,
    resolve_failure: Mutex<Option<StoreError>>,
    resolve_failure_after_apply: Mutex<Option<StoreError>>,
    hold_next_resolve: Mutex<Option<oneshot::Receiver<()>>>,
    location_reply: Mutex<Option<Result<LocationCheckResult, StoreError>>>,
    hold_next_list: Mutex<Option<oneshot::Receiver<()>>>,
    pub list_sources: Mutex<Vec<FeedSource>>,
    pub created: Mutex<Vec<CreateRequestPayload>>,
    pub resolved: Mutex<Vec<RequestId>>,
    pub locations: Mutex<Vec<LocationUpdate>>,
}

impl FakeStore {
    pub fn with_requests(requests: Vec<ServiceRequest>) -> Arc<Self> {
        let store = Self::default();
        *store.requests.lock().expect("lock") = requests;
        Arc::new(store)
    }

    pub fn fail_list(&self, err: StoreError) {
        *self.list_failure.lock().expect("lock") = Some(err);
    }

    pub fn fail_create(&self, err: StoreError) {
        *self.create_failure.lock().expect("lock") = Some(err);
    }

    pub fn fail_resolve(&self, err: StoreError) {
        *self.resolve_failure.lock().expect("lock") = Some(err);
    }

    /// The store applies the next resolve but the reply is lost.
    pub fn fail_resolve_after_apply(&self, err: StoreError) {
        *self.resolve_failure_after_apply.lock().expect("lock") = Some(err);
    }

    /// The next resolve reply waits until `release` fires.
    pub fn hold_next_resolve(&self, release: oneshot::Receiver<()>) {
        *self.hold_next_resolve.lock().expect("lock") = Some(release);
    }

    pub fn reply_location(&self, reply: Result<LocationCheckResult, StoreError>) {
        *self.location_reply.lock().expect("lock") = Some(reply);
    }

    /// The next list call waits until `release` fires.
    pub fn hold_next_list(&self, release: oneshot::Receiver<()>) {
        *self.hold_next_list.lock().expect("lock") = Some(release);
    }

    pub fn status_of(&self, id: &str) -> Option<RequestStatus> {
        self.requests
            .lock()
            .expect("lock")
            .iter()
            .find(|request| request.id.as_str() == id)
            .map(|request| request.status)
    }

    pub fn list_calls(&self) -> usize {
        self.list_sources.lock().expect("lock").len()
    }

    pub fn create_calls(&self) -> usize {
        self.created.lock().expect("lock").len()
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolved.lock().expect("lock").len()
    }
}

#[async_trait]
impl RequestStore for FakeStore {
    async fn list_requests(&self, source: FeedSource) -> Result<Vec<ServiceRequest>, StoreError> {
        self.list_sources.lock().expect("lock").push(source);
        let hold = self.hold_next_list.lock().expect("lock").take();
        if let Some(release) = hold {
            let _ = release.await;
        }
        if let Some(err) = self.list_failure.lock().expect("lock").clone() {
            return Err(err);
        }
        Ok(self.requests.lock().expect("lock").clone())
    }

    async fn create_request(
        &self,
        payload: &CreateRequestPayload,
    ) -> Result<CreateRequestResponse, StoreError> {
        self.created.lock().expect("lock").push(payload.clone());
        if let Some(err) = self.create_failure.lock().expect("lock").clone() {
            return Err(err);
        }
        let mut requests = self.requests.lock().expect("lock");
        let id = RequestId::from(requests.len() as i64 + 1);
        let mut request = sample_request(id.as_str(), "Open");
        request.title = payload.title.clone();
        request.category = payload.category.clone();
        requests.insert(0, request);
        Ok(CreateRequestResponse { id: Some(id) })
    }

    async fn resolve_request(&self, id: &RequestId) -> Result<ResolveReceipt, StoreError> {
        self.resolved.lock().expect("lock").push(id.clone());
        if let Some(err) = self.resolve_failure.lock().expect("lock").clone() {
            return Err(err);
        }
        let already = {
            let mut requests = self.requests.lock().expect("lock");
            let Some(request) = requests.iter_mut().find(|request| &request.id == id) else {
                return Err(StoreError::Rejected {
                    status: 404,
                    message: Some("Request not found".to_string()),
                });
            };
            let already = request.status.is_serviced();
            request.status = RequestStatus::Serviced;
            already
        };
        let hold = self.hold_next_resolve.lock().expect("lock").take();
        if let Some(release) = hold {
            let _ = release.await;
        }
        if let Some(err) = self.resolve_failure_after_apply.lock().expect("lock").take() {
            return Err(err);
        }
        Ok(ResolveReceipt { already })
    }

    async fn save_receiver_location(
        &self,
        update: &LocationUpdate,
    ) -> Result<LocationCheckResult, StoreError> {
        self.locations.lock().expect("lock").push(update.clone());
        self.location_reply
            .lock()
            .expect("lock")
            .clone()
            .unwrap_or_else(|| Err(StoreError::Transport("no reply configured".to_string())))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Feed(FeedRender),
    Control(RequestId, ControlState),
    Message(String),
    FormReset,
    Alert(String),
    LocationStatus(LocationStatus),
    Dialog(Dialog),
}

#[derive(Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
    form_visible: AtomicBool,
}

impl RecordingView {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_visible_form() -> Arc<Self> {
        let view = Self::default();
        view.form_visible.store(true, Ordering::SeqCst);
        Arc::new(view)
    }

    pub fn views(self: &Arc<Self>) -> Views {
        Views {
            feed: Arc::clone(self) as Arc<dyn FeedView>,
            form: Arc::clone(self) as Arc<dyn FormView>,
            dialogs: Arc::clone(self) as Arc<dyn DialogView>,
        }
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().expect("lock").clone()
    }

    pub fn feeds(&self) -> Vec<FeedRender> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ViewEvent::Feed(render) => Some(render),
                _ => None,
            })
            .collect()
    }

    pub fn last_feed(&self) -> Option<FeedRender> {
        self.feeds().pop()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ViewEvent::Message(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn last_message(&self) -> Option<String> {
        self.messages().pop()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ViewEvent::Alert(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn dialogs(&self) -> Vec<Dialog> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ViewEvent::Dialog(dialog) => Some(dialog),
                _ => None,
            })
            .collect()
    }

    pub fn form_resets(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, ViewEvent::FormReset))
            .count()
    }

    fn push(&self, event: ViewEvent) {
        self.events.lock().expect("lock").push(event);
    }
}

impl FeedView for RecordingView {
    fn render(&self, render: &FeedRender) {
        self.push(ViewEvent::Feed(render.clone()));
    }

    fn update_control(&self, id: &RequestId, state: &ControlState) {
        self.push(ViewEvent::Control(id.clone(), state.clone()));
    }
}

impl FormView for RecordingView {
    fn is_visible(&self) -> bool {
        self.form_visible.load(Ordering::SeqCst)
    }

    fn show_message(&self, message: &str) {
        self.push(ViewEvent::Message(message.to_string()));
    }

    fn reset(&self) {
        self.push(ViewEvent::FormReset);
    }
}

impl DialogView for RecordingView {
    fn alert(&self, message: &str) {
        self.push(ViewEvent::Alert(message.to_string()));
    }

    fn show_location_status(&self, status: LocationStatus) {
        self.push(ViewEvent::LocationStatus(status));
    }

    fn show_dialog(&self, dialog: &Dialog) {
        self.push(ViewEvent::Dialog(dialog.clone()));
    }
}
