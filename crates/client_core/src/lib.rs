use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::{FeedSource, RequestId},
    protocol::{
        CreateRequestPayload, CreateRequestResponse, LocationCheckResult, LocationUpdate,
        ResolveReceipt, ServiceRequest,
    },
};

pub mod actions;
pub mod error;
pub mod feed;
pub mod gate;
pub mod location;
pub mod submission;
pub mod transport;
pub mod view;

pub use actions::{ActionDispatcher, DispatchOutcome};
pub use error::{StoreError, ValidationError};
pub use feed::{ActionControl, FeedSynchronizer, RefreshOutcome};
pub use gate::RequestGate;
pub use location::{LocationAvailabilityChecker, LocationOutcome};
pub use submission::{FormFlow, FormValues, SubmissionController, SubmitOutcome};
pub use transport::HttpRequestStore;

/// Remote store holding the service requests.
#[async_trait]
pub trait RequestStore: Send + Sync {
    async fn list_requests(&self, source: FeedSource) -> Result<Vec<ServiceRequest>, StoreError>;
    async fn create_request(
        &self,
        payload: &CreateRequestPayload,
    ) -> Result<CreateRequestResponse, StoreError>;
    async fn resolve_request(&self, id: &RequestId) -> Result<ResolveReceipt, StoreError>;
    async fn save_receiver_location(
        &self,
        update: &LocationUpdate,
    ) -> Result<LocationCheckResult, StoreError>;
}

/// Render targets a client draws on.
#[derive(Clone)]
pub struct Views {
    pub feed: Arc<dyn view::FeedView>,
    pub form: Arc<dyn view::FormView>,
    pub dialogs: Arc<dyn view::DialogView>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClientOptions {
    pub source: FeedSource,
    pub flow: FormFlow,
}

/// One page's worth of controller: a single gate shared by every component.
pub struct RequestFeedClient {
    pub gate: Arc<RequestGate>,
    pub feed: Arc<FeedSynchronizer>,
    pub actions: ActionDispatcher,
    pub submission: SubmissionController,
    pub location: LocationAvailabilityChecker,
}

impl RequestFeedClient {
    pub fn new(store: Arc<dyn RequestStore>, views: Views, options: ClientOptions) -> Self {
        let gate = Arc::new(RequestGate::new());
        let feed = Arc::new(FeedSynchronizer::new(
            Arc::clone(&store),
            Arc::clone(&views.feed),
            options.source,
        ));
        let actions = ActionDispatcher::new(
            Arc::clone(&store),
            Arc::clone(&feed),
            Arc::clone(&views.feed),
            Arc::clone(&views.dialogs),
        );
        let submission = SubmissionController::new(
            Arc::clone(&store),
            Arc::clone(&gate),
            Arc::clone(&views.form),
            Arc::clone(&feed),
            options.flow,
        );
        let location = LocationAvailabilityChecker::new(store, views.dialogs);

        Self {
            gate,
            feed,
            actions,
            submission,
            location,
        }
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
