//! HTTP implementation of [`RequestStore`] over the store's JSON API.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{cookie::Jar, Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{FeedSource, RequestId},
    error::ErrorBody,
    protocol::{
        CreateRequestPayload, CreateRequestResponse, LocationCheckResult, LocationUpdate,
        ResolveReceipt, ServiceRequest,
    },
};
use tracing::debug;
use url::Url;

use crate::{error::StoreError, RequestStore};

pub struct HttpRequestStore {
    http: Client,
    base: Url,
}

impl HttpRequestStore {
    pub fn new(server_url: &str) -> Result<Self> {
        Self::with_session_cookie(server_url, None)
    }

    /// Builds a store client with a cookie jar so the same-origin session
    /// cookie travels with every call. `session_cookie` seeds the jar, e.g.
    /// `"session=abc"`.
    pub fn with_session_cookie(server_url: &str, session_cookie: Option<&str>) -> Result<Self> {
        let base = Url::parse(server_url.trim())
            .with_context(|| format!("invalid server url '{server_url}'"))?;
        if base.cannot_be_a_base() {
            bail!("server url '{server_url}' cannot carry api paths");
        }
        let jar = Arc::new(Jar::default());
        if let Some(cookie) = session_cookie.filter(|cookie| !cookie.trim().is_empty()) {
            jar.add_cookie_str(cookie.trim(), &base);
        }
        let http = Client::builder()
            .cookie_provider(jar)
            .build()
            .context("failed to build http client")?;

        Ok(Self { http, base })
    }

    pub fn server_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// Appends `segments` to the server url, percent-encoding each one so an
    /// opaque id can never reach another route.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                StoreError::Transport(format!("server url '{}' cannot carry api paths", self.base))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn read_body(response: Response) -> Result<(u16, bool, Vec<u8>), StoreError> {
    let status = response.status();
    let body = response.bytes().await?;
    Ok((status.as_u16(), status.is_success(), body.to_vec()))
}

fn rejection(status: u16, body: &[u8]) -> StoreError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message().map(str::to_string));
    StoreError::Rejected { status, message }
}

/// Success bodies must decode; a malformed one counts as a transport failure.
async fn decode_strict<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let (status, success, body) = read_body(response).await?;
    if !success {
        return Err(rejection(status, &body));
    }
    serde_json::from_slice(&body)
        .map_err(|err| StoreError::Transport(format!("malformed response body: {err}")))
}

/// For mutations the status code is what counts; an unreadable success body
/// decodes as the default value.
async fn decode_lenient<T: DeserializeOwned + Default>(response: Response) -> Result<T, StoreError> {
    let (status, success, body) = read_body(response).await?;
    if !success {
        return Err(rejection(status, &body));
    }
    Ok(serde_json::from_slice(&body).unwrap_or_default())
}

#[async_trait]
impl RequestStore for HttpRequestStore {
    async fn list_requests(&self, source: FeedSource) -> Result<Vec<ServiceRequest>, StoreError> {
        let mut url = self.endpoint(source.path_segments())?;
        url.set_query(source.query());
        debug!(%url, "fetching request feed");
        let response = self.http.get(url).send().await?;
        decode_strict(response).await
    }

    async fn create_request(
        &self,
        payload: &CreateRequestPayload,
    ) -> Result<CreateRequestResponse, StoreError> {
        let response = self
            .http
            .post(self.endpoint(&["api", "requests"])?)
            .json(payload)
            .send()
            .await?;
        decode_lenient(response).await
    }

    async fn resolve_request(&self, id: &RequestId) -> Result<ResolveReceipt, StoreError> {
        let response = self
            .http
            .post(self.endpoint(&["api", "requests", id.as_str(), "resolve"])?)
            .send()
            .await?;
        decode_lenient(response).await
    }

    async fn save_receiver_location(
        &self,
        update: &LocationUpdate,
    ) -> Result<LocationCheckResult, StoreError> {
        let response = self
            .http
            .post(self.endpoint(&["api", "receiver", "location"])?)
            .json(update)
            .send()
            .await?;
        decode_strict(response).await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
