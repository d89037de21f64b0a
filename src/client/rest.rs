//! REST implementation of the remote list client.
//!
//! Talks to the list store's HTTP API: `GET /api/lists` as the connect
//! probe, then `items` collection endpoints per list. Session state is a
//! site URL behind an async lock; the HTTP client itself is shared for
//! connection pooling.

use super::{ClientError, FieldSet, MatchPredicate, RemoteListClient, RemoteRecord};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Per-request deadline.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for a remote hosted list store.
pub struct RestListClient {
    /// Shared HTTP client for connection pooling.
    client: Arc<Client>,
    /// Bearer token, when the store requires one.
    token: Option<String>,
    /// Site URL of the established session.
    session: RwLock<Option<String>>,
}

/// `items` collection response envelope.
#[derive(Deserialize)]
struct ItemsResponse {
    value: Vec<RemoteRecord>,
}

impl RestListClient {
    pub fn new(client: Arc<Client>, token: Option<String>) -> Self {
        Self {
            client,
            token,
            session: RwLock::new(None),
        }
    }

    /// Attach the bearer token when configured.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request, mapping transport failures.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        request
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Timeout(REQUEST_TIMEOUT.as_millis() as u64)
                } else {
                    ClientError::Network(e.to_string())
                }
            })
    }

    /// Site URL of the current session, or `NoSession`.
    async fn session_url(&self) -> Result<String, ClientError> {
        self.session
            .read()
            .await
            .clone()
            .ok_or(ClientError::NoSession)
    }

    /// Turn a non-success response into the matching error.
    async fn upstream_error(response: reqwest::Response) -> ClientError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        ClientError::Upstream { status, message }
    }
}

#[async_trait]
impl RemoteListClient for RestListClient {
    async fn connect(&self, site_url: &str) -> Result<(), ClientError> {
        let site_url = site_url.trim_end_matches('/');
        let url = format!("{}/api/lists", site_url);

        let response = self.send(self.authorize(self.client.get(&url))).await?;

        if response.status() == StatusCode::UNAUTHORIZED
            || response.status() == StatusCode::FORBIDDEN
        {
            return Err(ClientError::Authentication {
                site_url: site_url.to_string(),
                message: format!("store returned {}", response.status()),
            });
        }
        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }

        *self.session.write().await = Some(site_url.to_string());
        tracing::debug!(site_url = %site_url, "Session established");
        Ok(())
    }

    async fn current_session(&self) -> Option<String> {
        self.session.read().await.clone()
    }

    async fn query(
        &self,
        list_name: &str,
        predicate: &MatchPredicate,
    ) -> Result<Vec<RemoteRecord>, ClientError> {
        let site_url = self.session_url().await?;
        let url = format!("{}/api/lists/{}/items", site_url, list_name);
        let filter = predicate.to_filter_string();

        let request = self
            .authorize(self.client.get(&url))
            .query(&[("filter", filter.as_str())]);
        let response = self.send(request).await?;

        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }

        let body = response.text().await.map_err(|e| {
            ClientError::InvalidResponse(format!("Failed to read response body: {}", e))
        })?;
        let items: ItemsResponse = serde_json::from_str(&body).map_err(|e| {
            ClientError::InvalidResponse(format!("Failed to parse items response: {}", e))
        })?;

        Ok(items.value)
    }

    async fn create(&self, list_name: &str, fields: &FieldSet) -> Result<RemoteRecord, ClientError> {
        let site_url = self.session_url().await?;
        let url = format!("{}/api/lists/{}/items", site_url, list_name);

        let request = self.authorize(self.client.post(&url)).json(fields);
        let response = self.send(request).await?;

        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }

        let body = response.text().await.map_err(|e| {
            ClientError::InvalidResponse(format!("Failed to read response body: {}", e))
        })?;
        serde_json::from_str(&body).map_err(|e| {
            ClientError::InvalidResponse(format!("Failed to parse created record: {}", e))
        })
    }

    async fn update(
        &self,
        list_name: &str,
        record_id: i64,
        fields: &FieldSet,
    ) -> Result<bool, ClientError> {
        let site_url = self.session_url().await?;
        let url = format!("{}/api/lists/{}/items/{}", site_url, list_name, record_id);

        let request = self.authorize(self.client.patch(&url)).json(fields);
        let response = self.send(request).await?;

        // A vanished record is the caller's decision, not a client error.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }

        Ok(true)
    }

    async fn disconnect(&self) -> Result<(), ClientError> {
        let mut session = self.session.write().await;
        if session.take().is_some() {
            tracing::debug!("Session released");
        }
        Ok(())
    }
}
