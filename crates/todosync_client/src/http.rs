//! HTTP transport implementation.
//!
//! Maps the REST verbs onto collection routes and normalizes responses
//! into the [`ClientError`] taxonomy. The actual HTTP client is
//! abstracted via a trait, so tests never touch the network and
//! different libraries (reqwest, hyper, ureq) can be plugged in.

use crate::config::StoreConfig;
use crate::error::{ClientError, ClientResult};
use crate::transport::RestTransport;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use todosync_model::{Todo, TodoDraft, TodoPatch};

/// HTTP verb used by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// Read a resource or the collection.
    Get,
    /// Create a resource.
    Post,
    /// Partially update a resource (merge, not overwrite).
    Patch,
    /// Delete a resource.
    Delete,
}

impl Verb {
    /// Returns the verb as its wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
        }
    }
}

/// A raw HTTP response: status code plus body bytes.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client abstraction.
///
/// The `Err` string represents a transport-level failure where no
/// response was received at all; it is normalized into
/// [`ClientError::Network`]. Timeout enforcement belongs to the
/// implementation.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends a request and returns status and body.
    async fn request(
        &self,
        verb: Verb,
        url: &str,
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse, String>;
}

/// JSON-over-HTTP implementation of [`RestTransport`].
///
/// Routes:
/// - `GET    {base}` / `GET {base}?completed=` — read collection
/// - `GET    {base}/{id}` — read one
/// - `POST   {base}` — create
/// - `PATCH  {base}/{id}` — partial update
/// - `DELETE {base}/{id}` — delete
pub struct HttpTransport<C: HttpClient> {
    base_url: String,
    client: C,
}

impl<C: HttpClient> HttpTransport<C> {
    /// Creates a transport for the given collection endpoint.
    pub fn new(base_url: impl Into<String>, client: C) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, client }
    }

    /// Returns the collection base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }

    async fn send(&self, verb: Verb, url: String, body: Option<Vec<u8>>) -> ClientResult<HttpResponse> {
        self.client
            .request(verb, &url, body)
            .await
            .map_err(ClientError::network)
    }
}

fn encode<T: Serialize>(value: &T) -> ClientResult<Vec<u8>> {
    serde_json::to_vec(value)
        .map_err(|e| ClientError::Unknown(format!("failed to encode request: {e}")))
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> ClientResult<T> {
    serde_json::from_slice(&response.body)
        .map_err(|e| ClientError::Unknown(format!("failed to decode response: {e}")))
}

fn server_error(response: &HttpResponse) -> ClientError {
    ClientError::server(response.status, error_message(&response.body))
}

/// Pulls a human-readable message out of an error body.
///
/// APIs in the wild answer with `{"error": ...}` or `{"message": ...}`;
/// anything else falls back to the raw text.
fn error_message(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        for key in ["error", "message"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        "no response body".to_string()
    } else {
        text
    }
}

#[async_trait]
impl<C: HttpClient> RestTransport for HttpTransport<C> {
    async fn list(&self, completed: Option<bool>) -> ClientResult<Vec<Todo>> {
        let url = match completed {
            Some(value) => format!("{}?completed={value}", self.base_url),
            None => self.base_url.clone(),
        };
        let response = self.send(Verb::Get, url, None).await?;
        if !response.is_success() {
            return Err(server_error(&response));
        }
        decode(&response)
    }

    async fn get(&self, id: &str) -> ClientResult<Todo> {
        let response = self.send(Verb::Get, self.item_url(id), None).await?;
        if response.status == 404 {
            return Err(ClientError::not_found(id));
        }
        if !response.is_success() {
            return Err(server_error(&response));
        }
        decode(&response)
    }

    async fn create(&self, draft: &TodoDraft) -> ClientResult<Todo> {
        let body = encode(draft)?;
        let response = self.send(Verb::Post, self.base_url.clone(), Some(body)).await?;
        if !response.is_success() {
            return Err(server_error(&response));
        }
        decode(&response)
    }

    async fn update(&self, id: &str, patch: &TodoPatch) -> ClientResult<Todo> {
        let body = encode(patch)?;
        let response = self.send(Verb::Patch, self.item_url(id), Some(body)).await?;
        if response.status == 404 {
            return Err(ClientError::not_found(id));
        }
        if !response.is_success() {
            return Err(server_error(&response));
        }
        decode(&response)
    }

    async fn delete(&self, id: &str) -> ClientResult<()> {
        let response = self.send(Verb::Delete, self.item_url(id), None).await?;
        // Deleting an already-gone item is success: delete is idempotent
        // end to end.
        if response.is_success() || response.status == 404 {
            return Ok(());
        }
        Err(server_error(&response))
    }
}

/// [`HttpClient`] backed by reqwest (rustls, no OpenSSL).
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a client enforcing the given request timeout.
    pub fn new(timeout: Duration) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Unknown(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Creates a client from the store configuration.
    pub fn from_config(config: &StoreConfig) -> ClientResult<Self> {
        Self::new(config.timeout)
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn request(
        &self,
        verb: Verb,
        url: &str,
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse, String> {
        let mut request = match verb {
            Verb::Get => self.client.get(url),
            Verb::Post => self.client.post(url),
            Verb::Patch => self.client.patch(url),
            Verb::Delete => self.client.delete(url),
        };
        if let Some(body) = body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = request.send().await.map_err(|e| e.to_string())?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| e.to_string())?.to_vec();

        Ok(HttpResponse { status, body })
    }
}
