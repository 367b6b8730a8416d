//! Transport abstraction between the domain methods and the HTTP stack.
//!
//! Domain code only builds requests and hands them to a [`Transport`]; sending them,
//! authenticating, interpreting the status code and decoding the JSON body is the
//! transport's job. [`crate::ApiClient`] is the reqwest-backed implementation.

use async_trait::async_trait;
use bytes::Bytes;
use onfido_core::{OnfidoError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

/// A prepared API request: method, absolute URL, headers and optional body
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl ApiRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Set (or replace) a header. Fails if `value` is not a valid header value.
    pub fn set_header(&mut self, name: HeaderName, value: &str) -> Result<()> {
        let value = HeaderValue::from_str(value).map_err(|e| {
            OnfidoError::InvalidRequest(format!("Invalid value for header {}: {}", name, e))
        })?;
        self.headers.insert(name, value);
        Ok(())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Build a request for `path` (relative to the API base URL, starting with `/`).
    fn new_request(&self, method: Method, path: &str, body: Option<Bytes>) -> Result<ApiRequest>;

    /// Perform the request and return the body of a successful response.
    /// Non-success statuses are returned as [`OnfidoError::Api`].
    async fn send(&self, cancel: &CancellationToken, request: ApiRequest) -> Result<Bytes>;

    /// Perform the request and decode the JSON response into `T`.
    async fn execute<T>(&self, cancel: &CancellationToken, request: ApiRequest) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        let body = self.send(cancel, request).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
