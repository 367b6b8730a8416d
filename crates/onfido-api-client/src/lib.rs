//! HTTP client for the Onfido API.
//!
//! Provides the reqwest-backed [`ApiClient`] with token auth, the [`Transport`]
//! abstraction it implements, the multipart form encoder and the live photo
//! domain methods built on top of them.

pub mod live_photos;
pub mod multipart;
pub mod transport;

#[cfg(test)]
mod test_helpers;

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use onfido_core::{ClientConfig, OnfidoError, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, Url};
use tokio_util::sync::CancellationToken;

pub use live_photos::LivePhotoUploader;
pub use multipart::{encode_live_photo, file_part, EncodedForm};
pub use transport::{ApiRequest, Transport};

// Re-export core types for convenience.
pub use onfido_core::{
    ApiErrorDetail, ErrorMetadata, LivePhoto, LivePhotoList, LivePhotoRequest, Region,
};

/// Authentication strategy for the API.
#[derive(Clone)]
pub enum Auth {
    /// `Authorization: Token token={api_token}`
    Token(String),
    /// `Authorization: Bearer {token}`
    Bearer(String),
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::Token(_) => f.write_str("Token(<redacted>)"),
            Auth::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}

impl Auth {
    fn header_value(&self) -> String {
        match self {
            Auth::Token(token) => format!("Token token={}", token),
            Auth::Bearer(token) => format!("Bearer {}", token),
        }
    }
}

/// HTTP client for the Onfido API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Auth,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| OnfidoError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth: Auth::Token(config.api_token),
        })
    }

    /// Create client from environment, see [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Replace the authentication strategy (e.g. a Bearer SDK token).
    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header(AUTHORIZATION, self.auth.header_value())
    }
}

#[async_trait]
impl Transport for ApiClient {
    fn new_request(&self, method: Method, path: &str, body: Option<Bytes>) -> Result<ApiRequest> {
        if !path.starts_with('/') {
            return Err(OnfidoError::InvalidRequest(format!(
                "Path must start with '/': {}",
                path
            )));
        }
        let url = Url::parse(&self.build_url(path))
            .map_err(|e| OnfidoError::InvalidRequest(format!("Invalid URL for {}: {}", path, e)))?;

        let mut request = ApiRequest::new(method, url);
        request.body = body;
        request.set_header(ACCEPT, "application/json")?;
        Ok(request)
    }

    async fn send(&self, cancel: &CancellationToken, request: ApiRequest) -> Result<Bytes> {
        if cancel.is_cancelled() {
            return Err(OnfidoError::Cancelled);
        }

        let ApiRequest {
            method,
            url,
            headers,
            body,
        } = request;
        tracing::debug!(method = %method, url = %url, "Sending API request");

        let mut builder = self.client.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        let builder = self.apply_auth(builder);

        let exchange = async {
            let response = builder.send().await.map_err(OnfidoError::transport)?;
            let status = response.status();
            let body = response.bytes().await.map_err(OnfidoError::transport)?;
            Ok::<_, OnfidoError>((status, body))
        };

        let (status, body) = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("API request cancelled");
                return Err(OnfidoError::Cancelled);
            }
            result = exchange => result?,
        };

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "API request failed");
            return Err(OnfidoError::api(status.as_u16(), &body));
        }

        Ok(body)
    }
}
