//! Shared fixtures for unit tests.

use std::convert::Infallible;
use std::io::{self, Read};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use onfido_core::{OnfidoError, Result};
use reqwest::{Method, Url};
use tokio_util::sync::CancellationToken;

use crate::multipart::EncodedForm;
use crate::transport::{ApiRequest, Transport};

/// One part of a parsed multipart body
#[derive(Debug)]
pub struct ParsedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Parse an encoded form with multer, the parser behind axum's multipart extractor.
pub async fn parse_form(form: &EncodedForm) -> Vec<ParsedPart> {
    parse_body(&form.content_type, form.body.clone()).await
}

pub async fn parse_body(content_type: &str, body: Bytes) -> Vec<ParsedPart> {
    let boundary = multer::parse_boundary(content_type).expect("multipart content type");
    let stream = futures::stream::once(async move { Ok::<Bytes, Infallible>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.expect("valid multipart body") {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(|mime| mime.to_string());
        let data = field.bytes().await.expect("field data");
        parts.push(ParsedPart {
            name,
            file_name,
            content_type,
            data,
        });
    }
    parts
}

/// Reader that yields `data` and then fails with `BrokenPipe`.
pub struct FailingReader {
    data: io::Cursor<Vec<u8>>,
}

impl FailingReader {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data: io::Cursor::new(data),
        }
    }
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.read(buf)? {
            0 => Err(io::Error::new(io::ErrorKind::BrokenPipe, "stream reset")),
            n => Ok(n),
        }
    }
}

/// Transport double that records every request and replies with a canned response.
pub struct RecordingTransport {
    requests: Mutex<Vec<ApiRequest>>,
    status: u16,
    body: Bytes,
}

impl RecordingTransport {
    pub fn ok(body: &str) -> Self {
        Self::with_status(200, body)
    }

    pub fn with_status(status: u16, body: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            status,
            body: Bytes::copy_from_slice(body.as_bytes()),
        }
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    fn new_request(&self, method: Method, path: &str, body: Option<Bytes>) -> Result<ApiRequest> {
        let url = Url::parse(&format!("https://api.test{}", path))
            .map_err(|e| OnfidoError::InvalidRequest(e.to_string()))?;
        let mut request = ApiRequest::new(method, url);
        request.body = body;
        Ok(request)
    }

    async fn send(&self, cancel: &CancellationToken, request: ApiRequest) -> Result<Bytes> {
        if cancel.is_cancelled() {
            return Err(OnfidoError::Cancelled);
        }
        self.requests.lock().unwrap().push(request);
        if (200..300).contains(&self.status) {
            Ok(self.body.clone())
        } else {
            Err(OnfidoError::api(self.status, &self.body))
        }
    }
}
