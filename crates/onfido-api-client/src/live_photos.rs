//! Live photo endpoints.
//!
//! See https://documentation.onfido.com/api/latest/#live-photos

use std::io::Read;

use bytes::Bytes;
use onfido_core::{LivePhoto, LivePhotoList, LivePhotoRequest, OnfidoError, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use tokio_util::sync::CancellationToken;

use crate::multipart::encode_live_photo;
use crate::transport::Transport;
use crate::ApiClient;

const LIVE_PHOTOS_PATH: &str = "/live_photos";

/// Unreserved characters (RFC 3986) are left as-is in path segments and query values
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Uploads and fetches live photos through a [`Transport`].
///
/// Holds no state besides the transport, so one uploader can serve concurrent calls.
#[derive(Clone, Debug)]
pub struct LivePhotoUploader<T> {
    transport: T,
}

impl<T: Transport> LivePhotoUploader<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Upload a live photo for an applicant.
    ///
    /// The request's stream is read to the end before anything is sent. Errors from
    /// encoding or from the transport are returned unchanged and nothing is retried.
    #[tracing::instrument(
        skip(self, cancel, request),
        fields(applicant_id = %request.applicant_id, operation = "upload_live_photo")
    )]
    pub async fn upload<R: Read>(
        &self,
        cancel: &CancellationToken,
        request: LivePhotoRequest<R>,
    ) -> Result<LivePhoto> {
        if cancel.is_cancelled() {
            return Err(OnfidoError::Cancelled);
        }

        let form = encode_live_photo(request)?;
        tracing::debug!(body_size = form.body.len(), "Encoded live photo upload");

        let mut http_request =
            self.transport
                .new_request(Method::POST, LIVE_PHOTOS_PATH, Some(form.body))?;
        http_request.set_header(CONTENT_TYPE, &form.content_type)?;

        self.transport.execute(cancel, http_request).await
    }

    /// Retrieve a single live photo's metadata.
    pub async fn get(&self, cancel: &CancellationToken, live_photo_id: &str) -> Result<LivePhoto> {
        let path = format!("{}/{}", LIVE_PHOTOS_PATH, encode_component(live_photo_id));
        let request = self.transport.new_request(Method::GET, &path, None)?;
        self.transport.execute(cancel, request).await
    }

    /// List the live photos of an applicant.
    pub async fn list(
        &self,
        cancel: &CancellationToken,
        applicant_id: &str,
    ) -> Result<Vec<LivePhoto>> {
        let path = format!(
            "{}?applicant_id={}",
            LIVE_PHOTOS_PATH,
            encode_component(applicant_id)
        );
        let request = self.transport.new_request(Method::GET, &path, None)?;
        let list: LivePhotoList = self.transport.execute(cancel, request).await?;
        Ok(list.live_photos)
    }

    /// Download the raw image of a live photo.
    pub async fn download(&self, cancel: &CancellationToken, live_photo_id: &str) -> Result<Bytes> {
        let path = format!(
            "{}/{}/download",
            LIVE_PHOTOS_PATH,
            encode_component(live_photo_id)
        );
        let request = self.transport.new_request(Method::GET, &path, None)?;
        self.transport.send(cancel, request).await
    }
}

impl ApiClient {
    /// Live photo endpoints bound to this client.
    pub fn live_photos(&self) -> LivePhotoUploader<ApiClient> {
        LivePhotoUploader::new(self.clone())
    }

    /// Upload a live photo for an applicant, see [`LivePhotoUploader::upload`].
    pub async fn upload_live_photo<R: Read>(
        &self,
        cancel: &CancellationToken,
        request: LivePhotoRequest<R>,
    ) -> Result<LivePhoto> {
        self.live_photos().upload(cancel, request).await
    }
}
