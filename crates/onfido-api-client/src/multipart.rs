//! Multipart/form-data encoding for upload requests.
//!
//! The body is assembled in memory with reqwest's multipart form: the API needs a
//! `Content-Length` for uploads and live photos are small enough that buffering
//! them is the simplest option.

use std::io::Read;

use bytes::Bytes;
use onfido_core::{LivePhotoRequest, OnfidoError, Result};
use reqwest::blocking::multipart::{Form, Part};

/// A finished multipart body and the `Content-Type` header that matches it
#[derive(Debug, Clone)]
pub struct EncodedForm {
    pub body: Bytes,
    pub content_type: String,
}

impl EncodedForm {
    /// Render `form` into memory.
    pub fn from_form(form: Form) -> Result<Self> {
        let content_type = format!("multipart/form-data; boundary={}", form.boundary());
        let mut body = Vec::new();
        form.into_reader()
            .read_to_end(&mut body)
            .map_err(|e| OnfidoError::Encoding(format!("Failed to render multipart body: {}", e)))?;

        Ok(Self {
            body: Bytes::from(body),
            content_type,
        })
    }
}

/// Build a file part from `reader`, reading it to exhaustion.
///
/// The content type is detected from the data. When `file_name` is `None` a name
/// is derived from that content type.
pub fn file_part<R>(file_name: Option<&str>, reader: &mut R) -> Result<Part>
where
    R: Read + ?Sized,
{
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    let content_type = detect_content_type(&data);
    let file_name = match file_name {
        Some(file_name) => escape_file_name(file_name),
        None => default_file_name(content_type),
    };

    tracing::debug!(
        file_name = %file_name,
        content_type,
        size = data.len(),
        "Building multipart file part"
    );

    Part::bytes(data)
        .file_name(file_name)
        .mime_str(content_type)
        .map_err(|e| OnfidoError::Encoding(format!("Invalid part content type: {}", e)))
}

/// Encode a live photo upload as `file`, `applicant_id`, `advanced_validation`, in that order.
pub fn encode_live_photo<R: Read>(mut request: LivePhotoRequest<R>) -> Result<EncodedForm> {
    let file = file_part(request.file_name.as_deref(), &mut request.file)?;
    let advanced_validation = request.advanced_validation_value();

    let form = Form::new()
        .part("file", file)
        .text("applicant_id", request.applicant_id)
        .text("advanced_validation", advanced_validation)
        .percent_encode_noop();

    EncodedForm::from_form(form)
}

/// Percent-encode the bytes that would end the quoted `filename` parameter or the
/// header line. Non-ASCII text is sent as raw UTF-8.
fn escape_file_name(file_name: &str) -> String {
    file_name
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Detect the content type of the file data using magic numbers
fn detect_content_type(data: &[u8]) -> &'static str {
    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return "image/jpeg";
    }

    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return "image/png";
    }

    // GIF87a / GIF89a
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return "image/gif";
    }

    // WebP: RIFF ... WEBP
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return "image/webp";
    }

    "application/octet-stream"
}

fn default_file_name(content_type: &str) -> String {
    let extension = match content_type {
        "image/jpeg" => ".jpg",
        "image/png" => ".png",
        "image/gif" => ".gif",
        "image/webp" => ".webp",
        _ => "",
    };
    format!("live_photo{}", extension)
}
