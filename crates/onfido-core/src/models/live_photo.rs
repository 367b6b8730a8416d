use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Live photo record returned by the API.
/// Fields missing from (or null in) the payload take their zero value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LivePhoto {
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub href: String,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub download_href: String,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub file_name: String,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub file_type: String,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "is_zero")]
    pub file_size: i64,
}

/// `GET /live_photos` response envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LivePhotoList {
    #[serde(deserialize_with = "null_as_default")]
    pub live_photos: Vec<LivePhoto>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// Input for a live photo upload.
///
/// `file` must be positioned at the start of the photo. It is read to exhaustion but
/// never rewound or closed; pass `&mut reader` to keep ownership of the stream.
#[derive(Debug)]
pub struct LivePhotoRequest<R> {
    pub file: R,
    /// File name sent with the file part. Derived from the detected image type when unset.
    pub file_name: Option<String>,
    pub applicant_id: String,
    /// Sent as `"true"` unless explicitly `Some(false)`.
    pub advanced_validation: Option<bool>,
}

impl<R> LivePhotoRequest<R> {
    pub fn new(file: R, applicant_id: impl Into<String>) -> Self {
        Self {
            file,
            file_name: None,
            applicant_id: applicant_id.into(),
            advanced_validation: None,
        }
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn advanced_validation(mut self, enabled: bool) -> Self {
        self.advanced_validation = Some(enabled);
        self
    }

    /// Wire value of the `advanced_validation` form field.
    pub fn advanced_validation_value(&self) -> &'static str {
        match self.advanced_validation {
            Some(false) => "false",
            _ => "true",
        }
    }
}
