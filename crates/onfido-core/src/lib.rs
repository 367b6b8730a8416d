//! Onfido Core Library
//!
//! This crate provides the domain models, error types and client configuration
//! shared by the Onfido API client crates.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{ClientConfig, Region};
pub use error::{ApiErrorDetail, ErrorMetadata, LogLevel, OnfidoError, Result};
pub use models::{LivePhoto, LivePhotoList, LivePhotoRequest};
