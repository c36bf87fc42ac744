//! Drive module for talking to the Google APIs
//!
//! This module contains:
//! - HTTP client construction (user agent, proxy, TLS settings)
//! - Detection of expired or invalid access tokens
//! - The [`ObjectFetcher`] seam used by the crawler and its Drive implementation
//! - Serde models for the Drive v2 responses the crawler records

mod client;
mod fetcher;
mod types;

pub use client::{build_http_client, is_invalid_token_response};
pub use fetcher::{DriveFetcher, FetchError, ObjectFetcher};
pub use types::{
    Capabilities, ChildList, ChildReference, DriveObject, FileMetadata, ObjectBody, ObjectKind,
    Owner, ParentReference, Permission, DOCUMENT_MIME_TYPE, FOLDER_MIME_TYPE,
    PRESENTATION_MIME_TYPE, SPREADSHEET_MIME_TYPE,
};
