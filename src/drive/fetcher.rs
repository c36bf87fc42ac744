//! Drive file fetcher
//!
//! Fetching a file takes at least two requests:
//! 1. Drive v2 `files.get` for the metadata, which also tells us the MIME type
//! 2. Depending on the type, the Docs/Sheets/Slides structure or the folder listing
//!
//! Only the metadata request can fail the fetch. A missing or unreadable body just
//! means the file yields no links.

use crate::config::{Config, EndpointConfig};
use crate::drive::client::{build_http_client, is_invalid_token_response};
use crate::drive::types::{
    ChildList, ChildReference, DriveObject, FileMetadata, ObjectBody, ObjectKind,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

/// Why a file could not be fetched
#[derive(Debug, Error)]
pub enum FetchError {
    /// The access token was rejected; no further request can succeed
    #[error("access token is invalid or expired")]
    AuthExpired,

    /// The API refused the file (not shared, deleted, ...)
    #[error("file unavailable (HTTP {status})")]
    Unavailable { status: u16 },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Returns true if the error must stop the whole crawl
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }
}

/// Source of Drive files for the crawler
#[async_trait]
pub trait ObjectFetcher: Send + Sync {
    /// Fetches the metadata and body of a file
    async fn fetch(&self, id: &str) -> Result<DriveObject, FetchError>;
}

/// Children listing order: folders first, then by modification and creation date
const FOLDER_ORDER: &str = "folder,modifiedDate,createdDate";

/// Status and body of a completed API request
struct ApiResponse {
    status: StatusCode,
    body: String,
}

/// [`ObjectFetcher`] backed by the Google REST APIs
pub struct DriveFetcher {
    client: Client,
    endpoints: EndpointConfig,
    access_token: String,
    folder_page_size: u32,
}

impl DriveFetcher {
    /// Creates a fetcher from the loaded configuration
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(&config.http)?,
            endpoints: config.endpoints.clone(),
            access_token: config.auth.access_token.clone(),
            folder_page_size: config.crawler.folder_page_size,
        })
    }

    /// Sends an authenticated GET and reads the whole body
    ///
    /// Returns [`FetchError::AuthExpired`] as soon as a response shows the token
    /// was rejected.
    async fn get<Q>(&self, url: &str, query: &[Q]) -> Result<ApiResponse, FetchError>
    where
        Q: serde::Serialize + Sync,
    {
        tracing::trace!("GET {}", url);

        let response = self
            .client
            .get(url)
            .query(query)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        if is_invalid_token_response(status, &headers, &body) {
            tracing::error!("Access token rejected by {}", url);
            return Err(FetchError::AuthExpired);
        }

        Ok(ApiResponse { status, body })
    }

    /// Fetches Drive v2 metadata for a file
    pub async fn fetch_metadata(&self, id: &str) -> Result<FileMetadata, FetchError> {
        let url = format!("{}/drive/v2/files/{}", base(&self.endpoints.drive), id);
        let response = self.get::<(&str, &str)>(&url, &[]).await?;

        if !response.status.is_success() {
            return Err(FetchError::Unavailable {
                status: response.status.as_u16(),
            });
        }

        let mut metadata: FileMetadata = serde_json::from_str(&response.body)?;
        if metadata.id.is_empty() {
            metadata.id = id.to_string();
        }
        Ok(metadata)
    }

    /// Fetches a Docs/Sheets/Slides structure
    ///
    /// Returns `Ok(None)` when the body is unavailable or not JSON. A body
    /// nested deeper than `serde_json`'s recursion limit of 128 fails to parse
    /// and is also treated as unavailable.
    async fn fetch_structure(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<Value>, FetchError> {
        let response = match self.get(url, query).await {
            Ok(response) => response,
            Err(FetchError::AuthExpired) => return Err(FetchError::AuthExpired),
            Err(e) => {
                tracing::warn!("Failed to fetch structure from {}: {}", url, e);
                return Ok(None);
            }
        };

        if !response.status.is_success() {
            tracing::debug!("Structure request to {} returned HTTP {}", url, response.status);
            return Ok(None);
        }

        match serde_json::from_str(&response.body) {
            Ok(structure) => Ok(Some(structure)),
            Err(e) => {
                tracing::debug!("Structure from {} is not JSON: {}", url, e);
                Ok(None)
            }
        }
    }

    /// Lists every child of a folder, following page tokens
    ///
    /// Pages are ordered folders first, then by modification and creation date.
    /// A page that fails ends the listing with whatever was already collected.
    pub async fn fetch_folder_children(
        &self,
        id: &str,
    ) -> Result<Vec<ChildReference>, FetchError> {
        let url = format!("{}/drive/v2/files/{}/children", base(&self.endpoints.drive), id);
        let page_size = self.folder_page_size.to_string();

        let mut children = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("maxResults", page_size.clone()),
                ("orderBy", FOLDER_ORDER.to_string()),
            ];
            if let Some(token) = page_token.take() {
                query.push(("pageToken", token));
            }

            let response = match self.get(&url, &query).await {
                Ok(response) => response,
                Err(FetchError::AuthExpired) => return Err(FetchError::AuthExpired),
                Err(e) => {
                    tracing::warn!("Failed to list children of folder {}: {}", id, e);
                    break;
                }
            };

            if !response.status.is_success() {
                tracing::warn!(
                    "Listing children of folder {} returned HTTP {}",
                    id,
                    response.status
                );
                break;
            }

            let page: ChildList = match serde_json::from_str(&response.body) {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!("Unreadable children listing for folder {}: {}", id, e);
                    break;
                }
            };

            children.extend(page.items);

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!("Folder {} has {} children", id, children.len());
        Ok(children)
    }

    /// Fetches the body that matches the file's kind
    async fn fetch_body(&self, id: &str, kind: ObjectKind) -> Result<ObjectBody, FetchError> {
        let structure = match kind {
            ObjectKind::Document => {
                let url = format!("{}/v1/documents/{}", base(&self.endpoints.docs), id);
                self.fetch_structure(&url, &[]).await?
            }
            ObjectKind::Spreadsheet => {
                let url = format!("{}/v4/spreadsheets/{}", base(&self.endpoints.sheets), id);
                self.fetch_structure(&url, &[("includeGridData", "true")])
                    .await?
            }
            ObjectKind::Presentation => {
                let url = format!("{}/v1/presentations/{}", base(&self.endpoints.slides), id);
                self.fetch_structure(&url, &[]).await?
            }
            ObjectKind::Folder => {
                return Ok(ObjectBody::Children(self.fetch_folder_children(id).await?));
            }
            ObjectKind::Other => None,
        };

        Ok(structure.map_or(ObjectBody::Empty, ObjectBody::Structure))
    }
}

#[async_trait]
impl ObjectFetcher for DriveFetcher {
    async fn fetch(&self, id: &str) -> Result<DriveObject, FetchError> {
        let metadata = self.fetch_metadata(id).await?;
        let kind = metadata.kind();
        let body = self.fetch_body(id, kind).await?;

        Ok(DriveObject {
            id: id.to_string(),
            metadata,
            body,
        })
    }
}

fn base(endpoint: &str) -> &str {
    endpoint.trim_end_matches('/')
}
