//! Drive API data types
//!
//! Only the fields the crawler records are modelled. Everything is optional or
//! defaulted because shared files routinely omit fields the caller lacks
//! permission to see.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub const DOCUMENT_MIME_TYPE: &str = "application/vnd.google-apps.document";
pub const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";
pub const PRESENTATION_MIME_TYPE: &str = "application/vnd.google-apps.presentation";
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// What a Drive file is, as far as link discovery is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Google Doc
    Document,
    /// Google Sheet
    Spreadsheet,
    /// Google Slides deck
    Presentation,
    /// Drive folder
    Folder,
    /// Any other file (PDFs, images, uploads...): metadata only
    Other,
}

impl ObjectKind {
    pub fn from_mime_type(mime_type: &str) -> Self {
        match mime_type {
            DOCUMENT_MIME_TYPE => Self::Document,
            SPREADSHEET_MIME_TYPE => Self::Spreadsheet,
            PRESENTATION_MIME_TYPE => Self::Presentation,
            FOLDER_MIME_TYPE => Self::Folder,
            _ => Self::Other,
        }
    }
}

/// Drive v2 `files.get` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileMetadata {
    pub id: String,
    pub title: Option<String>,
    pub mime_type: Option<String>,
    pub created_date: Option<String>,
    pub modified_date: Option<String>,
    /// int64 values are encoded as JSON strings by the Drive API
    #[serde(deserialize_with = "string_or_number")]
    pub version: Option<String>,
    pub parents: Vec<ParentReference>,
    pub user_permission: Option<Permission>,
    pub owners: Vec<Owner>,
    pub capabilities: Option<Capabilities>,
    pub explicitly_trashed: Option<bool>,
}

impl FileMetadata {
    pub fn kind(&self) -> ObjectKind {
        self.mime_type
            .as_deref()
            .map(ObjectKind::from_mime_type)
            .unwrap_or(ObjectKind::Other)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ParentReference {
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Permission {
    pub id: String,
    pub role: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Owner {
    pub email_address: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Capabilities {
    pub can_edit: Option<bool>,
}

/// Entry of a folder's children listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChildReference {
    pub id: String,
}

/// One page of a Drive v2 `children.list` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChildList {
    pub items: Vec<ChildReference>,
    pub next_page_token: Option<String>,
}

/// Content of a fetched file beyond its metadata
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectBody {
    /// Docs/Sheets/Slides structure
    Structure(Value),
    /// Every child of a folder, across all listing pages
    Children(Vec<ChildReference>),
    /// No retrievable content
    Empty,
}

/// A fetched Drive file
#[derive(Debug, Clone)]
pub struct DriveObject {
    pub id: String,
    pub metadata: FileMetadata,
    pub body: ObjectBody,
}

impl DriveObject {
    pub fn kind(&self) -> ObjectKind {
        self.metadata.kind()
    }

    /// Links found in the file body
    pub fn links(&self) -> Vec<String> {
        crate::links::links_for(self.kind(), &self.body)
    }
}
