//! Result record built from Drive metadata

use crate::drive::FileMetadata;
use serde::Serialize;

/// Column order of the results file
pub const RESULT_COLUMNS: [&str; 11] = [
    "id",
    "title",
    "mime",
    "created",
    "modified",
    "version",
    "parent_folders",
    "permissions",
    "owners",
    "can_edit",
    "trashed",
];

/// One row of crawl output per fetched Drive file
///
/// Field order matches [`RESULT_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    pub id: String,
    pub title: String,
    pub mime: String,
    pub created: String,
    pub modified: String,
    pub version: String,
    /// Space-separated folder URLs
    pub parent_folders: String,
    /// `<permission id>:<role>` of the authenticated user
    pub permissions: String,
    /// `email (display name)` entries separated by `; `
    pub owners: String,
    pub can_edit: bool,
    pub trashed: bool,
}

impl ResultRecord {
    pub fn from_metadata(metadata: &FileMetadata) -> Self {
        let parent_folders = metadata
            .parents
            .iter()
            .map(|parent| format!("https://drive.google.com/drive/folders/{}", parent.id))
            .collect::<Vec<_>>()
            .join(" ");

        let permissions = metadata
            .user_permission
            .as_ref()
            .map(|permission| format!("{}:{}", permission.id, permission.role))
            .unwrap_or_default();

        let owners = metadata
            .owners
            .iter()
            .map(|owner| {
                let email = owner.email_address.as_deref().unwrap_or("");
                match owner.display_name.as_deref() {
                    Some(name) => format!("{} ({})", email, name).trim().to_string(),
                    None => email.to_string(),
                }
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self {
            id: metadata.id.clone(),
            title: metadata.title.clone().unwrap_or_default(),
            mime: metadata.mime_type.clone().unwrap_or_default(),
            created: metadata.created_date.clone().unwrap_or_default(),
            modified: metadata.modified_date.clone().unwrap_or_default(),
            version: metadata.version.clone().unwrap_or_default(),
            parent_folders,
            permissions,
            owners,
            can_edit: metadata
                .capabilities
                .as_ref()
                .and_then(|c| c.can_edit)
                .unwrap_or(false),
            trashed: metadata.explicitly_trashed.unwrap_or(false),
        }
    }
}
