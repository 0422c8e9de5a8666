//! API DTOs (Data Transfer Objects)

use kernel::id::{PetId, PetStatusId, UploadedFileId};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{PetType, Sex};

// ============================================================================
// Pet
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetView {
    pub id: PetId,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub pet_type: Option<PetType>,
    pub sex: Option<Sex>,
    pub description: Option<String>,
    pub address: Option<String>,
    /// Status id only
    pub pet_status: Option<PetStatusId>,
    pub image_url: Option<String>,
    pub gallery: Vec<UploadedFileView>,
    /// Epoch milliseconds
    pub created: i64,
    pub last_modified: i64,
}

/// Body of `POST /pets` and `PUT /pets/{id}`; every field may be omitted
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetRequestBody {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub pet_type: Option<PetType>,
    pub sex: Option<Sex>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub pet_status: Option<PetStatusId>,
}

// ============================================================================
// Files
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFileView {
    pub id: UploadedFileId,
    pub path: String,
    pub file_url: Option<String>,
    pub created: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlView {
    pub url: String,
}
