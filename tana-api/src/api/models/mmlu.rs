//! API response models for the mmlu reference table.

use crate::db::models::mmlu::MmluDBResponse;
use crate::types::MmluId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MmluResponse {
    pub id: MmluId,
    pub name: String,
    pub description: String,
    /// Mood tag for the entry
    pub feeling: String,
    pub photo_url: String,
}

impl From<MmluDBResponse> for MmluResponse {
    fn from(db: MmluDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            description: db.description,
            feeling: db.feeling,
            photo_url: db.photo_url,
        }
    }
}
