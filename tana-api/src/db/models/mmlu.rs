//! Database models for the mmlu reference table.

use crate::db::handlers::reference::ReferenceRow;
use crate::types::MmluId;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MmluDBResponse {
    pub id: MmluId,
    pub name: String,
    pub description: String,
    pub feeling: String,
    pub photo_url: String,
}

impl ReferenceRow for MmluDBResponse {
    const TABLE: &'static str = "mmlus";
    const COLUMNS: &'static str = "id, name, description, feeling, photo_url";
}
