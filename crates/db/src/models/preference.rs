//! Preference rows.

use serde::Serialize;
use sqlx::FromRow;
use veo_gallery_core::types::Timestamp;

/// A row from the `preferences` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Preference {
    pub key: String,
    pub value: String,
    pub updated_at: Timestamp,
}
