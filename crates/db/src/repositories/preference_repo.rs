//! Repository for the `preferences` table.
//!
//! A flat string key/value store. The gallery sort order is the only
//! typed preference and has dedicated helpers.

use chrono::Utc;
use veo_gallery_core::sort::SortKey;

use crate::models::preference::Preference;
use crate::DbPool;

/// Key under which the gallery sort order is stored.
pub const SORT_ORDER_KEY: &str = "veo-gallery-sort-order";

/// Column list for `preferences` queries.
const COLUMNS: &str = "key, value, updated_at";

/// Provides data access for preferences.
pub struct PreferenceRepo;

impl PreferenceRepo {
    /// Get a preference by key. Returns `None` if it was never set.
    pub async fn get(pool: &DbPool, key: &str) -> Result<Option<Preference>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM preferences WHERE key = ?1");
        sqlx::query_as::<_, Preference>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Insert or overwrite a preference.
    pub async fn set(pool: &DbPool, key: &str, value: &str) -> Result<Preference, sqlx::Error> {
        let query = format!(
            "INSERT INTO preferences (key, value, updated_at) \
             VALUES (?1, ?2, ?3) \
             ON CONFLICT (key) DO UPDATE SET \
                 value = excluded.value, \
                 updated_at = excluded.updated_at \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Preference>(&query)
            .bind(key)
            .bind(value)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Load the persisted gallery sort order.
    ///
    /// A missing or unrecognised value falls back to [`SortKey::default`].
    pub async fn load_sort_key(pool: &DbPool) -> Result<SortKey, sqlx::Error> {
        let Some(pref) = Self::get(pool, SORT_ORDER_KEY).await? else {
            return Ok(SortKey::default());
        };

        match pref.value.parse::<SortKey>() {
            Ok(key) => Ok(key),
            Err(_) => {
                tracing::warn!(value = %pref.value, "Ignoring unknown stored sort order");
                Ok(SortKey::default())
            }
        }
    }

    /// Persist the gallery sort order.
    pub async fn save_sort_key(pool: &DbPool, key: SortKey) -> Result<(), sqlx::Error> {
        Self::set(pool, SORT_ORDER_KEY, key.as_str()).await?;
        Ok(())
    }
}
