use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::CategoryId;

/// A category in the directory's vocabulary (e.g. `image-generation`, `audio`).
///
/// The discovery categorizer only ever suggests IDs that exist here; unknown
/// slugs are silently dropped rather than fabricated.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub slug: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Find all categories, ordered by name
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name")
                .fetch_all(pool)
                .await?;
        Ok(categories)
    }

    /// Find a category by slug
    pub async fn find_by_slug(slug: &str, pool: &PgPool) -> Result<Option<Self>> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await?;
        Ok(category)
    }
}
