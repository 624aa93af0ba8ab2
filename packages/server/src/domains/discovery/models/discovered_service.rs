use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{CategoryId, DiscoveryId};
use crate::domains::service::models::Pricing;

/// DiscoveredService - an AI tool staged by the discovery pipeline, awaiting
/// admin review.
///
/// Created once per run, mutated exactly once afterwards by the cover-image
/// backfill; everything else about its lifecycle belongs to the review
/// workflow.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DiscoveredService {
    pub id: DiscoveryId,
    pub name: String,
    pub website_url: String,
    pub tagline: String,
    pub description: String,
    pub features: Vec<String>,
    pub suggested_pricing: String, // 'free', 'freemium', 'paid', 'subscription'
    pub suggested_category_ids: Vec<CategoryId>,
    pub cover_image_url: String,
    pub logo_url: String,
    pub status: String, // 'new', 'reviewed', 'approved', 'dismissed'
    pub source: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review status of a discovery. Transitions are forward-only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryStatus {
    New,
    Reviewed,
    Approved,
    Dismissed,
}

impl DiscoveryStatus {
    /// Whether moving to `next` is a legal forward transition.
    ///
    /// `approved` and `dismissed` are terminal.
    pub fn can_transition(&self, next: DiscoveryStatus) -> bool {
        use DiscoveryStatus::*;
        matches!(
            (self, next),
            (New, Reviewed) | (New, Approved) | (New, Dismissed) | (Reviewed, Approved) | (Reviewed, Dismissed)
        )
    }
}

impl std::fmt::Display for DiscoveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryStatus::New => write!(f, "new"),
            DiscoveryStatus::Reviewed => write!(f, "reviewed"),
            DiscoveryStatus::Approved => write!(f, "approved"),
            DiscoveryStatus::Dismissed => write!(f, "dismissed"),
        }
    }
}

impl std::str::FromStr for DiscoveryStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "new" => Ok(DiscoveryStatus::New),
            "reviewed" => Ok(DiscoveryStatus::Reviewed),
            "approved" => Ok(DiscoveryStatus::Approved),
            "dismissed" => Ok(DiscoveryStatus::Dismissed),
            _ => Err(anyhow::anyhow!("Invalid discovery status: {}", s)),
        }
    }
}

/// Insert payload for a vetted discovery. Produced by the candidate vetting
/// step; ids and timestamps are assigned by the database.
#[derive(Debug, Clone)]
pub struct NewDiscovery {
    pub name: String,
    pub website_url: String,
    pub tagline: String,
    pub description: String,
    pub features: Vec<String>,
    pub suggested_pricing: Pricing,
    pub suggested_category_ids: Vec<CategoryId>,
    pub logo_url: String,
    pub source: String,
    pub tags: Vec<String>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl DiscoveredService {
    /// Find discovery by ID
    pub async fn find_by_id(id: DiscoveryId, pool: &PgPool) -> Result<Self> {
        let discovery =
            sqlx::query_as::<_, DiscoveredService>("SELECT * FROM discovered_services WHERE id = $1")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(discovery)
    }

    /// Find discoveries with a given review status, newest first
    pub async fn find_by_status(status: DiscoveryStatus, pool: &PgPool) -> Result<Vec<Self>> {
        let discoveries = sqlx::query_as::<_, DiscoveredService>(
            "SELECT * FROM discovered_services WHERE status = $1 ORDER BY created_at DESC",
        )
        .bind(status.to_string())
        .fetch_all(pool)
        .await?;
        Ok(discoveries)
    }

    /// Find recent discoveries regardless of status
    pub async fn find_recent(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let discoveries = sqlx::query_as::<_, DiscoveredService>(
            "SELECT * FROM discovered_services ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(discoveries)
    }

    /// All website URLs of prior discoveries (dedup registry seed)
    pub async fn list_website_urls(pool: &PgPool) -> Result<Vec<String>> {
        let urls = sqlx::query_scalar::<_, String>("SELECT website_url FROM discovered_services")
            .fetch_all(pool)
            .await?;
        Ok(urls)
    }

    /// Total number of staged discoveries
    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM discovered_services")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Insert one chunk of vetted discoveries.
    ///
    /// The chunk is the unit of failure: all records of a chunk land together
    /// or not at all, and a failed chunk does not stop later chunks.
    pub async fn bulk_create(records: &[NewDiscovery], pool: &PgPool) -> Result<Vec<Self>> {
        let mut tx = pool.begin().await?;
        let mut created = Vec::with_capacity(records.len());

        for record in records {
            let row = sqlx::query_as::<_, DiscoveredService>(
                r#"
                INSERT INTO discovered_services
                    (name, website_url, tagline, description, features,
                     suggested_pricing, suggested_category_ids, logo_url, source, tags)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
                "#,
            )
            .bind(&record.name)
            .bind(&record.website_url)
            .bind(&record.tagline)
            .bind(&record.description)
            .bind(&record.features)
            .bind(record.suggested_pricing.to_string())
            .bind(&record.suggested_category_ids)
            .bind(&record.logo_url)
            .bind(&record.source)
            .bind(&record.tags)
            .fetch_one(&mut *tx)
            .await?;
            created.push(row);
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Set the cover image of an already-created discovery (backfill)
    pub async fn update_cover_image(id: DiscoveryId, url: &str, pool: &PgPool) -> Result<()> {
        sqlx::query(
            "UPDATE discovered_services SET cover_image_url = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(url)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Move a discovery to a new review status.
    ///
    /// Rejects anything but a forward transition; terminal states never
    /// change again.
    pub async fn set_status(
        id: DiscoveryId,
        next: DiscoveryStatus,
        pool: &PgPool,
    ) -> Result<Self> {
        let current = Self::find_by_id(id, pool).await?;
        let current_status: DiscoveryStatus = current.status.parse()?;

        if !current_status.can_transition(next) {
            anyhow::bail!(
                "Invalid status transition: {} -> {}",
                current_status,
                next
            );
        }

        let updated = sqlx::query_as::<_, DiscoveredService>(
            "UPDATE discovered_services SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(next.to_string())
        .fetch_one(pool)
        .await?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_moves_forward_only() {
        use DiscoveryStatus::*;
        assert!(New.can_transition(Reviewed));
        assert!(New.can_transition(Approved));
        assert!(New.can_transition(Dismissed));
        assert!(Reviewed.can_transition(Approved));
        assert!(Reviewed.can_transition(Dismissed));
    }

    #[test]
    fn terminal_states_never_change() {
        use DiscoveryStatus::*;
        for next in [New, Reviewed, Approved, Dismissed] {
            assert!(!Approved.can_transition(next));
            assert!(!Dismissed.can_transition(next));
        }
        assert!(!Reviewed.can_transition(New));
        assert!(!New.can_transition(New));
    }

    #[test]
    fn status_round_trips_through_strings() {
        use DiscoveryStatus::*;
        for status in [New, Reviewed, Approved, Dismissed] {
            let parsed: DiscoveryStatus = status.to_string().parse().unwrap();
            assert_eq!(status, parsed);
        }
    }
}
