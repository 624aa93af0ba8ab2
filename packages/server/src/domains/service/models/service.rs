use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::ServiceId;
use crate::domains::discovery::models::DiscoveredService;

/// Service - an approved AI tool listed in the directory.
///
/// Written by the admin review workflow (a discovery gets copied here on
/// approval); the discovery pipeline only reads this table to seed its
/// dedup registry.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub website_url: String,
    pub tagline: String,
    pub description: String,
    pub features: Vec<String>,
    pub pricing: String, // 'free', 'freemium', 'paid', 'subscription'
    pub category_ids: Vec<Uuid>,
    pub cover_image_url: String,
    pub logo_url: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Service {
    /// Find service by ID
    pub async fn find_by_id(id: ServiceId, pool: &PgPool) -> Result<Self> {
        let service = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(service)
    }

    /// Find all active services (the public browse surface)
    pub async fn find_active(pool: &PgPool) -> Result<Vec<Self>> {
        let services = sqlx::query_as::<_, Service>(
            "SELECT * FROM services WHERE active = true ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(services)
    }

    /// Case-insensitive text search over name, tagline and description
    pub async fn search(term: &str, pool: &PgPool) -> Result<Vec<Self>> {
        let pattern = format!("%{}%", term);
        let services = sqlx::query_as::<_, Service>(
            r#"
            SELECT * FROM services
            WHERE active = true
              AND (name ILIKE $1 OR tagline ILIKE $1 OR description ILIKE $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(pattern)
        .fetch_all(pool)
        .await?;
        Ok(services)
    }

    /// All website URLs in the canonical directory (dedup registry seed)
    pub async fn list_website_urls(pool: &PgPool) -> Result<Vec<String>> {
        let urls = sqlx::query_scalar::<_, String>("SELECT website_url FROM services")
            .fetch_all(pool)
            .await?;
        Ok(urls)
    }

    /// Copy an approved discovery into the directory.
    ///
    /// The unique index on `website_url` makes this the hard uniqueness
    /// boundary; a concurrent approval of the same URL returns `None`.
    pub async fn create_from_discovery(
        discovery: &DiscoveredService,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let service = sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services
                (name, website_url, tagline, description, features, pricing,
                 category_ids, cover_image_url, logo_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (website_url) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(&discovery.name)
        .bind(&discovery.website_url)
        .bind(&discovery.tagline)
        .bind(&discovery.description)
        .bind(&discovery.features)
        .bind(&discovery.suggested_pricing)
        .bind(&discovery.suggested_category_ids)
        .bind(&discovery.cover_image_url)
        .bind(&discovery.logo_url)
        .fetch_optional(pool)
        .await?;
        Ok(service)
    }
}
