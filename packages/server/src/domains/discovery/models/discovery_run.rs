//! DiscoveryRun model
//!
//! Tracks each execution of the discovery pipeline (scheduled or manual).

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::common::DiscoveryRunId;

/// A single execution of the discovery pipeline
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DiscoveryRun {
    pub id: DiscoveryRunId,
    pub trigger_type: String, // 'scheduled', 'manual'
    pub queries_executed: i32,
    pub candidates_seen: i32,
    pub services_discovered: i32,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl DiscoveryRun {
    /// Create a new discovery run record
    pub async fn create(trigger_type: &str, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO discovery_runs (trigger_type) VALUES ($1) RETURNING *",
        )
        .bind(trigger_type)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Mark run as completed with final stats
    pub async fn complete(
        id: DiscoveryRunId,
        queries_executed: i32,
        candidates_seen: i32,
        services_discovered: i32,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE discovery_runs
             SET queries_executed = $2, candidates_seen = $3,
                 services_discovered = $4, completed_at = NOW()
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(queries_executed)
        .bind(candidates_seen)
        .bind(services_discovered)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Find recent runs (for the admin dashboard)
    pub async fn find_recent(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM discovery_runs ORDER BY started_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
