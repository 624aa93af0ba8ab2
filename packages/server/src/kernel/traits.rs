// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (what to do with candidates) lives in domain activities.
//
// Naming convention: Base* for trait names (e.g., BaseDiscoveryOracle)

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domains::service::models::Pricing;

// =============================================================================
// Discovery Oracle Trait (LLM + web search returning structured candidates)
// =============================================================================

/// An unvalidated tool record as returned by the discovery oracle.
///
/// Only `name` and `website_url` are mandatory; everything else may be
/// missing, and the whole record may be wrong. Vetting decides what survives.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ToolCandidate {
    pub name: String,
    pub website_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub pricing: Option<Pricing>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[async_trait]
pub trait BaseDiscoveryOracle: Send + Sync {
    /// Run one web-search-backed discovery call for a single query string.
    ///
    /// Returns the candidate listings the oracle could verify on the web;
    /// an empty list is a valid answer.
    async fn discover(&self, query: &str, today: NaiveDate) -> Result<Vec<ToolCandidate>>;
}

// =============================================================================
// Screenshot Service Trait (website capture)
// =============================================================================

#[async_trait]
pub trait BaseScreenshotService: Send + Sync {
    /// Capture a screenshot of the given website, returning raw image bytes.
    async fn capture(&self, website_url: &str) -> Result<Bytes>;
}

// =============================================================================
// Image Generation Trait (cover-art fallback)
// =============================================================================

#[async_trait]
pub trait BaseImageGenerator: Send + Sync {
    /// Generate an image for a prompt; returns a hosted image URL.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

// =============================================================================
// File Storage Trait (uploads)
// =============================================================================

#[async_trait]
pub trait BaseFileStorage: Send + Sync {
    /// Upload a file and return its public URL.
    async fn upload(&self, file_name: &str, content_type: &str, bytes: Bytes) -> Result<String>;
}
