//! Server dependencies for domain activities (using traits for testability)
//!
//! Central dependency container handed to the discovery pipeline and routes.
//! All external services sit behind trait abstractions so tests can inject
//! mocks.

use sqlx::PgPool;
use std::sync::Arc;

use super::{BaseDiscoveryOracle, BaseFileStorage, BaseImageGenerator, BaseScreenshotService};

/// Server dependencies accessible to activities
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// LLM + web-search oracle that turns a query string into candidate listings
    pub oracle: Arc<dyn BaseDiscoveryOracle>,
    /// Website screenshot capture (first choice for cover images)
    pub screenshots: Arc<dyn BaseScreenshotService>,
    /// AI image generation (cover-image fallback)
    pub image_gen: Arc<dyn BaseImageGenerator>,
    /// Upload storage for captured screenshots
    pub file_storage: Arc<dyn BaseFileStorage>,
}

impl ServerDeps {
    pub fn new(
        db_pool: PgPool,
        oracle: Arc<dyn BaseDiscoveryOracle>,
        screenshots: Arc<dyn BaseScreenshotService>,
        image_gen: Arc<dyn BaseImageGenerator>,
        file_storage: Arc<dyn BaseFileStorage>,
    ) -> Self {
        Self {
            db_pool,
            oracle,
            screenshots,
            image_gen,
            file_storage,
        }
    }
}
