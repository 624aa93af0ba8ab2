//! Cover-image backfill for freshly staged discoveries.
//!
//! Only the head of each persisted chunk gets a cover, to bound external
//! calls per run. Per record: screenshot the website and upload it; if that
//! fails for any reason, fall back to AI image generation; if both fail the
//! cover stays empty. Nothing here ever propagates an error out.

use futures::future::join_all;
use tracing::{debug, warn};

use crate::common::DiscoveryId;
use crate::domains::discovery::models::DiscoveredService;
use crate::kernel::{BaseFileStorage, BaseImageGenerator, BaseScreenshotService, ServerDeps};

/// How many records per persisted chunk get a cover image.
pub const COVERS_PER_CHUNK: usize = 5;

/// Backfill covers for one persisted chunk. Side effects only; never fails.
pub async fn backfill_covers(created: &[DiscoveredService], deps: &ServerDeps) {
    let resolved = resolve_covers(
        created,
        deps.screenshots.as_ref(),
        deps.image_gen.as_ref(),
        deps.file_storage.as_ref(),
    )
    .await;

    for (id, url) in resolved {
        if let Err(e) = DiscoveredService::update_cover_image(id, &url, &deps.db_pool).await {
            warn!(discovery_id = %id, error = %e, "Failed to store cover image URL");
        }
    }
}

/// Resolve cover URLs for the bounded head of a chunk, concurrently.
pub(crate) async fn resolve_covers(
    records: &[DiscoveredService],
    screenshots: &dyn BaseScreenshotService,
    image_gen: &dyn BaseImageGenerator,
    storage: &dyn BaseFileStorage,
) -> Vec<(DiscoveryId, String)> {
    let futures = records.iter().take(COVERS_PER_CHUNK).map(|record| async {
        let url = resolve_cover(
            &record.name,
            &record.website_url,
            record.id,
            screenshots,
            image_gen,
            storage,
        )
        .await;
        (record.id, url)
    });

    join_all(futures)
        .await
        .into_iter()
        .filter_map(|(id, url)| url.map(|u| (id, u)))
        .collect()
}

/// Screenshot first, generated image second, empty cover as the terminal
/// fallback.
async fn resolve_cover(
    name: &str,
    website_url: &str,
    id: DiscoveryId,
    screenshots: &dyn BaseScreenshotService,
    image_gen: &dyn BaseImageGenerator,
    storage: &dyn BaseFileStorage,
) -> Option<String> {
    match screenshot_cover(website_url, id, screenshots, storage).await {
        Ok(url) => return Some(url),
        Err(e) => {
            debug!(tool = name, error = %e, "Screenshot cover failed, falling back to generation");
        }
    }

    match image_gen.generate(&cover_prompt(name)).await {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(tool = name, error = %e, "No cover image could be produced");
            None
        }
    }
}

async fn screenshot_cover(
    website_url: &str,
    id: DiscoveryId,
    screenshots: &dyn BaseScreenshotService,
    storage: &dyn BaseFileStorage,
) -> anyhow::Result<String> {
    let bytes = screenshots.capture(website_url).await?;
    storage
        .upload(&format!("covers/{}.png", id), "image/png", bytes)
        .await
}

fn cover_prompt(name: &str) -> String {
    format!(
        "Abstract digital artwork evoking an AI tool called \"{}\": flowing neural-network \
         motifs, soft gradients, dark background. No text, no letters, no logos.",
        name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::{
        MockFileStorage, MockImageGenerator, MockScreenshotService,
    };
    use chrono::Utc;

    fn record(name: &str, website_url: &str) -> DiscoveredService {
        DiscoveredService {
            id: DiscoveryId::new(),
            name: name.to_string(),
            website_url: website_url.to_string(),
            tagline: String::new(),
            description: String::new(),
            features: vec![],
            suggested_pricing: "freemium".to_string(),
            suggested_category_ids: vec![],
            cover_image_url: String::new(),
            logo_url: String::new(),
            status: "new".to_string(),
            source: String::new(),
            tags: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn screenshot_success_uploads_and_skips_generation() {
        let screenshots = MockScreenshotService::new();
        let image_gen = MockImageGenerator::new();
        let storage = MockFileStorage::new();

        let records = vec![record("Foo", "https://foo.ai")];
        let resolved = resolve_covers(&records, &screenshots, &image_gen, &storage).await;

        assert_eq!(resolved.len(), 1);
        assert!(resolved[0].1.starts_with("https://files.example/covers/"));
        assert_eq!(storage.uploads().len(), 1);
        assert!(image_gen.prompts().is_empty());
    }

    #[tokio::test]
    async fn screenshot_failure_falls_back_to_generation_once() {
        let screenshots = MockScreenshotService::failing_with(403);
        let image_gen = MockImageGenerator::new();
        let storage = MockFileStorage::new();

        let records = vec![record("Foo", "https://foo.ai")];
        let resolved = resolve_covers(&records, &screenshots, &image_gen, &storage).await;

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].1, "https://images.example/generated.png");
        assert_eq!(image_gen.prompts().len(), 1);
        assert!(image_gen.prompts()[0].contains("Foo"));
        assert!(storage.uploads().is_empty());
    }

    #[tokio::test]
    async fn upload_failure_also_falls_back_to_generation() {
        let screenshots = MockScreenshotService::new();
        let image_gen = MockImageGenerator::new();
        let storage = MockFileStorage::failing();

        let records = vec![record("Foo", "https://foo.ai")];
        let resolved = resolve_covers(&records, &screenshots, &image_gen, &storage).await;

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].1, "https://images.example/generated.png");
    }

    #[tokio::test]
    async fn both_fallbacks_failing_leaves_the_cover_empty() {
        let screenshots = MockScreenshotService::failing_with(500);
        let image_gen = MockImageGenerator::failing();
        let storage = MockFileStorage::new();

        let records = vec![record("Foo", "https://foo.ai")];
        let resolved = resolve_covers(&records, &screenshots, &image_gen, &storage).await;

        assert!(resolved.is_empty());
    }

    #[tokio::test]
    async fn only_the_chunk_head_gets_covers() {
        let screenshots = MockScreenshotService::new();
        let image_gen = MockImageGenerator::new();
        let storage = MockFileStorage::new();

        let records: Vec<DiscoveredService> = (0..8)
            .map(|i| record(&format!("Tool{}", i), &format!("https://tool{}.ai", i)))
            .collect();
        let resolved = resolve_covers(&records, &screenshots, &image_gen, &storage).await;

        assert_eq!(resolved.len(), COVERS_PER_CHUNK);
        assert_eq!(screenshots.calls().len(), COVERS_PER_CHUNK);
    }
}
