//! Candidate vetting: turn one raw oracle candidate into zero or one
//! `NewDiscovery`, or reject it with a typed reason.
//!
//! The oracle is allowed to omit optional fields or hallucinate, so nothing
//! here trusts the candidate: required fields are checked, the URL must
//! actually parse, and category suggestions are resolved against the live
//! vocabulary rather than invented.

use std::collections::HashMap;

use url::Url;

use crate::common::CategoryId;
use crate::domains::category::models::Category;
use crate::domains::discovery::models::NewDiscovery;
use crate::domains::discovery::registry::UrlRegistry;
use crate::kernel::ToolCandidate;

/// Fallback logo when a favicon URL cannot be derived.
const DEFAULT_LOGO_URL: &str = "https://cdn.toolharbor.app/static/default-tool-logo.png";

/// Maximum length of the provenance string stored on a discovery.
const SOURCE_MAX_CHARS: usize = 50;

/// Why a candidate was rejected. Rejection is expected filtering, not failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CandidateRejection {
    #[error("missing name")]
    MissingName,
    #[error("missing website URL")]
    MissingUrl,
    #[error("unparseable website URL")]
    InvalidUrl,
    #[error("already known URL")]
    Duplicate,
}

/// Slug -> id lookup over the live category vocabulary.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    by_slug: HashMap<String, CategoryId>,
}

impl CategoryIndex {
    pub fn new(categories: &[Category]) -> Self {
        let by_slug = categories
            .iter()
            .map(|c| (c.slug.clone(), c.id))
            .collect();
        Self { by_slug }
    }

    pub fn id_for_slug(&self, slug: &str) -> Option<CategoryId> {
        self.by_slug.get(slug).copied()
    }
}

/// Keyword table driving category inference. A candidate whose text blob
/// contains any keyword of a row gets that row's category, provided the slug
/// exists in the vocabulary.
const KEYWORD_CATEGORIES: &[(&[&str], &str)] = &[
    (&["image", "photo", "art", "logo", "avatar"], "image-generation"),
    (&["video", "animation", "film"], "video"),
    (&["audio", "music", "voice", "speech", "podcast"], "audio"),
    (&["chat", "assistant", "bot", "gpt"], "chatbots"),
    (&["write", "writing", "content", "blog", "copy"], "writing"),
    (&["code", "developer", "programming", "software"], "code-assistant"),
    (&["productivity", "workflow", "automation"], "productivity"),
    (&["marketing", "seo", "ads"], "marketing"),
    (&["education", "learning", "tutor", "course"], "education"),
    (&["business", "finance", "crm", "analytics"], "business"),
    (&["3d", "render", "cad"], "3d"),
    (&["translation", "language", "translate"], "translation"),
    (&["research", "academic", "science"], "research"),
];

/// Infer category ids from a lowercase text blob.
///
/// Deterministic for a fixed blob and vocabulary; never yields an id outside
/// the vocabulary, and never yields duplicates.
pub fn suggest_categories(blob: &str, vocabulary: &CategoryIndex) -> Vec<CategoryId> {
    let mut suggested = Vec::new();
    for (keywords, slug) in KEYWORD_CATEGORIES {
        if keywords.iter().any(|kw| blob.contains(kw)) {
            if let Some(id) = vocabulary.id_for_slug(slug) {
                if !suggested.contains(&id) {
                    suggested.push(id);
                }
            }
        }
    }
    suggested
}

/// Best-effort logo URL from the site's favicon; static fallback otherwise.
/// Never fails and never leaves the field unset.
fn derive_logo_url(website: &Url) -> String {
    match website.host_str() {
        Some(host) => format!(
            "https://www.google.com/s2/favicons?domain={}&sz=128",
            host
        ),
        None => DEFAULT_LOGO_URL.to_string(),
    }
}

/// Truncate the originating query for the provenance field.
fn truncate_source(query: &str) -> String {
    query.chars().take(SOURCE_MAX_CHARS).collect()
}

/// Vet one candidate against the registry and vocabulary.
///
/// Pure aside from the registry mutation on acceptance: an accepted
/// candidate's normalized URL becomes known immediately, so later candidates
/// in the same run (from any query) deduplicate against it.
pub fn vet(
    candidate: &ToolCandidate,
    registry: &mut UrlRegistry,
    vocabulary: &CategoryIndex,
    query: &str,
) -> Result<NewDiscovery, CandidateRejection> {
    let name = candidate.name.trim();
    if name.is_empty() {
        return Err(CandidateRejection::MissingName);
    }
    let website_url = candidate.website_url.trim();
    if website_url.is_empty() {
        return Err(CandidateRejection::MissingUrl);
    }

    let parsed = Url::parse(website_url).map_err(|_| CandidateRejection::InvalidUrl)?;

    if registry.contains(website_url) {
        return Err(CandidateRejection::Duplicate);
    }

    let blob = format!(
        "{} {} {}",
        candidate.name,
        candidate.description,
        candidate.features.join(" ")
    )
    .to_lowercase();
    let suggested_category_ids = suggest_categories(&blob, vocabulary);

    let logo_url = derive_logo_url(&parsed);

    let tags = [&candidate.country, &candidate.language]
        .into_iter()
        .filter_map(|t| t.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    let record = NewDiscovery {
        name: name.to_string(),
        website_url: website_url.to_string(),
        tagline: candidate.tagline.trim().to_string(),
        description: candidate.description.trim().to_string(),
        features: candidate.features.clone(),
        suggested_pricing: candidate.pricing.unwrap_or_default(),
        suggested_category_ids,
        logo_url,
        source: truncate_source(query),
        tags,
    };

    registry.add(website_url);
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::CategoryId;
    use crate::domains::service::models::Pricing;
    use chrono::Utc;

    fn vocabulary_with(slugs: &[&str]) -> CategoryIndex {
        let categories: Vec<Category> = slugs
            .iter()
            .map(|slug| Category {
                id: CategoryId::new(),
                slug: slug.to_string(),
                name: slug.to_string(),
                created_at: Utc::now(),
            })
            .collect();
        CategoryIndex::new(&categories)
    }

    fn candidate(name: &str, website_url: &str) -> ToolCandidate {
        ToolCandidate {
            name: name.to_string(),
            website_url: website_url.to_string(),
            description: String::new(),
            tagline: String::new(),
            features: vec![],
            pricing: None,
            country: None,
            language: None,
        }
    }

    #[test]
    fn rejects_missing_name_and_url() {
        let mut registry = UrlRegistry::new();
        let vocabulary = CategoryIndex::default();

        let result = vet(&candidate("", "https://foo.com"), &mut registry, &vocabulary, "q");
        assert_eq!(result.unwrap_err(), CandidateRejection::MissingName);

        let result = vet(&candidate("Foo", "  "), &mut registry, &vocabulary, "q");
        assert_eq!(result.unwrap_err(), CandidateRejection::MissingUrl);
    }

    #[test]
    fn rejects_unparseable_url_without_panicking() {
        let mut registry = UrlRegistry::new();
        let vocabulary = CategoryIndex::default();

        let result = vet(&candidate("Foo", "not a url"), &mut registry, &vocabulary, "q");
        assert_eq!(result.unwrap_err(), CandidateRejection::InvalidUrl);
        // Never reaches the registry
        assert!(registry.is_empty());
    }

    #[test]
    fn rejects_duplicate_of_known_url() {
        let mut registry = UrlRegistry::from_urls(["example.com"]);
        let vocabulary = CategoryIndex::default();

        let result = vet(
            &candidate("Foo", "https://example.com/"),
            &mut registry,
            &vocabulary,
            "q",
        );
        assert_eq!(result.unwrap_err(), CandidateRejection::Duplicate);
    }

    #[test]
    fn accepting_a_candidate_dedups_the_rest_of_the_run() {
        let mut registry = UrlRegistry::new();
        let vocabulary = CategoryIndex::default();

        let first = vet(
            &candidate("Foo", "https://newtool.ai"),
            &mut registry,
            &vocabulary,
            "query one",
        );
        assert!(first.is_ok());

        // Same tool surfaced by a different query, different URL spelling
        let second = vet(
            &candidate("Foo AI", "http://www.newtool.ai/"),
            &mut registry,
            &vocabulary,
            "query two",
        );
        assert_eq!(second.unwrap_err(), CandidateRejection::Duplicate);
    }

    #[test]
    fn categorizes_text_to_speech_as_audio() {
        let vocabulary = vocabulary_with(&["audio", "video"]);
        let mut registry = UrlRegistry::new();

        let mut c = candidate("SpeakEasy", "https://speakeasy.example");
        c.description = "Turn any text to speech with natural voices".to_string();

        let record = vet(&c, &mut registry, &vocabulary, "q").unwrap();
        assert_eq!(record.suggested_category_ids.len(), 1);
        assert_eq!(
            record.suggested_category_ids[0],
            vocabulary.id_for_slug("audio").unwrap()
        );
    }

    #[test]
    fn unknown_slugs_yield_no_categories() {
        // Vocabulary lacks the mapped slug entirely
        let vocabulary = vocabulary_with(&["unrelated"]);
        let mut registry = UrlRegistry::new();

        let mut c = candidate("SpeakEasy", "https://speakeasy.example");
        c.description = "text to speech".to_string();

        let record = vet(&c, &mut registry, &vocabulary, "q").unwrap();
        assert!(record.suggested_category_ids.is_empty());
    }

    #[test]
    fn categorization_is_deterministic() {
        let vocabulary = vocabulary_with(&["image-generation", "video", "chatbots"]);
        let blob = "an ai art and video assistant bot";

        let first = suggest_categories(blob, &vocabulary);
        let second = suggest_categories(blob, &vocabulary);
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn derives_favicon_logo_from_host() {
        let mut registry = UrlRegistry::new();
        let vocabulary = CategoryIndex::default();

        let record = vet(
            &candidate("Foo", "https://foo.example/tools"),
            &mut registry,
            &vocabulary,
            "q",
        )
        .unwrap();
        assert!(record.logo_url.contains("foo.example"));
    }

    #[test]
    fn pricing_defaults_to_freemium() {
        let mut registry = UrlRegistry::new();
        let vocabulary = CategoryIndex::default();

        let record = vet(
            &candidate("Foo", "https://foo.example"),
            &mut registry,
            &vocabulary,
            "q",
        )
        .unwrap();
        assert_eq!(record.suggested_pricing, Pricing::Freemium);
    }

    #[test]
    fn source_is_truncated_to_fifty_chars() {
        let mut registry = UrlRegistry::new();
        let vocabulary = CategoryIndex::default();
        let long_query = "x".repeat(80);

        let record = vet(
            &candidate("Foo", "https://foo.example"),
            &mut registry,
            &vocabulary,
            &long_query,
        )
        .unwrap();
        assert_eq!(record.source.chars().count(), 50);
    }

    #[test]
    fn tags_come_from_country_and_language() {
        let mut registry = UrlRegistry::new();
        let vocabulary = CategoryIndex::default();

        let mut c = candidate("Foo", "https://foo.example");
        c.country = Some("Germany".to_string());
        c.language = Some(" ".to_string());

        let record = vet(&c, &mut registry, &vocabulary, "q").unwrap();
        assert_eq!(record.tags, vec!["Germany".to_string()]);
    }
}
