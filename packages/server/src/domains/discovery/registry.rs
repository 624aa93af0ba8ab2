//! In-memory index of already-known service URLs.
//!
//! Built once per discovery run from the canonical directory and prior
//! discoveries, then updated incrementally as the run accepts candidates, so
//! two candidates for the same URL from different queries in one run are
//! still deduplicated.

use std::collections::HashSet;

/// Set of normalized URLs considered already-known for a run.
///
/// The run's per-query loop is sequential, so plain `&mut` access is enough;
/// a parallel query loop would need a synchronized check-and-add instead.
#[derive(Debug, Default)]
pub struct UrlRegistry {
    known: HashSet<String>,
}

impl UrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the registry from raw URL strings (normalizing each).
    pub fn from_urls<I>(urls: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let known = urls
            .into_iter()
            .map(|url| Self::normalize(url.as_ref()))
            .collect();
        Self { known }
    }

    /// Canonicalize a URL to `host + path` for equality comparison.
    ///
    /// Lowercase, scheme stripped, leading `www.` stripped, one trailing `/`
    /// stripped. Must be applied identically everywhere URLs are compared.
    pub fn normalize(url: &str) -> String {
        let mut s = url.trim().to_lowercase();
        for scheme in ["https://", "http://"] {
            if let Some(rest) = s.strip_prefix(scheme) {
                s = rest.to_string();
                break;
            }
        }
        if let Some(rest) = s.strip_prefix("www.") {
            s = rest.to_string();
        }
        if let Some(rest) = s.strip_suffix('/') {
            s = rest.to_string();
        }
        s
    }

    /// Is this URL already known?
    pub fn contains(&self, url: &str) -> bool {
        self.known.contains(&Self::normalize(url))
    }

    /// Mark a URL as known. Returns false if it was already present.
    pub fn add(&mut self, url: &str) -> bool {
        self.known.insert(Self::normalize(url))
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_collapses_equivalent_urls() {
        assert_eq!(UrlRegistry::normalize("https://Foo.com/"), "foo.com");
        assert_eq!(UrlRegistry::normalize("http://www.foo.com"), "foo.com");
        assert_eq!(UrlRegistry::normalize("foo.com/"), "foo.com");
    }

    #[test]
    fn normalization_keeps_paths() {
        assert_eq!(
            UrlRegistry::normalize("https://www.foo.com/tools/bar/"),
            "foo.com/tools/bar"
        );
    }

    #[test]
    fn strips_only_one_trailing_slash() {
        assert_eq!(UrlRegistry::normalize("https://foo.com//"), "foo.com/");
    }

    #[test]
    fn contains_matches_any_equivalent_form() {
        let registry = UrlRegistry::from_urls(["https://example.com/"]);
        assert!(registry.contains("example.com"));
        assert!(registry.contains("http://www.example.com"));
        assert!(!registry.contains("other.com"));
    }

    #[test]
    fn add_dedups_within_a_run() {
        let mut registry = UrlRegistry::new();
        assert!(registry.add("https://newtool.ai"));
        assert!(!registry.add("http://www.newtool.ai/"));
        assert_eq!(registry.len(), 1);
    }
}
