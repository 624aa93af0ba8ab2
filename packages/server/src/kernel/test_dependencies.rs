// Mock implementations of the kernel service traits for tests.
//
// Each mock records the calls it receives and can be scripted with canned
// responses or failures.

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use super::{
    BaseDiscoveryOracle, BaseFileStorage, BaseImageGenerator, BaseScreenshotService,
    ToolCandidate,
};

// =============================================================================
// Mock Discovery Oracle
// =============================================================================

#[derive(Default)]
pub struct MockOracle {
    responses: Mutex<HashMap<String, Vec<ToolCandidate>>>,
    failing: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
}

impl MockOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the candidates returned for a query
    pub fn with_candidates(self, query: &str, candidates: Vec<ToolCandidate>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(query.to_string(), candidates);
        self
    }

    /// Make a query fail with a network-style error
    pub fn failing_on(self, query: &str) -> Self {
        self.failing.lock().unwrap().insert(query.to_string());
        self
    }

    /// All queries the oracle was asked, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseDiscoveryOracle for MockOracle {
    async fn discover(&self, query: &str, _today: NaiveDate) -> Result<Vec<ToolCandidate>> {
        self.calls.lock().unwrap().push(query.to_string());

        if self.failing.lock().unwrap().contains(query) {
            anyhow::bail!("mock oracle: connection reset");
        }

        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }
}

// =============================================================================
// Mock Screenshot Service
// =============================================================================

pub struct MockScreenshotService {
    fail_status: Option<u16>,
    image: Bytes,
    calls: Mutex<Vec<String>>,
}

impl MockScreenshotService {
    pub fn new() -> Self {
        Self {
            fail_status: None,
            image: Bytes::from_static(b"\x89PNG mock"),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail every capture with the given HTTP status
    pub fn failing_with(status: u16) -> Self {
        Self {
            fail_status: Some(status),
            image: Bytes::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockScreenshotService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseScreenshotService for MockScreenshotService {
    async fn capture(&self, website_url: &str) -> Result<Bytes> {
        self.calls.lock().unwrap().push(website_url.to_string());

        if let Some(status) = self.fail_status {
            anyhow::bail!("Screenshot service error {}", status);
        }
        Ok(self.image.clone())
    }
}

// =============================================================================
// Mock Image Generator
// =============================================================================

pub struct MockImageGenerator {
    url: String,
    fail: bool,
    prompts: Mutex<Vec<String>>,
}

impl MockImageGenerator {
    pub fn new() -> Self {
        Self {
            url: "https://images.example/generated.png".to_string(),
            fail: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            url: String::new(),
            fail: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockImageGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseImageGenerator for MockImageGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if self.fail {
            anyhow::bail!("mock image generation failed");
        }
        Ok(self.url.clone())
    }
}

// =============================================================================
// Mock File Storage
// =============================================================================

pub struct MockFileStorage {
    base_url: String,
    fail: bool,
    uploads: Mutex<Vec<(String, usize)>>,
}

impl MockFileStorage {
    pub fn new() -> Self {
        Self {
            base_url: "https://files.example".to_string(),
            fail: false,
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            base_url: String::new(),
            fail: true,
            uploads: Mutex::new(Vec::new()),
        }
    }

    /// (file_name, byte length) of every upload received
    pub fn uploads(&self) -> Vec<(String, usize)> {
        self.uploads.lock().unwrap().clone()
    }
}

impl Default for MockFileStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseFileStorage for MockFileStorage {
    async fn upload(&self, file_name: &str, _content_type: &str, bytes: Bytes) -> Result<String> {
        self.uploads
            .lock()
            .unwrap()
            .push((file_name.to_string(), bytes.len()));

        if self.fail {
            anyhow::bail!("mock upload failed");
        }
        Ok(format!("{}/{}", self.base_url, file_name))
    }
}
