use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;

use super::BaseScreenshotService;

/// Client for a `GET <endpoint>?url=<target>` screenshot-capture API
pub struct ScreenshotClient {
    client: reqwest::Client,
    endpoint: String,
    access_key: Option<String>,
}

impl ScreenshotClient {
    pub fn new(endpoint: String, access_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            access_key,
        })
    }

    fn capture_url(&self, website_url: &str) -> String {
        let mut url = format!(
            "{}?url={}",
            self.endpoint,
            urlencoding::encode(website_url)
        );
        if let Some(key) = &self.access_key {
            url.push_str(&format!("&access_key={}", urlencoding::encode(key)));
        }
        url
    }
}

#[async_trait]
impl BaseScreenshotService for ScreenshotClient {
    async fn capture(&self, website_url: &str) -> Result<Bytes> {
        let response = self
            .client
            .get(self.capture_url(website_url))
            .send()
            .await
            .context("Failed to send screenshot request")?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Screenshot service error {}", status);
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read screenshot bytes")?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_url_encodes_the_target() {
        let client =
            ScreenshotClient::new("https://shots.example/take".to_string(), None).unwrap();
        let url = client.capture_url("https://foo.com/a b");
        assert!(url.starts_with("https://shots.example/take?url="));
        assert!(url.contains("https%3A%2F%2Ffoo.com%2Fa%20b"));
    }

    #[test]
    fn capture_url_appends_access_key() {
        let client = ScreenshotClient::new(
            "https://shots.example/take".to_string(),
            Some("secret".to_string()),
        )
        .unwrap();
        assert!(client.capture_url("https://foo.com").contains("&access_key=secret"));
    }
}
