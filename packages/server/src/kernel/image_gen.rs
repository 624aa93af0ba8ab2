use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::BaseImageGenerator;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI image-generation client (cover-art fallback)
pub struct OpenAiImageGenerator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

impl OpenAiImageGenerator {
    pub fn new(api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl BaseImageGenerator for OpenAiImageGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = ImageRequest {
            model: "dall-e-3",
            prompt,
            n: 1,
            size: "1792x1024",
        };

        let response = self
            .client
            .post(format!("{}/images/generations", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .context("Failed to send image generation request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Image generation error {}: {}", status, body);
        }

        let image_response: ImageResponse = response
            .json()
            .await
            .context("Failed to parse image generation response")?;

        image_response
            .data
            .into_iter()
            .next()
            .map(|d| d.url)
            .context("No image returned")
    }
}
