use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;

use super::BaseFileStorage;

/// Client for an HTTP file-upload API returning `{ "file_url": ... }`
pub struct HttpFileStorage {
    client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file_url: String,
}

impl HttpFileStorage {
    pub fn new(endpoint: String, api_token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            api_token,
        })
    }
}

#[async_trait]
impl BaseFileStorage for HttpFileStorage {
    async fn upload(&self, file_name: &str, content_type: &str, bytes: Bytes) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(bytes.to_vec())
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .context("Invalid content type for upload")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let mut request = self.client.post(&self.endpoint).multipart(form);
        if let Some(token) = &self.api_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await.context("Failed to send upload request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("File upload error {}: {}", status, body);
        }

        let upload: UploadResponse = response
            .json()
            .await
            .context("Failed to parse upload response")?;
        Ok(upload.file_url)
    }
}
