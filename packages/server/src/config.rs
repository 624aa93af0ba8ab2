use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub openai_api_key: String,
    /// Screenshot capture endpoint (e.g. a ScreenshotOne-style `GET ?url=` API)
    pub screenshot_endpoint: String,
    pub screenshot_access_key: Option<String>,
    /// File upload endpoint returning `{ "file_url": ... }`
    pub upload_endpoint: String,
    pub upload_api_token: Option<String>,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            openai_api_key: env::var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,
            screenshot_endpoint: env::var("SCREENSHOT_ENDPOINT")
                .context("SCREENSHOT_ENDPOINT must be set")?,
            screenshot_access_key: env::var("SCREENSHOT_ACCESS_KEY").ok(),
            upload_endpoint: env::var("UPLOAD_ENDPOINT").context("UPLOAD_ENDPOINT must be set")?,
            upload_api_token: env::var("UPLOAD_API_TOKEN").ok(),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default(),
        })
    }
}
