use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;

use crate::error::ScrapeError;
use crate::settings::Settings;

/// Anything that can hand back the HTML behind a URL.
pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Plain blocking GET, one request per page, no retries.
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.timeout_secs.map(Duration::from_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl PageSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Failed to fetch {url}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        response
            .text()
            .with_context(|| format!("Failed to read body of {url}"))
    }
}
