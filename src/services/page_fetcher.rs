use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::{header, Client, StatusCode};

use crate::domain::tables::USER_AGENTS;

/// Retrieves page markup. Any failure comes back as an empty string.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> String;
}

pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .unwrap_or_else(|e| {
                log::error!("Failed to build http client, using defaults: {:?}", e);
                Client::new()
            });

        HttpPageFetcher { client }
    }

    async fn try_fetch(&self, url: &str) -> Result<String, reqwest::Error> {
        let response = self
            .client
            .get(url)
            .header(header::USER_AGENT, random_user_agent())
            .header(
                header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.5")
            .header(header::DNT, "1")
            .header(header::UPGRADE_INSECURE_REQUESTS, "1")
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => response.text().await,
            status => {
                log::warn!("Failed to fetch {}: status code {}", url, status);
                Ok(String::new())
            }
        }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> String {
        match self.try_fetch(url).await {
            Ok(markup) => markup,
            Err(e) => {
                log::warn!("Error during request to {}: {:?}", url, e);
                String::new()
            }
        }
    }
}

pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}
