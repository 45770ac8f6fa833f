use crate::config::FeedConfig;
use crate::error::HttpError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Byte-level GET used by both the feed fetcher and the image retriever.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<Vec<u8>, HttpError>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FeedConfig) -> Result<Self, HttpError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(ms) = config.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        tracing::debug!(url, "GET");
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(HttpError::Status(status.as_u16()));
        }

        let bytes = resp.bytes().await?;
        tracing::debug!(url, bytes = bytes.len(), "response received");
        Ok(bytes.to_vec())
    }
}
