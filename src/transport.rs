use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::AppConfig;
use crate::errors::AppError;

/// Status and body text of a completed GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Byte-level retrieval used by title lookups and feed fetches.
///
/// Implementations report transport failures as `Err`; a response with a
/// non-success status is still `Ok` and is judged by the caller.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, AppError>;
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, AppError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
