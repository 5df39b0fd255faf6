//! Ordered retrieval over a list of URL-rewriting strategies.
//!
//! A [`FallbackChain`] tries each strategy in turn and returns the first body
//! that came back with a success status and some content. Failed attempts are
//! logged and never surface to the caller.

use std::fmt;
use std::sync::Arc;

use crate::errors::AppError;
use crate::transport::HttpTransport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStrategy {
    /// Request the target URL as-is.
    Direct,
    /// Percent-encode the target and append it to a proxy prefix.
    Prefix(String),
}

impl FetchStrategy {
    pub fn apply(&self, target: &str) -> String {
        match self {
            FetchStrategy::Direct => target.to_string(),
            FetchStrategy::Prefix(prefix) => {
                format!("{}{}", prefix, urlencoding::encode(target))
            }
        }
    }
}

impl fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStrategy::Direct => write!(f, "direct"),
            FetchStrategy::Prefix(prefix) => write!(f, "proxy {}", prefix),
        }
    }
}

pub struct FallbackChain {
    transport: Arc<dyn HttpTransport>,
    strategies: Vec<FetchStrategy>,
}

impl FallbackChain {
    pub fn new(transport: Arc<dyn HttpTransport>, strategies: Vec<FetchStrategy>) -> Self {
        Self {
            transport,
            strategies,
        }
    }

    /// Direct first, then each proxy prefix in the given order.
    pub fn direct_then_proxies(transport: Arc<dyn HttpTransport>, proxies: &[String]) -> Self {
        let strategies = std::iter::once(FetchStrategy::Direct)
            .chain(proxies.iter().cloned().map(FetchStrategy::Prefix))
            .collect();
        Self::new(transport, strategies)
    }

    pub fn strategies(&self) -> &[FetchStrategy] {
        &self.strategies
    }

    pub async fn fetch(&self, target: &str) -> Option<String> {
        let total = self.strategies.len();

        for (idx, strategy) in self.strategies.iter().enumerate() {
            let url = strategy.apply(target);
            log::debug!("[{}/{}] Trying {}: {}", idx + 1, total, strategy, url);

            match self.try_strategy(&url).await {
                Ok(body) => {
                    log::debug!("[{}/{}] {} succeeded", idx + 1, total, strategy);
                    return Some(body);
                }
                Err(e) => {
                    log::warn!("[{}/{}] {} failed: {}", idx + 1, total, strategy, e);
                }
            }
        }

        log::warn!("All {} attempts failed for {}", total, target);
        None
    }

    async fn try_strategy(&self, url: &str) -> Result<String, AppError> {
        let response = self.transport.get(url).await?;

        if !response.is_success() {
            return Err(AppError::Network(format!("HTTP {}", response.status)));
        }

        if response.body.trim().is_empty() {
            return Err(AppError::Network("empty body".to_string()));
        }

        Ok(response.body)
    }
}
