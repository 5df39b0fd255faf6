use std::sync::Arc;

use crate::config::AppConfig;
use crate::fallback::FallbackChain;
use crate::transport::HttpTransport;

/// Retrieves feed documents: direct first, then each configured proxy.
pub struct FeedFetcher {
    chain: FallbackChain,
    base_url: String,
}

impl FeedFetcher {
    pub fn new(transport: Arc<dyn HttpTransport>, config: &AppConfig) -> Self {
        Self {
            chain: FallbackChain::direct_then_proxies(transport, &config.feed_proxies),
            base_url: config.feed_base_url.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Raw feed text, or `None` once every attempt has failed.
    pub async fn fetch(&self, feed_url: &str) -> Option<String> {
        log::info!("Fetching feed: {}", feed_url);
        let body = self.chain.fetch(feed_url).await;
        if body.is_none() {
            log::warn!(
                "Feed unavailable after {} attempts (often a cross-origin or network block): {}",
                self.chain.strategies().len(),
                feed_url
            );
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::FetchStrategy;
    use crate::transport::testing::FakeTransport;

    const FEED: &str = "https://www.youtube.com/feeds/videos.xml?playlist_id=PL1";

    #[tokio::test]
    async fn test_attempt_order_follows_config() {
        let transport = Arc::new(FakeTransport::new());
        let fetcher = FeedFetcher::new(transport.clone(), &AppConfig::default());

        assert_eq!(fetcher.fetch(FEED).await, None);

        let expected: Vec<String> = std::iter::once(FEED.to_string())
            .chain(
                AppConfig::default()
                    .feed_proxies
                    .into_iter()
                    .map(|p| FetchStrategy::Prefix(p).apply(FEED)),
            )
            .collect();
        assert_eq!(transport.calls(), expected);
    }

    #[tokio::test]
    async fn test_proxy_body_returned() {
        let transport = Arc::new(FakeTransport::new());
        let config = AppConfig {
            feed_proxies: vec!["https://proxy.example/?".to_string()],
            ..AppConfig::default()
        };
        transport.respond(FEED, 500, "");
        transport.respond(
            &FetchStrategy::Prefix("https://proxy.example/?".to_string()).apply(FEED),
            200,
            "<feed/>",
        );

        let fetcher = FeedFetcher::new(transport.clone(), &config);
        assert_eq!(fetcher.fetch(FEED).await.as_deref(), Some("<feed/>"));
        assert_eq!(fetcher.base_url(), config.feed_base_url);
    }
}
