use serde::Deserialize;
use std::sync::Arc;

use crate::config::{AppConfig, FALLBACK_TITLE, OEMBED_URL};
use crate::errors::AppError;
use crate::fallback::FallbackChain;
use crate::transport::HttpTransport;

#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    title: Option<String>,
}

/// Looks up display titles through the oEmbed endpoint.
pub struct TitleResolver {
    chain: FallbackChain,
}

impl TitleResolver {
    pub fn new(transport: Arc<dyn HttpTransport>, config: &AppConfig) -> Self {
        Self {
            chain: FallbackChain::direct_then_proxies(transport, &config.title_proxies),
        }
    }

    pub fn oembed_url(source_url: &str) -> String {
        format!(
            "{}?url={}&format=json",
            OEMBED_URL,
            urlencoding::encode(source_url)
        )
    }

    /// Never fails: any lookup problem yields the fallback label.
    pub async fn resolve_title(&self, source_url: &str) -> String {
        match self.lookup(source_url).await {
            Ok(title) => {
                log::debug!("Fetched title: {}", title);
                title
            }
            Err(e) => {
                log::warn!("Failed to fetch title for {}: {}", source_url, e);
                FALLBACK_TITLE.to_string()
            }
        }
    }

    async fn lookup(&self, source_url: &str) -> Result<String, AppError> {
        let body = self
            .chain
            .fetch(&Self::oembed_url(source_url))
            .await
            .ok_or_else(|| AppError::Network("oEmbed lookup failed".to_string()))?;

        let data: OEmbedResponse = serde_json::from_str(&body)?;

        data.title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Parse("Missing 'title' field".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::FakeTransport;

    const VIDEO: &str = "https://youtu.be/dQw4w9WgXcQ";

    fn resolver(transport: &Arc<FakeTransport>) -> TitleResolver {
        TitleResolver::new(transport.clone(), &AppConfig::default())
    }

    #[test]
    fn test_oembed_url() {
        assert_eq!(
            TitleResolver::oembed_url(VIDEO),
            "https://www.youtube.com/oembed?url=https%3A%2F%2Fyoutu.be%2FdQw4w9WgXcQ&format=json"
        );
    }

    #[tokio::test]
    async fn test_title_from_response() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond(
            &TitleResolver::oembed_url(VIDEO),
            200,
            r#"{"title":"Never Gonna Give You Up","author_name":"Rick Astley"}"#,
        );

        let title = resolver(&transport).resolve_title(VIDEO).await;
        assert_eq!(title, "Never Gonna Give You Up");
    }

    #[tokio::test]
    async fn test_fallback_on_failures() {
        let transport = Arc::new(FakeTransport::new());
        let resolver = resolver(&transport);
        let url = TitleResolver::oembed_url(VIDEO);

        transport.fail(&url, "timed out");
        assert_eq!(resolver.resolve_title(VIDEO).await, FALLBACK_TITLE);

        transport.respond(&url, 404, "Not Found");
        assert_eq!(resolver.resolve_title(VIDEO).await, FALLBACK_TITLE);

        transport.respond(&url, 200, "<html>not json</html>");
        assert_eq!(resolver.resolve_title(VIDEO).await, FALLBACK_TITLE);

        transport.respond(&url, 200, r#"{"author_name":"someone"}"#);
        assert_eq!(resolver.resolve_title(VIDEO).await, FALLBACK_TITLE);

        transport.respond(&url, 200, r#"{"title":"  "}"#);
        assert_eq!(resolver.resolve_title(VIDEO).await, FALLBACK_TITLE);
    }

    #[tokio::test]
    async fn test_title_proxy_used_after_direct_failure() {
        let transport = Arc::new(FakeTransport::new());
        let config = AppConfig {
            title_proxies: vec!["https://corsproxy.io/?".to_string()],
            ..AppConfig::default()
        };
        let oembed = TitleResolver::oembed_url(VIDEO);
        let proxied = format!("https://corsproxy.io/?{}", urlencoding::encode(&oembed));
        transport.fail(&oembed, "blocked");
        transport.respond(&proxied, 200, r#"{"title":"Via proxy"}"#);

        let resolver = TitleResolver::new(transport.clone(), &config);
        assert_eq!(resolver.resolve_title(VIDEO).await, "Via proxy");
        assert_eq!(transport.calls(), vec![oembed, proxied]);
    }
}
