//! REST publisher for the ads platform and the listing feed.

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

use crate::{Error, PublishConfig, PublishTarget, Publisher, Result, TRACING_TARGET};

/// Header carrying the listing feed API key.
const API_KEY_HEADER: &str = "x-api-key";

/// [`Publisher`] backed by the targets' REST APIs.
#[derive(Debug, Clone)]
pub struct HttpPublisher {
    client: Client,
    config: PublishConfig,
}

impl HttpPublisher {
    /// Creates a publisher from `config`.
    pub fn new(config: PublishConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(Error::Client)?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, target: PublishTarget) -> String {
        match target {
            PublishTarget::AdsPlatform => {
                let base = self.config.ads_platform_url.trim_end_matches('/');
                match &self.config.ads_platform_account_id {
                    Some(account) => format!("{base}/act_{account}/campaigns"),
                    None => format!("{base}/campaigns"),
                }
            }
            PublishTarget::ListingFeed => {
                let base = self.config.listing_feed_url.trim_end_matches('/');
                format!("{base}/listings")
            }
        }
    }

    fn authorize(&self, target: PublishTarget, request: RequestBuilder) -> Result<RequestBuilder> {
        match target {
            PublishTarget::AdsPlatform => self
                .config
                .ads_platform_token
                .as_deref()
                .map(|token| request.bearer_auth(token)),
            PublishTarget::ListingFeed => self
                .config
                .listing_feed_api_key
                .as_deref()
                .map(|key| request.header(API_KEY_HEADER, key)),
        }
        .ok_or(Error::NotConfigured(target))
    }

    async fn read_response(target: PublishTarget, response: Response) -> Result<Option<String>> {
        let status = response.status();
        if !status.is_success() {
            let retry_after = parse_retry_after(response.headers());
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Rejected {
                target,
                status: status.as_u16(),
                message,
                retry_after,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse {
                target,
                message: e.to_string(),
            })?;

        Ok(external_id(&body))
    }
}

#[async_trait::async_trait]
impl Publisher for HttpPublisher {
    fn is_configured(&self, target: PublishTarget) -> bool {
        match target {
            PublishTarget::AdsPlatform => self.config.ads_platform_token.is_some(),
            PublishTarget::ListingFeed => self.config.listing_feed_api_key.is_some(),
        }
    }

    async fn publish(&self, target: PublishTarget, payload: &Value) -> Result<Option<String>> {
        let url = self.endpoint(target);
        tracing::debug!(target: TRACING_TARGET, publish_target = %target, url = %url, "sending publish request");

        let request = self.authorize(target, self.client.post(&url).json(payload))?;
        let response = request
            .send()
            .await
            .map_err(|source| Error::Connection { target, source })?;

        Self::read_response(target, response).await
    }
}

/// Reads the remote id from a response body, accepting string or numeric ids.
fn external_id(body: &Value) -> Option<String> {
    match body.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Parses a `Retry-After` header given in seconds.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;
    use serde_json::json;

    use super::*;

    fn publisher(config: PublishConfig) -> HttpPublisher {
        HttpPublisher::new(config).unwrap()
    }

    #[test]
    fn configuration_follows_credentials() {
        let publisher = publisher(PublishConfig {
            listing_feed_api_key: Some("key".into()),
            ..PublishConfig::default()
        });

        assert!(publisher.is_configured(PublishTarget::ListingFeed));
        assert!(!publisher.is_configured(PublishTarget::AdsPlatform));
    }

    #[test]
    fn endpoints_include_account() {
        let publisher = publisher(PublishConfig {
            ads_platform_url: "https://ads.test/v1/".into(),
            ads_platform_account_id: Some("42".into()),
            listing_feed_url: "https://feed.test".into(),
            ..PublishConfig::default()
        });

        assert_eq!(
            publisher.endpoint(PublishTarget::AdsPlatform),
            "https://ads.test/v1/act_42/campaigns"
        );
        assert_eq!(
            publisher.endpoint(PublishTarget::ListingFeed),
            "https://feed.test/listings"
        );
    }

    #[tokio::test]
    async fn unconfigured_publish_fails_without_sending() {
        let publisher = publisher(PublishConfig::default());
        let error = publisher
            .publish(PublishTarget::AdsPlatform, &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(error, Error::NotConfigured(PublishTarget::AdsPlatform)));
    }

    #[test]
    fn external_id_accepts_strings_and_numbers() {
        assert_eq!(external_id(&json!({"id": "abc"})).as_deref(), Some("abc"));
        assert_eq!(external_id(&json!({"id": 17})).as_deref(), Some("17"));
        assert_eq!(external_id(&json!({"ok": true})), None);
    }

    #[test]
    fn retry_after_reads_seconds() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), None);
        headers.insert(RETRY_AFTER, HeaderValue::from_static("3"));
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(3)));
    }
}
