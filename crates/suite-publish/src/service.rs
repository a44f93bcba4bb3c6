//! Publisher abstraction and the retrying publish service.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use suite_core::RetryPolicy;

use crate::{Error, PublishOutcome, PublishTarget, Result, TRACING_TARGET};

/// Transport to third-party publish targets.
#[async_trait::async_trait]
pub trait Publisher: Send + Sync + 'static {
    /// Returns true if credentials for `target` are present.
    fn is_configured(&self, target: PublishTarget) -> bool;

    /// Sends `payload` to `target`, returning the remote id if one is given.
    async fn publish(&self, target: PublishTarget, payload: &Value) -> Result<Option<String>>;
}

/// Publishes with retry and reports a [`PublishOutcome`] instead of failing.
#[derive(Clone)]
pub struct PublishService {
    publisher: Arc<dyn Publisher>,
    retry: RetryPolicy,
}

impl PublishService {
    /// Creates a service over `publisher`.
    pub fn new(publisher: impl Publisher, retry: RetryPolicy) -> Self {
        Self {
            publisher: Arc::new(publisher),
            retry,
        }
    }

    /// Returns true if credentials for `target` are present.
    pub fn is_configured(&self, target: PublishTarget) -> bool {
        self.publisher.is_configured(target)
    }

    /// Fails with [`Error::NotConfigured`] when `target` has no credentials.
    pub fn require(&self, target: PublishTarget) -> Result<()> {
        if self.is_configured(target) {
            Ok(())
        } else {
            Err(Error::NotConfigured(target))
        }
    }

    /// Publishes `payload`, retrying transient failures.
    ///
    /// Unconfigured targets yield `skipped`; exhausted or permanent failures
    /// yield `failed`. This never returns an error.
    pub async fn publish(&self, target: PublishTarget, payload: &Value) -> PublishOutcome {
        if !self.is_configured(target) {
            tracing::info!(
                target: TRACING_TARGET,
                publish_target = %target,
                "publish skipped, target not configured"
            );
            return PublishOutcome::skipped(target, format!("{target} is not configured"));
        }

        let result = self
            .retry
            .run(target.as_ref(), || self.publisher.publish(target, payload))
            .await;

        match result {
            Ok(external_id) => {
                tracing::info!(
                    target: TRACING_TARGET,
                    publish_target = %target,
                    external_id = ?external_id,
                    "content published"
                );
                PublishOutcome::published(target, external_id)
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    publish_target = %target,
                    error = %error,
                    "publish failed"
                );
                PublishOutcome::failed(target, error.to_string())
            }
        }
    }
}

impl fmt::Debug for PublishService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishService")
            .field("ads_platform", &self.is_configured(PublishTarget::AdsPlatform))
            .field("listing_feed", &self.is_configured(PublishTarget::ListingFeed))
            .field("retry", &self.retry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::PublishStatus;

    struct FlakyPublisher {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait::async_trait]
    impl Publisher for FlakyPublisher {
        fn is_configured(&self, target: PublishTarget) -> bool {
            target == PublishTarget::AdsPlatform
        }

        async fn publish(&self, target: PublishTarget, _: &Value) -> Result<Option<String>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(Error::Rejected {
                    target,
                    status: 503,
                    message: "unavailable".into(),
                    retry_after: None,
                });
            }
            Ok(Some(format!("ext-{call}")))
        }
    }

    fn service(failures: u32) -> PublishService {
        let publisher = FlakyPublisher {
            failures,
            calls: AtomicU32::new(0),
        };
        PublishService::new(publisher, RetryPolicy::new(2, Duration::from_millis(10)))
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_retried() {
        let outcome = service(2)
            .publish(PublishTarget::AdsPlatform, &json!({}))
            .await;
        assert_eq!(outcome.status, PublishStatus::Published);
        assert_eq!(outcome.external_id.as_deref(), Some("ext-2"));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_report_failure() {
        let outcome = service(5)
            .publish(PublishTarget::AdsPlatform, &json!({}))
            .await;
        assert_eq!(outcome.status, PublishStatus::Failed);
        assert!(outcome.error.unwrap().contains("503"));
    }

    #[tokio::test]
    async fn unconfigured_target_is_skipped() {
        let service = service(0);
        let outcome = service
            .publish(PublishTarget::ListingFeed, &json!({}))
            .await;
        assert_eq!(outcome.status, PublishStatus::Skipped);
        assert!(service.require(PublishTarget::ListingFeed).is_err());
        assert!(service.require(PublishTarget::AdsPlatform).is_ok());
    }
}
