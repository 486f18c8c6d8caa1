//! Optional retry of failed completion calls

use std::time::Duration;

use orderbot_types::Turn;

use crate::client::{Completion, CompletionClient};
use crate::error::Result;

/// How failed calls are repeated.
///
/// The default performs a single attempt. Only errors for which
/// [`CompletionError::is_retryable`](crate::CompletionError::is_retryable)
/// holds are repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Delay before retry number `attempt` (0-based), honouring `Retry-After`.
    pub fn delay_for(&self, attempt: u32, retry_after: Option<u64>) -> Duration {
        match retry_after {
            Some(secs) => Duration::from_secs(secs),
            None => self.base_delay.saturating_mul(2u32.saturating_pow(attempt)),
        }
    }
}

/// Call the client, repeating retryable failures according to `policy`.
pub async fn complete_with_retry(
    client: &dyn CompletionClient,
    turns: &[Turn],
    policy: &RetryPolicy,
) -> Result<Completion> {
    let mut attempt = 0;
    loop {
        match client.complete(turns).await {
            Ok(completion) => return Ok(completion),
            Err(err) if err.is_retryable() && attempt < policy.max_retries => {
                let delay = policy.delay_for(attempt, err.retry_after());
                log::warn!(
                    "Completion attempt {} failed ({}): {}; retrying in {:?}",
                    attempt + 1,
                    err.kind(),
                    err,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompletionError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays scripted results in order
    struct ScriptedClient {
        results: Mutex<Vec<Result<Completion>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedClient {
        fn new(mut results: Vec<Result<Completion>>) -> Self {
            results.reverse();
            Self {
                results: Mutex::new(results),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(&self, _turns: &[Turn]) -> Result<Completion> {
            *self.calls.lock().unwrap() += 1;
            self.results
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(CompletionError::Unknown("script exhausted".into())))
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    fn fast(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(max_retries).with_base_delay(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_default_policy_makes_single_attempt() {
        let client = ScriptedClient::new(vec![
            Err(CompletionError::Network("reset".into())),
            Ok(Completion::new("late")),
        ]);

        let result = complete_with_retry(&client, &[], &RetryPolicy::default()).await;

        assert_eq!(result, Err(CompletionError::Network("reset".into())));
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_network_error_is_retried() {
        let client = ScriptedClient::new(vec![
            Err(CompletionError::Network("reset".into())),
            Ok(Completion::new("ok")),
        ]);

        let result = complete_with_retry(&client, &[], &fast(2)).await;

        assert_eq!(result, Ok(Completion::new("ok")));
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn test_auth_error_is_not_retried() {
        let client = ScriptedClient::new(vec![
            Err(CompletionError::Auth("bad key".into())),
            Ok(Completion::new("never")),
        ]);

        let result = complete_with_retry(&client, &[], &fast(3)).await;

        assert!(matches!(result, Err(CompletionError::Auth(_))));
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let client = ScriptedClient::new(vec![
            Err(CompletionError::Network("1".into())),
            Err(CompletionError::Network("2".into())),
            Err(CompletionError::Network("3".into())),
        ]);

        let result = complete_with_retry(&client, &[], &fast(2)).await;

        assert_eq!(result, Err(CompletionError::Network("3".into())));
        assert_eq!(client.calls(), 3);
    }

    #[test]
    fn test_delay_doubles_and_respects_retry_after() {
        let policy = RetryPolicy::new(3).with_base_delay(Duration::from_millis(100));
        assert_eq!(policy.delay_for(0, None), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2, None), Duration::from_millis(400));
        assert_eq!(policy.delay_for(2, Some(7)), Duration::from_secs(7));
    }
}
