//! Timeout wrapper for async operations.

use std::future::Future;
use std::time::Duration;
use strata_core::StrataError;

/// Wraps an async operation with a timeout.
///
/// Elapsing yields `StrataError::Timeout` naming the operation. Dropping the
/// inner future cancels it; work it already completed stays done.
pub async fn with_timeout<F, Fut, T>(
    duration: Duration,
    operation: &str,
    f: F,
) -> Result<T, StrataError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, StrataError>>,
{
    tokio::time::timeout(duration, f()).await.map_err(|_| {
        StrataError::Timeout(format!("{} timed out after {:?}", operation, duration))
    })?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_timeout_success() {
        let result = with_timeout(Duration::from_secs(1), "lookup", || async {
            Ok::<_, StrataError>(42)
        })
        .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let result: Result<i32, _> = with_timeout(Duration::from_secs(1), "lookup", || async {
            Err(StrataError::StoreUnavailable("refused".to_string()))
        })
        .await;
        assert!(matches!(result, Err(StrataError::StoreUnavailable(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_exceeded() {
        let result = with_timeout(Duration::from_millis(10), "redis GET", || async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<_, StrataError>(42)
        })
        .await;

        match result {
            Err(StrataError::Timeout(message)) => assert!(message.starts_with("redis GET")),
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
