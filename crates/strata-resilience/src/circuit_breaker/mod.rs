//! Circuit breaker implementation.

use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::time::Duration;
use strata_core::StrataError;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Circuit breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CircuitState {
    /// Circuit is closed - requests are allowed.
    Closed = 0,
    /// Circuit is open - requests are rejected.
    Open = 1,
    /// Circuit is half-open - limited requests are allowed.
    HalfOpen = 2,
}

impl From<u8> for CircuitState {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Open,
            2 => Self::HalfOpen,
            _ => Self::Closed,
        }
    }
}

/// Circuit breaker configuration.
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Number of consecutive failures before opening the circuit.
    pub failure_threshold: u64,
    /// Number of successes needed to close the circuit from half-open.
    pub success_threshold: u64,
    /// Duration to wait before transitioning from open to half-open.
    pub reset_timeout: Duration,
    /// Number of requests allowed in half-open state.
    pub half_open_requests: u64,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            success_threshold: 1,
            reset_timeout: Duration::from_secs(30),
            half_open_requests: 1,
        }
    }
}

impl CircuitBreakerConfig {
    /// Builds a configuration from a failure threshold and reset timeout.
    #[must_use]
    pub fn new(failure_threshold: u64, reset_timeout: Duration) -> Self {
        Self {
            failure_threshold: failure_threshold.max(1),
            reset_timeout,
            ..Self::default()
        }
    }
}

/// Circuit breaker guarding one downstream dependency.
///
/// Counters are atomics so `call` never holds a lock across the guarded
/// future. Time is read from `tokio::time` so paused-clock tests can drive
/// the open to half-open transition.
pub struct CircuitBreaker {
    name: String,
    state: AtomicU8,
    failure_count: AtomicU64,
    success_count: AtomicU64,
    half_open_requests: AtomicU64,
    opened_at: Mutex<Option<Instant>>,
    config: CircuitBreakerConfig,
}

impl CircuitBreaker {
    /// Creates a new circuit breaker.
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            state: AtomicU8::new(CircuitState::Closed as u8),
            failure_count: AtomicU64::new(0),
            success_count: AtomicU64::new(0),
            half_open_requests: AtomicU64::new(0),
            opened_at: Mutex::new(None),
            config,
        }
    }

    /// Creates a new circuit breaker with default configuration.
    pub fn with_defaults(name: impl Into<String>) -> Self {
        Self::new(name, CircuitBreakerConfig::default())
    }

    /// Returns the current state of the circuit breaker.
    pub fn state(&self) -> CircuitState {
        CircuitState::from(self.state.load(Ordering::SeqCst))
    }

    /// Returns the name of the circuit breaker.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Executes a function with circuit breaker protection.
    ///
    /// Dropping the returned future before it completes gives a half-open
    /// trial slot back, so a cancelled trial call never wedges the breaker.
    pub async fn call<F, Fut, T, E>(&self, f: F) -> Result<T, CircuitBreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut guard = match self.admit() {
            Admission::Rejected => return Err(CircuitBreakerError::Open(self.name.clone())),
            Admission::Allowed => TrialGuard::disarmed(self),
            Admission::Trial => TrialGuard::armed(self),
        };

        let outcome = f().await;
        guard.disarm();

        match outcome {
            Ok(result) => {
                self.record_success();
                Ok(result)
            }
            Err(e) => {
                self.record_failure();
                Err(CircuitBreakerError::Failure(e))
            }
        }
    }

    fn admit(&self) -> Admission {
        match self.state() {
            CircuitState::Closed => Admission::Allowed,
            CircuitState::Open => {
                let elapsed = self
                    .opened_at
                    .lock()
                    .map_or(true, |at| at.elapsed() >= self.config.reset_timeout);
                if !elapsed {
                    return Admission::Rejected;
                }
                let transitioned = self
                    .state
                    .compare_exchange(
                        CircuitState::Open as u8,
                        CircuitState::HalfOpen as u8,
                        Ordering::SeqCst,
                        Ordering::SeqCst,
                    )
                    .is_ok();
                if transitioned {
                    self.success_count.store(0, Ordering::SeqCst);
                    self.half_open_requests.store(1, Ordering::SeqCst);
                    debug!("Circuit breaker '{}' transitioning to half-open", self.name);
                    Admission::Trial
                } else {
                    self.admit()
                }
            }
            CircuitState::HalfOpen => {
                let limit = self.config.half_open_requests;
                let reserved = self
                    .half_open_requests
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| (n < limit).then_some(n + 1))
                    .is_ok();
                if reserved {
                    Admission::Trial
                } else {
                    Admission::Rejected
                }
            }
        }
    }

    fn release_trial(&self) {
        if self.state() == CircuitState::HalfOpen {
            let _ = self
                .half_open_requests
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
            debug!("Circuit breaker '{}' released an abandoned half-open trial", self.name);
        }
    }

    fn record_success(&self) {
        match self.state() {
            CircuitState::Closed => {
                self.failure_count.store(0, Ordering::SeqCst);
            }
            CircuitState::HalfOpen => {
                let successes = self.success_count.fetch_add(1, Ordering::SeqCst) + 1;
                if successes >= self.config.success_threshold {
                    self.state.store(CircuitState::Closed as u8, Ordering::SeqCst);
                    self.failure_count.store(0, Ordering::SeqCst);
                    debug!("Circuit breaker '{}' closed after successful recovery", self.name);
                }
            }
            CircuitState::Open => {}
        }
    }

    fn record_failure(&self) {
        match self.state() {
            CircuitState::Closed => {
                let failures = self.failure_count.fetch_add(1, Ordering::SeqCst) + 1;
                if failures >= self.config.failure_threshold {
                    self.open();
                    warn!(
                        "Circuit breaker '{}' opened after {} failures",
                        self.name, failures
                    );
                }
            }
            CircuitState::HalfOpen => {
                self.open();
                warn!(
                    "Circuit breaker '{}' reopened after failure in half-open state",
                    self.name
                );
            }
            CircuitState::Open => {
                *self.opened_at.lock() = Some(Instant::now());
            }
        }
    }

    fn open(&self) {
        *self.opened_at.lock() = Some(Instant::now());
        self.state.store(CircuitState::Open as u8, Ordering::SeqCst);
    }

    /// Manually resets the circuit breaker to closed state.
    pub fn reset(&self) {
        self.state.store(CircuitState::Closed as u8, Ordering::SeqCst);
        self.failure_count.store(0, Ordering::SeqCst);
        self.success_count.store(0, Ordering::SeqCst);
        *self.opened_at.lock() = None;
        debug!("Circuit breaker '{}' manually reset", self.name);
    }
}

impl std::fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("name", &self.name)
            .field("state", &self.state())
            .field("failures", &self.failure_count.load(Ordering::SeqCst))
            .finish()
    }
}

enum Admission {
    Rejected,
    Allowed,
    Trial,
}

/// Gives a half-open slot back unless the guarded call ran to completion.
struct TrialGuard<'a> {
    breaker: &'a CircuitBreaker,
    armed: bool,
}

impl<'a> TrialGuard<'a> {
    fn armed(breaker: &'a CircuitBreaker) -> Self {
        Self { breaker, armed: true }
    }

    fn disarmed(breaker: &'a CircuitBreaker) -> Self {
        Self { breaker, armed: false }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TrialGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.breaker.release_trial();
        }
    }
}

/// Error type for circuit breaker operations.
#[derive(Debug, Error)]
pub enum CircuitBreakerError<E> {
    /// Circuit is open, request was rejected.
    #[error("Circuit breaker '{0}' is open")]
    Open(String),
    /// The underlying operation failed.
    #[error("Operation failed: {0}")]
    Failure(E),
}

impl<E: Into<StrataError>> From<CircuitBreakerError<E>> for StrataError {
    fn from(err: CircuitBreakerError<E>) -> Self {
        match err {
            CircuitBreakerError::Open(name) => Self::CircuitBreakerOpen(name),
            CircuitBreakerError::Failure(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker(threshold: u64) -> CircuitBreaker {
        CircuitBreaker::new(
            "redis",
            CircuitBreakerConfig::new(threshold, Duration::from_secs(30)),
        )
    }

    async fn fail(cb: &CircuitBreaker) {
        let _ = cb.call(|| async { Err::<i32, &str>("error") }).await;
    }

    #[tokio::test]
    async fn test_circuit_breaker_closed() {
        let cb = CircuitBreaker::with_defaults("test");

        let result = cb.call(|| async { Ok::<i32, &str>(42) }).await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(cb.state(), CircuitState::Closed);
        assert_eq!(cb.name(), "test");
    }

    #[tokio::test]
    async fn test_circuit_breaker_opens_on_failures() {
        let cb = breaker(2);

        fail(&cb).await;
        assert_eq!(cb.state(), CircuitState::Closed);

        fail(&cb).await;
        assert_eq!(cb.state(), CircuitState::Open);

        let result = cb.call(|| async { Ok::<i32, &str>(42) }).await;
        assert!(matches!(result, Err(CircuitBreakerError::Open(_))));
    }

    #[tokio::test]
    async fn test_success_resets_consecutive_failures() {
        let cb = breaker(2);

        fail(&cb).await;
        let _ = cb.call(|| async { Ok::<i32, &str>(1) }).await;
        fail(&cb).await;
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_half_open_trial_closes_on_success() {
        let cb = breaker(1);
        fail(&cb).await;
        assert_eq!(cb.state(), CircuitState::Open);

        tokio::time::advance(Duration::from_secs(31)).await;

        let result = cb.call(|| async { Ok::<i32, &str>(7) }).await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_half_open_trial_reopens_on_failure() {
        let cb = breaker(1);
        fail(&cb).await;

        tokio::time::advance(Duration::from_secs(31)).await;
        fail(&cb).await;
        assert_eq!(cb.state(), CircuitState::Open);

        // The reopen restarts the reset timer.
        tokio::time::advance(Duration::from_secs(10)).await;
        let result = cb.call(|| async { Ok::<i32, &str>(7) }).await;
        assert!(matches!(result, Err(CircuitBreakerError::Open(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_half_open_call_frees_slot() {
        let cb = breaker(1);
        fail(&cb).await;
        tokio::time::advance(Duration::from_secs(31)).await;

        let cancelled = tokio::time::timeout(
            Duration::from_millis(10),
            cb.call(|| async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok::<i32, &str>(0)
            }),
        )
        .await;
        assert!(cancelled.is_err());
        assert_eq!(cb.state(), CircuitState::HalfOpen);

        let result = cb.call(|| async { Ok::<i32, &str>(7) }).await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_half_open_rejects_second_concurrent_call() {
        let cb = breaker(1);
        fail(&cb).await;
        tokio::time::advance(Duration::from_secs(31)).await;

        let (gate_tx, gate_rx) = tokio::sync::oneshot::channel::<()>();
        let trial = cb.call(|| async move {
            let _ = gate_rx.await;
            Ok::<i32, &str>(1)
        });
        tokio::pin!(trial);
        assert!(poll_once(trial.as_mut()).await.is_none());

        let second = cb.call(|| async { Ok::<i32, &str>(2) }).await;
        assert!(matches!(second, Err(CircuitBreakerError::Open(_))));

        let _ = gate_tx.send(());
        assert_eq!(trial.await.unwrap(), 1);
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    async fn poll_once<F: Future + Unpin>(fut: F) -> Option<F::Output> {
        tokio::time::timeout(Duration::ZERO, fut).await.ok()
    }

    #[tokio::test]
    async fn test_reset_closes_circuit() {
        let cb = breaker(1);
        fail(&cb).await;
        cb.reset();
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_error_conversion() {
        let open: StrataError = CircuitBreakerError::<StrataError>::Open("redis".into()).into();
        assert!(matches!(open, StrataError::CircuitBreakerOpen(ref name) if name == "redis"));

        let inner: StrataError =
            CircuitBreakerError::Failure(StrataError::Timeout("GET".into())).into();
        assert!(matches!(inner, StrataError::Timeout(_)));
    }

    #[test]
    fn test_circuit_state_from_u8() {
        assert_eq!(CircuitState::from(0), CircuitState::Closed);
        assert_eq!(CircuitState::from(1), CircuitState::Open);
        assert_eq!(CircuitState::from(2), CircuitState::HalfOpen);
        assert_eq!(CircuitState::from(255), CircuitState::Closed);
    }

    #[test]
    fn test_config_threshold_floor() {
        let config = CircuitBreakerConfig::new(0, Duration::from_secs(1));
        assert_eq!(config.failure_threshold, 1);
    }
}
