//! Retry-wrapped order submission.
//!
//! Every call that places or closes something on a venue goes through
//! [`submit_with_retry`], which classifies each attempt:
//!
//! | outcome                         | action                                  |
//! |---------------------------------|-----------------------------------------|
//! | transport error, transient      | back off and resend                     |
//! | transport error, permanent      | return `Err` immediately                |
//! | venue ack, accepted             | return [`Submission::Accepted`]         |
//! | venue ack, rejected             | return [`Submission::Rejected`], no retry |
//! | venue ack, busy / requote       | back off and resend; on the last attempt, `Rejected` |
//!
//! When every attempt failed to send, the result is
//! [`HttpError::MaxRetriesExceeded`].

use crate::error::{GatewayError, HttpError};
use crate::http::RetryConfig;
use std::future::Future;

// ─── Classification ──────────────────────────────────────────────────────────

/// The venue's verdict on a request it received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Accepted,
    Rejected { code: String, message: String },
    /// Received but not processed; resending may succeed.
    Transient { code: String, message: String },
}

/// Implemented by every venue acknowledgement that can come back from a submission.
pub trait Classify {
    fn disposition(&self) -> Disposition;
}

// ─── Submission ──────────────────────────────────────────────────────────────

/// Final outcome of a submission the venue actually answered.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<T> {
    Accepted(T),
    Rejected { ack: T, code: String, message: String },
}

impl<T> Submission<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Submission::Accepted(_))
    }

    pub fn ack(&self) -> &T {
        match self {
            Submission::Accepted(ack) | Submission::Rejected { ack, .. } => ack,
        }
    }

    pub fn into_ack(self) -> T {
        match self {
            Submission::Accepted(ack) | Submission::Rejected { ack, .. } => ack,
        }
    }

    /// `Ok(ack)` when accepted, otherwise a [`GatewayError::Venue`] carrying
    /// the venue's own message.
    pub fn into_result(self) -> Result<T, GatewayError> {
        match self {
            Submission::Accepted(ack) => Ok(ack),
            Submission::Rejected { code, message, .. } => Err(GatewayError::venue(code, message)),
        }
    }
}

/// Classify a single answer without retrying (cancels, amendments).
pub fn settle<T: Classify>(ack: T) -> Submission<T> {
    match ack.disposition() {
        Disposition::Accepted => Submission::Accepted(ack),
        Disposition::Rejected { code, message } | Disposition::Transient { code, message } => {
            Submission::Rejected { ack, code, message }
        }
    }
}

// ─── Retry loop ──────────────────────────────────────────────────────────────

/// Run `op` until the venue gives a definite answer or `config` runs out.
pub async fn submit_with_retry<T, F, Fut>(
    config: &RetryConfig,
    label: &str,
    mut op: F,
) -> Result<Submission<T>, GatewayError>
where
    T: Classify,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GatewayError>>,
{
    let attempts = config.attempts();
    let mut last_error: Option<String> = None;

    for attempt in 0..attempts {
        let final_attempt = attempt + 1 == attempts;

        match op().await {
            Ok(ack) => match ack.disposition() {
                Disposition::Accepted => {
                    tracing::info!(label, attempt = attempt + 1, "Submission accepted");
                    return Ok(Submission::Accepted(ack));
                }
                Disposition::Rejected { code, message } => {
                    tracing::warn!(label, %code, %message, "Submission rejected by venue");
                    return Ok(Submission::Rejected { ack, code, message });
                }
                Disposition::Transient { code, message } => {
                    if final_attempt {
                        tracing::warn!(
                            label,
                            %code,
                            %message,
                            attempts,
                            "Venue still busy, giving up"
                        );
                        return Ok(Submission::Rejected { ack, code, message });
                    }
                    last_error = Some(format!("{code}: {message}"));
                }
            },
            Err(e) if e.is_transient() => {
                last_error = Some(e.to_string());
                if final_attempt {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!(label, error = %e, "Submission failed to send");
                return Err(e);
            }
        }

        let delay = config.delay_for_attempt(attempt);
        tracing::debug!(
            label,
            attempt = attempt + 1,
            max = attempts,
            delay_ms = delay.as_millis() as u64,
            "Retrying submission"
        );
        futures_timer::Delay::new(delay).await;
    }

    Err(HttpError::MaxRetriesExceeded {
        attempts,
        last_error: last_error.unwrap_or_else(|| "unknown".to_string()),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    #[derive(Debug, Clone, PartialEq)]
    struct Ack(&'static str);

    impl Classify for Ack {
        fn disposition(&self) -> Disposition {
            match self.0 {
                "0" => Disposition::Accepted,
                "busy" => Disposition::Transient {
                    code: "50013".into(),
                    message: "Systems are busy".into(),
                },
                code => Disposition::Rejected {
                    code: code.into(),
                    message: format!("rejected {code}"),
                },
            }
        }
    }

    fn fast(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            backoff_factor: 2.0,
            jitter: false,
            retryable_statuses: vec![],
        }
    }

    fn scripted(
        script: Vec<Result<Ack, GatewayError>>,
    ) -> (Mutex<VecDeque<Result<Ack, GatewayError>>>, AtomicU32) {
        (Mutex::new(script.into()), AtomicU32::new(0))
    }

    fn busy_http() -> GatewayError {
        HttpError::ServerError {
            status: 503,
            body: "unavailable".into(),
        }
        .into()
    }

    #[test]
    fn test_settle_never_retries() {
        assert!(settle(Ack("0")).is_accepted());
        assert!(!settle(Ack("busy")).is_accepted());
        assert_eq!(settle(Ack("51400")).ack(), &Ack("51400"));
    }

    #[tokio::test]
    async fn test_accepted_first_try() {
        let (script, calls) = scripted(vec![Ok(Ack("0"))]);
        let out = submit_with_retry(&fast(2), "t", || {
            calls.fetch_add(1, Ordering::SeqCst);
            let next = script.lock().unwrap().pop_front().unwrap();
            async move { next }
        })
        .await
        .unwrap();
        assert_eq!(out, Submission::Accepted(Ack("0")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rejection_is_not_retried() {
        let (script, calls) = scripted(vec![Ok(Ack("51008")), Ok(Ack("0"))]);
        let out = submit_with_retry(&fast(2), "t", || {
            calls.fetch_add(1, Ordering::SeqCst);
            let next = script.lock().unwrap().pop_front().unwrap();
            async move { next }
        })
        .await
        .unwrap();
        match out {
            Submission::Rejected { code, message, .. } => {
                assert_eq!(code, "51008");
                assert_eq!(message, "rejected 51008");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_send_failure_then_success() {
        let (script, calls) = scripted(vec![Err(busy_http()), Err(busy_http()), Ok(Ack("0"))]);
        let out = submit_with_retry(&fast(2), "t", || {
            calls.fetch_add(1, Ordering::SeqCst);
            let next = script.lock().unwrap().pop_front().unwrap();
            async move { next }
        })
        .await
        .unwrap();
        assert!(out.is_accepted());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausted_send_failures() {
        let calls = AtomicU32::new(0);
        let err = submit_with_retry(&fast(2), "t", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<Ack, _>(busy_http()) }
        })
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Http(HttpError::MaxRetriesExceeded { attempts: 3, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_send_failure_returns_immediately() {
        let calls = AtomicU32::new(0);
        let err = submit_with_retry(&fast(2), "t", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<Ack, _>(GatewayError::Validation("bad".into())) }
        })
        .await
        .unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_busy_venue_degrades_to_rejection() {
        let calls = AtomicU32::new(0);
        let out = submit_with_retry(&fast(2), "t", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(Ack("busy")) }
        })
        .await
        .unwrap();
        assert!(!out.is_accepted());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(out.into_result(), Err(GatewayError::Venue { .. })));
    }

    #[tokio::test]
    async fn test_backoff_waits_between_attempts() {
        let config = RetryConfig {
            max_retries: 2,
            initial_delay: Duration::from_millis(20),
            max_delay: Duration::from_millis(100),
            backoff_factor: 2.0,
            jitter: false,
            retryable_statuses: vec![],
        };
        let started = Instant::now();
        let _ = submit_with_retry(&config, "t", || async { Err::<Ack, _>(busy_http()) }).await;
        // 20ms + 40ms between the three attempts, none after the last.
        assert!(started.elapsed() >= Duration::from_millis(60));
    }
}
