//! Authenticated request execution with bounded retry.
//!
//! One logical operation (HTTP verb + path + optional body) is turned into an
//! authenticated exchange and retried on transient failure. Classification:
//!
//! - connect/timeout/DNS failures, HTTP 429 and 5xx → **transient**, retried
//!   with exponential backoff up to the policy's attempt budget, then
//!   escalated as [`Error::MaxRetriesExceeded`] wrapping the last cause;
//! - any other non-2xx → **permanent**, surfaced after one attempt;
//! - a 2xx whose body fails to decode → [`Error::MalformedResponse`],
//!   surfaced immediately (not a transient condition);
//! - cancellation during in-flight I/O or a backoff wait → [`Error::Cancelled`].
//!
//! Every operation in the crate goes through [`Transport::execute`]; nothing
//! bypasses this classification.

use std::time::Duration;

use reqwest::{Method, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{Error, Result, TransientError};

/// Bounds on the automatic retry loop.
///
/// The wait before retry `n` (counted from 1) is
/// `min(base_delay * 2^(n-1), max_delay)`. With the defaults that is 4s,
/// then 8s; a third retry would flatten at the 10s cap.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first (so 3 means 2 retries).
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_secs(4),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `attempt` (counted from 1). Pure, so the
    /// schedule is testable without a clock.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// 429 and the whole 5xx range are retryable; everything else non-2xx is not.
fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Outcome of a single exchange attempt.
enum Attempt<T> {
    Done(T),
    Transient(TransientError),
}

/// Shared authenticated channel: endpoint, bearer credential, connection
/// pool, retry policy, cancellation signal. Safe to share across
/// concurrently issued operations; holds no mutable state.
pub(crate) struct Transport {
    http: reqwest::Client,
    base: String,
    token: String,
    policy: RetryPolicy,
    cancel: CancellationToken,
}

// Manual impl so the bearer credential never lands in logs.
impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base", &self.base)
            .field("token", &"<redacted>")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Transport {
    pub(crate) fn new(
        http: reqwest::Client,
        base: impl Into<String>,
        token: impl Into<String>,
        policy: RetryPolicy,
        cancel: CancellationToken,
    ) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Transport {
            http,
            base,
            token: token.into(),
            policy,
            cancel,
        }
    }

    /// Execute one logical operation through the full retry pipeline.
    pub(crate) async fn execute<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base, path);
        let mut attempt = 0;
        let last = loop {
            attempt += 1;
            match self.attempt(&method, &url, body).await? {
                Attempt::Done(value) => return Ok(value),
                Attempt::Transient(cause) => {
                    if attempt >= self.policy.max_attempts {
                        break cause;
                    }
                    let wait = self.policy.delay_for(attempt);
                    debug!(
                        %url,
                        attempt,
                        wait_ms = wait.as_millis() as u64,
                        cause = %cause,
                        "transient failure, backing off before retry"
                    );
                    tokio::select! {
                        () = tokio::time::sleep(wait) => {}
                        () = self.cancel.cancelled() => return Err(Error::Cancelled),
                    }
                }
            }
        };
        warn!(%url, attempts = attempt, cause = %last, "retry budget exhausted");
        Err(Error::MaxRetriesExceeded {
            attempts: attempt,
            source: last,
        })
    }

    /// One authenticated exchange. Permanent failures, malformed bodies and
    /// cancellation short-circuit via `Err`; transient causes are returned
    /// for the caller's retry loop.
    async fn attempt<B, T>(&self, method: &Method, url: &str, body: Option<&B>) -> Result<Attempt<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self
            .http
            .request(method.clone(), url)
            .bearer_auth(&self.token)
            .header(header::ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let sent = tokio::select! {
            sent = request.send() => sent,
            () = self.cancel.cancelled() => return Err(Error::Cancelled),
        };
        let response = match sent {
            Ok(response) => response,
            Err(err) => return Ok(Attempt::Transient(TransientError::Transport(err))),
        };

        let status = response.status();
        let text = tokio::select! {
            text = response.text() => text,
            () = self.cancel.cancelled() => return Err(Error::Cancelled),
        };
        let text = match text {
            Ok(text) => text,
            Err(err) => return Ok(Attempt::Transient(TransientError::Transport(err))),
        };

        if status.is_success() {
            return serde_json::from_str(&text)
                .map(Attempt::Done)
                .map_err(|source| Error::MalformedResponse { source });
        }

        if is_transient_status(status) {
            Ok(Attempt::Transient(TransientError::Status {
                status: status.as_u16(),
                detail: text,
            }))
        } else {
            Err(Error::Permanent {
                status: status.as_u16(),
                detail: text,
            })
        }
    }
}
