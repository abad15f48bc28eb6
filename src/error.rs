//! Failure taxonomy for the InverseML client.
//!
//! Every fallible operation in this crate returns [`Error`]. The variants are
//! deliberately coarse so callers can pattern-match recovery logic:
//!
//! - [`Error::InvalidArgument`] — caller data failed a local invariant; fix
//!   the input and call again. Nothing was sent over the wire.
//! - [`Error::Permanent`] — the service rejected the request (4xx other than
//!   429). Retrying the identical request will not help.
//! - [`Error::MaxRetriesExceeded`] — transient failures (connect errors,
//!   timeouts, 429, 5xx) outlasted the retry budget; the last observed cause
//!   is attached as the error source, so the root cause is never lost.
//! - [`Error::MalformedResponse`] — the exchange succeeded but the body did
//!   not decode into the expected entity. Never retried.
//! - [`Error::Cancelled`] — the caller's cancellation token fired during
//!   in-flight I/O or a backoff wait. Not a failure to log or alert on.
//!
//! Transient failures are an internal classification of the transport
//! pipeline; they only become caller-visible wrapped inside
//! [`Error::MaxRetriesExceeded`].

use miette::Diagnostic;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error type accepted from caller-supplied evaluators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A failure the transport pipeline considers retryable.
///
/// Surfaces to callers only as the source of [`Error::MaxRetriesExceeded`],
/// carrying the last cause observed before the retry budget ran out.
#[derive(Debug, Error)]
pub enum TransientError {
    /// Connection-level failure: refused, timed out, DNS, TLS.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered 429 or a 5xx status.
    #[error("service returned status {status}: {detail}")]
    Status { status: u16, detail: String },
}

impl TransientError {
    /// HTTP status carried by this failure, if it got as far as a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransientError::Transport(err) => err.status().map(|s| s.as_u16()),
            TransientError::Status { status, .. } => Some(*status),
        }
    }
}

/// Unified error type for all client operations.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// Caller-supplied data failed a local invariant before any I/O.
    #[error("invalid argument `{param}`: {reason}")]
    #[diagnostic(
        code(inverseml::invalid_argument),
        help("Fix the named parameter and retry; nothing was sent to the service.")
    )]
    InvalidArgument { param: &'static str, reason: String },

    /// The operation is not valid in the client's or workflow's current state.
    #[error("invalid state: {0}")]
    #[diagnostic(code(inverseml::invalid_state))]
    InvalidState(String),

    /// The client could not be configured as requested.
    #[error("configuration error: {0}")]
    #[diagnostic(code(inverseml::configuration))]
    Configuration(String),

    /// Non-retryable rejection from the service (4xx other than 429).
    #[error("request rejected with status {status}: {detail}")]
    #[diagnostic(code(inverseml::permanent))]
    Permanent { status: u16, detail: String },

    /// Transient failures outlasted the retry budget.
    #[error("gave up after {attempts} attempts")]
    #[diagnostic(
        code(inverseml::max_retries),
        help("The service was unreachable or overloaded; inspect the source for the last failure.")
    )]
    MaxRetriesExceeded {
        attempts: u32,
        #[source]
        source: TransientError,
    },

    /// A 2xx response whose body did not decode into the expected entity.
    #[error("malformed response body")]
    #[diagnostic(code(inverseml::malformed_response))]
    MalformedResponse {
        #[source]
        source: serde_json::Error,
    },

    /// The caller's cancellation token fired during I/O or a backoff wait.
    #[error("operation cancelled")]
    #[diagnostic(code(inverseml::cancelled))]
    Cancelled,

    /// A caller-supplied evaluator failed during a workflow run.
    #[error("evaluator failed")]
    #[diagnostic(code(inverseml::evaluation))]
    Evaluation {
        #[source]
        source: BoxError,
    },
}

impl Error {
    /// Shorthand used by the validation layer.
    pub(crate) fn invalid_argument(param: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            param,
            reason: reason.into(),
        }
    }
}
