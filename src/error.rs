//! Error classification for backend calls.
//!
//! Every failure surfaced by this crate is an [`ApiError`]: a closed-set
//! [`ErrorKind`], a fixed display-safe message, and optional context
//! (HTTP status, server-provided detail, underlying cause). Whether an
//! error is retryable is a pure function of its kind; it is derived,
//! never stored, so the two can never disagree.
//!
//! Classification rules:
//! - no response reached us: connection failure => `Network`, local
//!   deadline => `Timeout`
//! - 401 => `Authentication`, 403 => `Authorization`, 404 => `NotFound`,
//!   422 => `Validation`, 429 => `RateLimit`, other 4xx => `Client`
//! - any 5xx => `Server`
//! - anything else => `Unknown`

use std::fmt;
use std::time::SystemTime;

/// Closed taxonomy of API failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No response reached us (connection failure).
    Network,
    /// Local deadline exceeded before a response arrived.
    Timeout,
    /// Remote returned 5xx.
    Server,
    /// Remote returned 429.
    RateLimit,
    /// Remote returned 401.
    Authentication,
    /// Remote returned 403.
    Authorization,
    /// Remote returned 422.
    Validation,
    /// Remote returned 404.
    NotFound,
    /// Remote returned another 4xx.
    Client,
    /// Unclassified condition.
    Unknown,
}

impl ErrorKind {
    /// Every kind, for exhaustive table checks.
    pub const ALL: [ErrorKind; 10] = [
        ErrorKind::Network,
        ErrorKind::Timeout,
        ErrorKind::Server,
        ErrorKind::RateLimit,
        ErrorKind::Authentication,
        ErrorKind::Authorization,
        ErrorKind::Validation,
        ErrorKind::NotFound,
        ErrorKind::Client,
        ErrorKind::Unknown,
    ];

    /// Whether a failure of this kind is worth retrying.
    pub fn retryable(self) -> bool {
        matches!(
            self,
            ErrorKind::Network | ErrorKind::Timeout | ErrorKind::Server | ErrorKind::RateLimit
        )
    }

    /// Classify an HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorKind::Authentication,
            403 => ErrorKind::Authorization,
            404 => ErrorKind::NotFound,
            422 => ErrorKind::Validation,
            429 => ErrorKind::RateLimit,
            400..=499 => ErrorKind::Client,
            500..=599 => ErrorKind::Server,
            _ => ErrorKind::Unknown,
        }
    }

    /// Fixed message for this kind, safe to display directly.
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::Network => {
                "Network connection failed. Please check your internet connection and try again."
            }
            ErrorKind::Timeout => "Request timed out. Please try again.",
            ErrorKind::Server => "Server error occurred. Please try again later.",
            ErrorKind::RateLimit => "Too many requests. Please wait a moment and try again.",
            ErrorKind::Authentication => "Authentication failed. Please log in again.",
            ErrorKind::Authorization => "You do not have permission to perform this action.",
            ErrorKind::Validation => "Please check your input and try again.",
            ErrorKind::NotFound => "The requested resource was not found.",
            ErrorKind::Client => "Invalid request. Please check your input and try again.",
            ErrorKind::Unknown => "An unexpected error occurred. Please try again.",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Network => "network",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Server => "server",
            ErrorKind::RateLimit => "rate-limit",
            ErrorKind::Authentication => "authentication",
            ErrorKind::Authorization => "authorization",
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Client => "client",
            ErrorKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Normalized API failure.
///
/// Callers never see a raw transport error; the client classifies every
/// failure into one of these before surfacing it.
#[derive(Debug)]
pub struct ApiError {
    kind: ErrorKind,
    status: Option<u16>,
    detail: Option<String>,
    timestamp: SystemTime,
    source: Option<Cause>,
}

impl ApiError {
    /// Construct an error of the given kind with no further context.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, status: None, detail: None, timestamp: SystemTime::now(), source: None }
    }

    /// Connection-level failure (no response reached us).
    pub fn network(source: impl Into<Cause>) -> Self {
        Self::new(ErrorKind::Network).with_source(source)
    }

    /// Local deadline exceeded before a response arrived.
    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout)
    }

    /// Classify a non-success HTTP status, keeping any server-provided
    /// detail message.
    pub fn from_status(status: u16, detail: Option<String>) -> Self {
        Self { status: Some(status), detail, ..Self::new(ErrorKind::from_status(status)) }
    }

    /// Attach a server-provided detail message.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attach the underlying cause.
    pub fn with_source(mut self, source: impl Into<Cause>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The classified kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Whether the failure is worth retrying. Derived from the kind.
    pub fn retryable(&self) -> bool {
        self.kind.retryable()
    }

    /// Fixed message for this error's kind, safe to display directly.
    pub fn message(&self) -> &'static str {
        self.kind.user_message()
    }

    /// Server-provided detail, when the response body carried one.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// HTTP status, when a response was received.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// When the failure was classified.
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    /// Check if this error is a local timeout.
    pub fn is_timeout(&self) -> bool {
        self.kind == ErrorKind::Timeout
    }

    /// Check if this error means the session credential was rejected.
    pub fn is_authentication(&self) -> bool {
        self.kind == ErrorKind::Authentication
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.user_message())?;
        if let Some(status) = self.status {
            write!(f, " (HTTP {})", status)?;
        }
        if let Some(detail) = &self.detail {
            write!(f, ": {}", detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn retryable_set_is_exact_over_all_kinds() {
        for kind in ErrorKind::ALL {
            let expected = matches!(
                kind,
                ErrorKind::Network | ErrorKind::Timeout | ErrorKind::Server | ErrorKind::RateLimit
            );
            assert_eq!(kind.retryable(), expected, "kind {} retryable mismatch", kind);
        }
    }

    #[test]
    fn status_classification_table() {
        assert_eq!(ErrorKind::from_status(401), ErrorKind::Authentication);
        assert_eq!(ErrorKind::from_status(403), ErrorKind::Authorization);
        assert_eq!(ErrorKind::from_status(404), ErrorKind::NotFound);
        assert_eq!(ErrorKind::from_status(422), ErrorKind::Validation);
        assert_eq!(ErrorKind::from_status(429), ErrorKind::RateLimit);
        assert_eq!(ErrorKind::from_status(400), ErrorKind::Client);
        assert_eq!(ErrorKind::from_status(418), ErrorKind::Client);
        assert_eq!(ErrorKind::from_status(500), ErrorKind::Server);
        assert_eq!(ErrorKind::from_status(503), ErrorKind::Server);
        assert_eq!(ErrorKind::from_status(302), ErrorKind::Unknown);
    }

    #[test]
    fn every_kind_has_a_nonempty_message() {
        for kind in ErrorKind::ALL {
            assert!(!kind.user_message().is_empty());
        }
    }

    #[test]
    fn display_includes_status_and_detail() {
        let err = ApiError::from_status(422, Some("price must be positive".to_string()));
        let msg = format!("{}", err);
        assert!(msg.contains("HTTP 422"));
        assert!(msg.contains("price must be positive"));
        assert!(msg.starts_with(ErrorKind::Validation.user_message()));
    }

    #[test]
    fn network_error_keeps_source() {
        let io_err = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        let err = ApiError::network(io_err);
        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(err.retryable());
        assert_eq!(err.source().unwrap().to_string(), "refused");
    }

    #[test]
    fn retryable_matches_kind_on_constructed_errors() {
        assert!(ApiError::timeout().retryable());
        assert!(ApiError::from_status(500, None).retryable());
        assert!(ApiError::from_status(429, None).retryable());
        assert!(!ApiError::from_status(401, None).retryable());
        assert!(!ApiError::from_status(404, None).retryable());
    }

    #[test]
    fn timestamp_is_set_at_construction() {
        let before = SystemTime::now();
        let err = ApiError::timeout();
        assert!(err.timestamp() >= before);
    }
}
