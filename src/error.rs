//! Error types for the service layer.

use derive_more::{Display, Error};
use tracing::instrument;

/// Category of a service failure.
///
/// The display text of each kind is the human-readable message shown to
/// the user at the boundary that issued the failing operation.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ServiceErrorKind {
    /// Missing or rejected credential.
    #[display("{_0}")]
    Unauthenticated(String),
    /// Malformed request or record.
    #[display("{_0}")]
    Validation(String),
    /// Transport failure or non-success HTTP status.
    #[display("{_0}")]
    NetworkFailure(String),
    /// The store or scoring service failed.
    #[display("{_0}")]
    ExternalService(String),
}

/// Service error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("{} at {}:{}", kind, file, line)]
pub struct ServiceError {
    /// What went wrong.
    pub kind: ServiceErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ServiceError {
    /// Creates a new error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: ServiceErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Missing or rejected credential.
    #[track_caller]
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Unauthenticated(message.into()))
    }

    /// Malformed request or record.
    #[track_caller]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Validation(message.into()))
    }

    /// Transport failure or non-success status.
    #[track_caller]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::NetworkFailure(message.into()))
    }

    /// Failure reported by an external service.
    #[track_caller]
    pub fn external(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::ExternalService(message.into()))
    }

    /// The message to show the user, without location details.
    pub fn user_message(&self) -> String {
        self.kind.to_string()
    }
}

impl From<reqwest::Error> for ServiceError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::network(format!("HTTP request failed: {}", err))
    }
}
