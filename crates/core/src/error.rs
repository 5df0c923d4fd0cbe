//! Domain error model.
//!
//! Every domain failure is raised synchronously at the point of detection and
//! carries a stable machine-readable code plus a human message. Callers map
//! the [`ErrorKind`] to their own presentation (HTTP status, exit code, ...);
//! the domain performs no local recovery or retry.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Classification of a domain failure.
///
/// Keep this focused on deterministic, business/domain failures. Transport or
/// storage faults belong to the infrastructure layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or missing required field, negative amount, non-positive quantity.
    Validation,
    /// A referenced entity does not exist.
    NotFound,
    /// Insufficient inventory, duplicate item, currency mismatch.
    Conflict,
    /// An operation was attempted from a status that forbids it.
    IllegalState,
    /// The actor lacks access to the targeted entity.
    Forbidden,
    /// An identifier failed to parse.
    InvalidId,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::IllegalState => "illegal_state",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::InvalidId => "invalid_id",
        };
        f.write_str(s)
    }
}

/// Domain-level error: kind + stable code + human message.
///
/// Codes are `&'static str` constants owned by the crate that owns the rule
/// (e.g. `orderdesk_orders::codes::ORDER_STATUS_NOT_PENDING`). The code is the
/// contract with callers; the message is free to evolve.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind}: {message} [{code}]")]
pub struct DomainError {
    kind: ErrorKind,
    code: &'static str,
    message: String,
}

impl DomainError {
    pub fn new(kind: ErrorKind, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
        }
    }

    pub fn validation(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, code, message)
    }

    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, code, message)
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, code, message)
    }

    pub fn illegal_state(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IllegalState, code, message)
    }

    pub fn forbidden(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, code, message)
    }

    pub fn invalid_id(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidId, code, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
