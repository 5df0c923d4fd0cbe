//! Use-case error model.

use orderdesk_core::DomainError;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of a use-case operation.
///
/// Domain-rule violations pass through unmodified, keeping their stable code
/// and kind. Failures of the report/storage/queue ports are transport errors,
/// never domain errors.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("transport: {0}")]
    Transport(#[source] anyhow::Error),
}

impl ServiceError {
    /// The domain error, if this is one.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            ServiceError::Domain(err) => Some(err),
            ServiceError::Transport(_) => None,
        }
    }
}
