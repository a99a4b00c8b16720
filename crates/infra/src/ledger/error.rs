use thiserror::Error;

use conrod_core::DomainError;
use conrod_production::{ComponentRole, Shortfall};

use crate::store::StoreError;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Every way a ledger operation can fail.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Request rejected before any mutation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The named entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// No stock row matches a required component.
    #[error("no {role} product matches '{name}'")]
    ComponentUnavailable { role: ComponentRole, name: String },

    /// A component matched but holds too little stock.
    #[error("insufficient {role} stock for '{name}': {available} available, {requested} requested")]
    InsufficientStock {
        role: ComponentRole,
        name: String,
        available: i64,
        requested: i64,
    },

    /// The candidate serial is already taken. Retry the whole allocation.
    #[error("Serial number {0} already exists")]
    SerialCollision(u32),

    /// A step after the first mutation failed. Earlier steps stay committed;
    /// callers must re-fetch to learn the true state.
    #[error("{step} failed after earlier steps were committed: {source}")]
    Incomplete {
        step: &'static str,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::SerialCollision(_))
    }

    pub(crate) fn incomplete(step: &'static str, source: StoreError) -> Self {
        tracing::error!(step, error = %source, "operation left partially applied");
        LedgerError::Incomplete { step, source }
    }
}

impl From<DomainError> for LedgerError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => LedgerError::Validation(msg),
        }
    }
}

impl From<Shortfall> for LedgerError {
    fn from(value: Shortfall) -> Self {
        match value {
            Shortfall::Unavailable { role, name } => LedgerError::ComponentUnavailable { role, name },
            Shortfall::Insufficient {
                role,
                name,
                available,
                requested,
            } => LedgerError::InsufficientStock {
                role,
                name,
                available,
                requested,
            },
        }
    }
}
