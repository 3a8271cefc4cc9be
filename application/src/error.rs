//! Errors returned by the use cases

use crate::ports::chamber_store::StoreError;
use chamber_domain::{DomainError, ErrorKind};
use thiserror::Error;

/// Errors that can occur while driving the chamber
#[derive(Error, Debug)]
pub enum ChamberError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Storage failure: {0}")]
    Storage(String),
}

impl ChamberError {
    /// Taxonomy category; `None` for storage failures
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ChamberError::Domain(e) => Some(e.kind()),
            ChamberError::Storage(_) => None,
        }
    }

    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            ChamberError::Domain(e) => Some(e),
            ChamberError::Storage(_) => None,
        }
    }
}

impl From<StoreError> for ChamberError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Rejected(e) => ChamberError::Domain(e),
            StoreError::Backend(msg) => ChamberError::Storage(msg),
        }
    }
}
