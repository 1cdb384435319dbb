//! # Framework Errors
//!
//! Errors raised at the remote collection boundary and surfaced by the
//! [`ResourceStore`](crate::ResourceStore). Keeping them in one place means every
//! store reports failures with the same taxonomy.

/// Errors returned by a [`RemoteCollection`](crate::RemoteCollection).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemoteError {
    #[error("Collection service closed")]
    ServiceClosed,
    #[error("Collection service dropped response channel")]
    ServiceDropped,
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Rejected(String),
}

/// Errors returned by [`ResourceStore`](crate::ResourceStore) operations.
///
/// A store only fails when the remote call fails, so the remote error is
/// carried through with its message untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl StoreError {
    /// The underlying remote error.
    pub fn remote(&self) -> &RemoteError {
        match self {
            StoreError::Remote(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_keeps_remote_message() {
        let err = StoreError::from(RemoteError::Rejected("duplicate key value".into()));
        assert_eq!(err.to_string(), "duplicate key value");
        assert_eq!(
            err.remote(),
            &RemoteError::Rejected("duplicate key value".into())
        );
    }
}
