//! Registry error taxonomy

use origin_domain::{ContentFingerprint, RecordId};
use thiserror::Error;

/// Errors that can occur during registry operations
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A record with this fingerprint is already anchored
    #[error("Fingerprint already anchored: {}", .0.short())]
    DuplicateFingerprint(ContentFingerprint),

    /// The presented parent is not a record held by this registry
    #[error("Parent record not found: {0}")]
    ParentNotFound(RecordId),

    /// Pagination parameters out of bounds or malformed
    #[error("Invalid range (start={start}, limit={limit}): {reason}")]
    InvalidRange {
        /// Requested start position
        start: i64,
        /// Requested page length
        limit: i64,
        /// What was wrong with the request
        reason: String,
    },

    /// No record for the requested key
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Database error
    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Persisted data failed validation during replay
    #[error("Corrupt journal: {0}")]
    Corrupt(String),

    /// A writer panicked while holding the registry lock
    #[error("Registry lock poisoned")]
    Poisoned,
}

impl RegistryError {
    /// True for outcomes caused by the caller's request rather than a fault
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RegistryError::DuplicateFingerprint(_)
                | RegistryError::ParentNotFound(_)
                | RegistryError::InvalidRange { .. }
                | RegistryError::NotFound(_)
        )
    }
}

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
