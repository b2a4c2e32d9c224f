//! Trait definitions for external interactions
//!
//! These traits define the boundary between the registry and its durability
//! backend. Implementations live in other crates.

use crate::ProvenanceRecord;

/// Append-only durable log of provenance records
///
/// Implemented by the infrastructure layer (origin-store). The registry
/// appends each record before it becomes visible and replays the journal on
/// startup to rebuild its indexes.
pub trait AnchorJournal {
    /// Error type for journal operations
    type Error;

    /// Durably append one record
    ///
    /// Must fail without writing anything if the fingerprint or record id is
    /// already present.
    fn append(&mut self, record: &ProvenanceRecord) -> Result<(), Self::Error>;

    /// Read every record back, in the order they were appended
    fn replay(&self) -> Result<Vec<ProvenanceRecord>, Self::Error>;
}
