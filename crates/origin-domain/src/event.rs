//! Insertion notifications for external indexers

use crate::{ContentFingerprint, CreatorId, ProvenanceRecord, RecordId};

/// Emitted exactly once for every record the registry stores
///
/// Indexers build search and lineage views from this stream instead of
/// re-reading the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorEvent {
    /// Identifier of the new record
    pub record_id: RecordId,
    /// Fingerprint that was anchored
    pub fingerprint: ContentFingerprint,
    /// Opaque storage pointer
    pub storage_locator: String,
    /// Submitter
    pub creator: CreatorId,
    /// Registry-assigned creation time (ms since epoch)
    pub created_at: u64,
    /// Parent record for derivatives
    pub parent_id: Option<RecordId>,
    /// True iff `parent_id` is absent
    pub is_original: bool,
}

impl From<&ProvenanceRecord> for AnchorEvent {
    fn from(record: &ProvenanceRecord) -> Self {
        Self {
            record_id: record.record_id(),
            fingerprint: *record.fingerprint(),
            storage_locator: record.storage_locator().to_string(),
            creator: record.creator().clone(),
            created_at: record.created_at(),
            parent_id: record.parent_id(),
            is_original: record.is_original(),
        }
    }
}
