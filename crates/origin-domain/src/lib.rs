//! Origin Domain Layer
//!
//! Value types and trait seams for the content anchor registry. This crate
//! carries no infrastructure: storage, transport and presentation live in the
//! other workspace crates.
//!
//! ## Key Concepts
//!
//! - **Fingerprint**: a 64-byte digest identifying a file's content
//! - **Provenance record**: the immutable "birth certificate" of one fingerprint
//! - **Lineage**: an edited derivative points at the record it was made from
//! - **Record handle**: a registry-issued reference used to claim a parent
//! - **Anchor event**: the notification indexers receive for every insert
//!
//! The registry never hashes content and never trusts caller timestamps:
//! fingerprints come from the hashing collaborator and `created_at` from a
//! [`Clock`] owned by the registry.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod event;
pub mod fingerprint;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use event::AnchorEvent;
pub use fingerprint::{ContentFingerprint, FingerprintError, FINGERPRINT_HEX_LEN, FINGERPRINT_LEN};
pub use record::{CreatorId, DerivativeRequest, ProvenanceRecord, RecordHandle, RecordId, RecordParts};
pub use traits::AnchorJournal;
