//! Provenance records - the "birth certificate" for one piece of content

use crate::ContentFingerprint;
use std::fmt;

/// Unique identifier for a provenance record based on UUIDv7
///
/// Assigned by the registry when a record is created and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(u128);

impl RecordId {
    /// Generate a new UUIDv7-based RecordId
    ///
    /// # Examples
    ///
    /// ```
    /// use origin_domain::RecordId;
    ///
    /// let id = RecordId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a RecordId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a RecordId from its hyphenated UUID string
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid record id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Opaque identity of the actor that submitted a record
///
/// The registry compares creators for equality only; it never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CreatorId(String);

impl CreatorId {
    /// Create a creator identity
    ///
    /// # Errors
    /// Returns error if the identity is empty or only whitespace
    pub fn new(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err("Creator identity cannot be empty".to_string());
        }
        Ok(Self(value))
    }

    /// Get the identity as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CreatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every field of a record, used to build one and to take one apart
///
/// The storage layer rebuilds records from persisted rows through this type.
/// Whether a record is an original is not a field: it follows from `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordParts {
    /// Registry-assigned identifier
    pub record_id: RecordId,
    /// Fingerprint this record certifies
    pub fingerprint: ContentFingerprint,
    /// Where the bytes can be fetched (opaque)
    pub storage_locator: String,
    /// Free-form capture location
    pub location_tag: String,
    /// Free-form attributed institution
    pub organization_tag: String,
    /// Submitter identity
    pub creator: CreatorId,
    /// Milliseconds since the Unix epoch, from the registry clock
    pub created_at: u64,
    /// Record this one was derived from, if any
    pub parent_id: Option<RecordId>,
    /// Transformation applied relative to the parent (empty for originals)
    pub edit_type: String,
}

/// An immutable provenance record
///
/// Fields are private so nothing can change a record after the registry has
/// stored it; readers get accessors and clones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvenanceRecord {
    parts: RecordParts,
}

impl ProvenanceRecord {
    /// Build a record from its parts
    ///
    /// An original must not carry an edit description, so `edit_type` is
    /// cleared when `parent_id` is absent.
    pub fn from_parts(mut parts: RecordParts) -> Self {
        if parts.parent_id.is_none() {
            parts.edit_type.clear();
        }
        Self { parts }
    }

    /// Take the record apart (for persistence)
    pub fn into_parts(self) -> RecordParts {
        self.parts
    }

    /// Registry-assigned identifier
    pub fn record_id(&self) -> RecordId {
        self.parts.record_id
    }

    /// Certified fingerprint
    pub fn fingerprint(&self) -> &ContentFingerprint {
        &self.parts.fingerprint
    }

    /// Opaque storage pointer
    pub fn storage_locator(&self) -> &str {
        &self.parts.storage_locator
    }

    /// Capture location metadata
    pub fn location_tag(&self) -> &str {
        &self.parts.location_tag
    }

    /// Attributed institution
    pub fn organization_tag(&self) -> &str {
        &self.parts.organization_tag
    }

    /// Submitter
    pub fn creator(&self) -> &CreatorId {
        &self.parts.creator
    }

    /// Creation time in milliseconds since the Unix epoch
    pub fn created_at(&self) -> u64 {
        self.parts.created_at
    }

    /// Parent record, absent for original captures
    pub fn parent_id(&self) -> Option<RecordId> {
        self.parts.parent_id
    }

    /// Edit description relative to the parent
    pub fn edit_type(&self) -> &str {
        &self.parts.edit_type
    }

    /// True iff the record has no parent
    pub fn is_original(&self) -> bool {
        self.parts.parent_id.is_none()
    }
}

/// A registry-issued reference to a stored record
///
/// Creating a derivative requires presenting the parent through a handle
/// rather than a bare id. The registry re-checks that the handle denotes the
/// exact record it holds before accepting the derivative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHandle {
    record: ProvenanceRecord,
}

impl RecordHandle {
    /// Wrap a record the registry has just stored or looked up
    pub fn new(record: ProvenanceRecord) -> Self {
        Self { record }
    }

    /// Identifier of the referenced record
    pub fn record_id(&self) -> RecordId {
        self.record.record_id()
    }

    /// Borrow the referenced record
    pub fn record(&self) -> &ProvenanceRecord {
        &self.record
    }

    /// Unwrap into the referenced record
    pub fn into_record(self) -> ProvenanceRecord {
        self.record
    }
}

/// Input for creating an edited derivative of an existing record
///
/// Location and organization tags default to the parent's unless overridden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivativeRequest {
    /// Fingerprint of the edited content
    pub fingerprint: ContentFingerprint,
    /// Where the edited bytes can be fetched
    pub storage_locator: String,
    /// Override for the parent's location tag
    pub location_tag: Option<String>,
    /// Override for the parent's organization tag
    pub organization_tag: Option<String>,
    /// What was done to the parent (e.g. "cropped 20%")
    pub edit_type: String,
    /// Submitter of the derivative
    pub creator: CreatorId,
}

impl DerivativeRequest {
    /// Create a request that inherits both tags from the parent
    pub fn new(
        fingerprint: ContentFingerprint,
        storage_locator: impl Into<String>,
        edit_type: impl Into<String>,
        creator: CreatorId,
    ) -> Self {
        Self {
            fingerprint,
            storage_locator: storage_locator.into(),
            location_tag: None,
            organization_tag: None,
            edit_type: edit_type.into(),
            creator,
        }
    }

    /// Override the location tag
    pub fn with_location_tag(mut self, location_tag: impl Into<String>) -> Self {
        self.location_tag = Some(location_tag.into());
        self
    }

    /// Override the organization tag
    pub fn with_organization_tag(mut self, organization_tag: impl Into<String>) -> Self {
        self.organization_tag = Some(organization_tag.into());
        self
    }
}
