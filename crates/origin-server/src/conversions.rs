//! Wire types and conversions between JSON bodies and domain types
//!
//! Fingerprints travel as 128-character lowercase hex; record ids as
//! hyphenated UUID strings.

use origin_domain::{ContentFingerprint, CreatorId, DerivativeRequest, ProvenanceRecord};
use serde::{Deserialize, Serialize};

/// Error type for conversion failures
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// Fingerprint was not 128 hex characters
    #[error("Malformed fingerprint: {0}")]
    InvalidFingerprint(#[from] origin_domain::FingerprintError),

    /// Creator identity missing or blank
    #[error("Invalid creator: {0}")]
    InvalidCreator(String),
}

/// Body of `POST /anchors`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnchorBody {
    /// 128-character hex fingerprint
    pub fingerprint: String,
    /// Opaque storage pointer from the pinning service
    pub storage_locator: String,
    /// Capture location
    #[serde(default)]
    pub location_tag: String,
    /// Attributed institution
    #[serde(default)]
    pub organization_tag: String,
    /// Submitter identity
    pub creator: String,
}

/// Body of `POST /anchors/:fingerprint/derivatives`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DerivativeBody {
    /// Fingerprint of the edited content
    pub fingerprint: String,
    /// Opaque storage pointer for the edited bytes
    pub storage_locator: String,
    /// Overrides the parent's location tag when present
    #[serde(default)]
    pub location_tag: Option<String>,
    /// Overrides the parent's organization tag when present
    #[serde(default)]
    pub organization_tag: Option<String>,
    /// What was done to the parent
    pub edit_type: String,
    /// Submitter identity
    pub creator: String,
}

/// Query string of `GET /anchors`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageParams {
    /// First position (default 0)
    pub start: Option<i64>,
    /// Page length (default from config)
    pub limit: Option<i64>,
}

/// JSON view of a provenance record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordView {
    /// Registry-assigned id
    pub record_id: String,
    /// Hex fingerprint
    pub fingerprint: String,
    /// Storage pointer
    pub storage_locator: String,
    /// Capture location
    pub location_tag: String,
    /// Attributed institution
    pub organization_tag: String,
    /// Submitter
    pub creator: String,
    /// Milliseconds since the Unix epoch
    pub created_at: u64,
    /// Parent record id for derivatives
    pub parent_id: Option<String>,
    /// Edit description (empty for originals)
    pub edit_type: String,
    /// True iff `parent_id` is null
    pub is_original: bool,
}

impl From<&ProvenanceRecord> for RecordView {
    fn from(record: &ProvenanceRecord) -> Self {
        Self {
            record_id: record.record_id().to_string(),
            fingerprint: record.fingerprint().to_hex(),
            storage_locator: record.storage_locator().to_string(),
            location_tag: record.location_tag().to_string(),
            organization_tag: record.organization_tag().to_string(),
            creator: record.creator().to_string(),
            created_at: record.created_at(),
            parent_id: record.parent_id().map(|id| id.to_string()),
            edit_type: record.edit_type().to_string(),
            is_original: record.is_original(),
        }
    }
}

/// Convert a list of records for a response body
pub fn records_to_views(records: &[ProvenanceRecord]) -> Vec<RecordView> {
    records.iter().map(RecordView::from).collect()
}

/// Parse a wire fingerprint
pub fn fingerprint_from_wire(s: &str) -> Result<ContentFingerprint, ConversionError> {
    Ok(ContentFingerprint::from_hex(s)?)
}

/// Parse a wire creator identity
pub fn creator_from_wire(s: &str) -> Result<CreatorId, ConversionError> {
    CreatorId::new(s).map_err(ConversionError::InvalidCreator)
}

impl AnchorBody {
    /// Validate the body into registry arguments
    pub fn into_parts(self) -> Result<(ContentFingerprint, String, String, String, CreatorId), ConversionError> {
        Ok((
            fingerprint_from_wire(&self.fingerprint)?,
            self.storage_locator,
            self.location_tag,
            self.organization_tag,
            creator_from_wire(&self.creator)?,
        ))
    }
}

impl TryFrom<DerivativeBody> for DerivativeRequest {
    type Error = ConversionError;

    fn try_from(body: DerivativeBody) -> Result<Self, Self::Error> {
        let mut request = DerivativeRequest::new(
            fingerprint_from_wire(&body.fingerprint)?,
            body.storage_locator,
            body.edit_type,
            creator_from_wire(&body.creator)?,
        );
        if let Some(location_tag) = body.location_tag {
            request = request.with_location_tag(location_tag);
        }
        if let Some(organization_tag) = body.organization_tag {
            request = request.with_organization_tag(organization_tag);
        }
        Ok(request)
    }
}
