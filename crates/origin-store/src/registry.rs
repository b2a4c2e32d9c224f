//! The anchor registry aggregate
//!
//! Owns every provenance record, indexed by fingerprint, record id and
//! creator, plus the append-only insertion order. All mutations run under one
//! write lock: the duplicate check, the journal append, the index update and
//! the event emission happen as a single unit.

use crate::error::{RegistryError, Result};
use crate::journal::SqliteJournal;
use origin_domain::{
    AnchorEvent, AnchorJournal, Clock, ContentFingerprint, CreatorId, DerivativeRequest,
    ProvenanceRecord, RecordHandle, RecordId, RecordParts, SystemClock,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Tunables for a registry instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Capacity of the insertion event channel
    pub event_buffer: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            event_buffer: 1024,
        }
    }
}

/// In-memory indexes rebuilt from the journal on open
#[derive(Debug, Default)]
struct RegistryState {
    by_fingerprint: HashMap<ContentFingerprint, ProvenanceRecord>,
    insertion_order: Vec<ContentFingerprint>,
    by_record_id: HashMap<RecordId, ContentFingerprint>,
    by_creator: HashMap<CreatorId, Vec<ContentFingerprint>>,
    children: HashMap<RecordId, Vec<ContentFingerprint>>,
}

impl RegistryState {
    /// Add a record to every index. Callers have already checked uniqueness.
    fn apply(&mut self, record: ProvenanceRecord) {
        let fingerprint = *record.fingerprint();

        self.insertion_order.push(fingerprint);
        self.by_record_id.insert(record.record_id(), fingerprint);
        self.by_creator
            .entry(record.creator().clone())
            .or_default()
            .push(fingerprint);
        if let Some(parent_id) = record.parent_id() {
            self.children.entry(parent_id).or_default().push(fingerprint);
        }
        self.by_fingerprint.insert(fingerprint, record);
    }

    fn get_by_id(&self, id: RecordId) -> Option<&ProvenanceRecord> {
        self.by_record_id
            .get(&id)
            .and_then(|fp| self.by_fingerprint.get(fp))
    }

    fn collect(&self, fingerprints: &[ContentFingerprint]) -> Vec<ProvenanceRecord> {
        fingerprints
            .iter()
            .filter_map(|fp| self.by_fingerprint.get(fp).cloned())
            .collect()
    }
}

/// Content anchor registry
///
/// Maps each fingerprint to exactly one immutable [`ProvenanceRecord`].
/// Share it between tasks as `Arc<Registry>`; every method takes `&self`.
///
/// # Examples
///
/// ```
/// use origin_domain::{ContentFingerprint, CreatorId};
/// use origin_store::Registry;
///
/// let registry = Registry::in_memory().unwrap();
/// let fp = ContentFingerprint::from_bytes([0xAA; 64]);
/// let alice = CreatorId::new("alice").unwrap();
///
/// let handle = registry.insert(fp, "cid-1", "40.7N,74.0W", "AP", alice).unwrap();
/// assert!(handle.record().is_original());
/// assert_eq!(registry.count(), 1);
/// ```
pub struct Registry<J = SqliteJournal> {
    state: RwLock<RegistryState>,
    journal: Mutex<J>,
    clock: Arc<dyn Clock>,
    events: broadcast::Sender<AnchorEvent>,
    config: RegistryConfig,
}

impl Registry<SqliteJournal> {
    /// Open (or create) a registry backed by the SQLite database at `path`
    pub fn open<P: AsRef<Path>>(path: P, config: RegistryConfig) -> Result<Self> {
        let journal = SqliteJournal::open(path)?;
        Self::with_journal(journal, Arc::new(SystemClock), config)
    }

    /// Registry over an in-memory database with default settings
    pub fn in_memory() -> Result<Self> {
        Self::open(":memory:", RegistryConfig::default())
    }
}

impl<J> Registry<J>
where
    J: AnchorJournal + Send,
    RegistryError: From<J::Error>,
{
    /// Build a registry over an existing journal, replaying its contents
    ///
    /// Replay re-checks every invariant: a duplicate fingerprint, a reused
    /// record id or a parent that appears after its child is reported as
    /// [`RegistryError::Corrupt`].
    pub fn with_journal(journal: J, clock: Arc<dyn Clock>, config: RegistryConfig) -> Result<Self> {
        let mut state = RegistryState::default();

        for record in journal.replay()? {
            if state.by_fingerprint.contains_key(record.fingerprint()) {
                return Err(RegistryError::Corrupt(format!(
                    "duplicate fingerprint {}",
                    record.fingerprint().short()
                )));
            }
            if state.by_record_id.contains_key(&record.record_id()) {
                return Err(RegistryError::Corrupt(format!(
                    "reused record id {}",
                    record.record_id()
                )));
            }
            if let Some(parent_id) = record.parent_id() {
                if !state.by_record_id.contains_key(&parent_id) {
                    return Err(RegistryError::Corrupt(format!(
                        "record {} references unknown parent {}",
                        record.record_id(),
                        parent_id
                    )));
                }
            }
            state.apply(record);
        }

        info!("Registry opened with {} anchored records", state.insertion_order.len());

        let (events, _) = broadcast::channel(config.event_buffer.max(1));

        Ok(Self {
            state: RwLock::new(state),
            journal: Mutex::new(journal),
            clock,
            events,
            config,
        })
    }

    /// Settings this registry was opened with
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Subscribe to insertion events
    ///
    /// Each successful insert is delivered once, in insertion order. Events
    /// sent before the call are not replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<AnchorEvent> {
        self.events.subscribe()
    }

    /// Anchor an original capture
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateFingerprint`] if the fingerprint is already
    /// anchored; the registry is left untouched and no event is emitted.
    pub fn insert(
        &self,
        fingerprint: ContentFingerprint,
        storage_locator: impl Into<String>,
        location_tag: impl Into<String>,
        organization_tag: impl Into<String>,
        creator: CreatorId,
    ) -> Result<RecordHandle> {
        let mut state = self.write_state()?;

        if state.by_fingerprint.contains_key(&fingerprint) {
            warn!("Rejected duplicate anchor {}", fingerprint.short());
            return Err(RegistryError::DuplicateFingerprint(fingerprint));
        }

        let record = ProvenanceRecord::from_parts(RecordParts {
            record_id: Self::fresh_id(&state),
            fingerprint,
            storage_locator: storage_locator.into(),
            location_tag: location_tag.into(),
            organization_tag: organization_tag.into(),
            creator,
            created_at: self.clock.now_millis(),
            parent_id: None,
            edit_type: String::new(),
        });

        self.commit(&mut state, record)
    }

    /// Anchor an edited derivative of an existing record
    ///
    /// Tags default to the parent's unless the request overrides them. The
    /// lineage is the submitter's claim; the registry does not check that the
    /// new content was actually derived from the parent.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::DuplicateFingerprint`] if the new fingerprint is
    ///   already anchored, whatever its lineage
    /// - [`RegistryError::ParentNotFound`] if the handle does not denote a
    ///   record held by this registry
    pub fn insert_derivative(
        &self,
        parent: &RecordHandle,
        request: DerivativeRequest,
    ) -> Result<RecordHandle> {
        let mut state = self.write_state()?;

        if state.by_fingerprint.contains_key(&request.fingerprint) {
            warn!("Rejected duplicate derivative {}", request.fingerprint.short());
            return Err(RegistryError::DuplicateFingerprint(request.fingerprint));
        }

        let stored_parent = match state.get_by_id(parent.record_id()) {
            Some(stored) if stored == parent.record() => stored,
            _ => {
                warn!("Rejected derivative of unknown parent {}", parent.record_id());
                return Err(RegistryError::ParentNotFound(parent.record_id()));
            }
        };

        let record = ProvenanceRecord::from_parts(RecordParts {
            record_id: Self::fresh_id(&state),
            fingerprint: request.fingerprint,
            storage_locator: request.storage_locator,
            location_tag: request
                .location_tag
                .unwrap_or_else(|| stored_parent.location_tag().to_string()),
            organization_tag: request
                .organization_tag
                .unwrap_or_else(|| stored_parent.organization_tag().to_string()),
            creator: request.creator,
            created_at: self.clock.now_millis(),
            parent_id: Some(stored_parent.record_id()),
            edit_type: request.edit_type,
        });

        self.commit(&mut state, record)
    }

    /// Whether a record with this fingerprint exists
    pub fn exists(&self, fingerprint: &ContentFingerprint) -> bool {
        self.read_state().by_fingerprint.contains_key(fingerprint)
    }

    /// Full record for a fingerprint
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] when nothing is anchored under it. A miss is
    /// an ordinary outcome, never a zero-valued record.
    pub fn lookup(&self, fingerprint: &ContentFingerprint) -> Result<ProvenanceRecord> {
        debug!("Lookup {}", fingerprint.short());
        self.read_state()
            .by_fingerprint
            .get(fingerprint)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(fingerprint.to_hex()))
    }

    /// Record by its registry-assigned id
    pub fn lookup_by_id(&self, record_id: RecordId) -> Result<ProvenanceRecord> {
        self.read_state()
            .get_by_id(record_id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(record_id.to_string()))
    }

    /// Handle to the record anchored under `fingerprint`, for use as a parent
    pub fn handle(&self, fingerprint: &ContentFingerprint) -> Result<RecordHandle> {
        self.lookup(fingerprint).map(RecordHandle::new)
    }

    /// Handle to a parent identified only by id
    ///
    /// # Errors
    ///
    /// [`RegistryError::ParentNotFound`] if no record has this id.
    pub fn resolve_parent(&self, record_id: RecordId) -> Result<RecordHandle> {
        self.read_state()
            .get_by_id(record_id)
            .cloned()
            .map(RecordHandle::new)
            .ok_or(RegistryError::ParentNotFound(record_id))
    }

    /// Every fingerprint, in insertion order
    pub fn list_all_fingerprints(&self) -> Vec<ContentFingerprint> {
        self.read_state().insertion_order.clone()
    }

    /// Number of anchored records
    pub fn count(&self) -> usize {
        self.read_state().insertion_order.len()
    }

    /// Records at positions `[start, min(start + limit, count))` in insertion order
    ///
    /// A `start` at or past the end, or a zero `limit`, yields an empty page.
    /// A `limit` running past the end is clamped, so `paginate(0, count())`
    /// returns every record.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidRange`] for negative arguments.
    pub fn paginate(&self, start: i64, limit: i64) -> Result<Vec<ProvenanceRecord>> {
        let invalid = |reason: &str| {
            warn!("Rejected page request start={} limit={}: {}", start, limit, reason);
            RegistryError::InvalidRange {
                start,
                limit,
                reason: reason.to_string(),
            }
        };

        if start < 0 {
            return Err(invalid("start must not be negative"));
        }
        if limit < 0 {
            return Err(invalid("limit must not be negative"));
        }

        let state = self.read_state();
        let count = state.insertion_order.len();
        let start = usize::try_from(start).unwrap_or(usize::MAX).min(count);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let end = start.saturating_add(limit).min(count);

        debug!("Page [{}, {}) of {}", start, end, count);
        Ok(state.collect(&state.insertion_order[start..end]))
    }

    /// Every record submitted by `creator`, in insertion order
    pub fn list_by_creator(&self, creator: &CreatorId) -> Vec<ProvenanceRecord> {
        let state = self.read_state();
        state
            .by_creator
            .get(creator)
            .map(|fps| state.collect(fps))
            .unwrap_or_default()
    }

    /// Edit chain from the record under `fingerprint` back to its original
    ///
    /// The first element is the requested record and the last is the root
    /// original.
    pub fn lineage(&self, fingerprint: &ContentFingerprint) -> Result<Vec<ProvenanceRecord>> {
        let state = self.read_state();
        let mut current = state
            .by_fingerprint
            .get(fingerprint)
            .ok_or_else(|| RegistryError::NotFound(fingerprint.to_hex()))?;

        let mut chain = vec![current.clone()];
        while let Some(parent_id) = current.parent_id() {
            current = state.get_by_id(parent_id).ok_or_else(|| {
                RegistryError::Corrupt(format!("missing parent {} in memory", parent_id))
            })?;
            chain.push(current.clone());
        }

        Ok(chain)
    }

    /// Direct derivatives of the record under `fingerprint`, in insertion order
    pub fn derivatives_of(&self, fingerprint: &ContentFingerprint) -> Result<Vec<ProvenanceRecord>> {
        let state = self.read_state();
        let parent = state
            .by_fingerprint
            .get(fingerprint)
            .ok_or_else(|| RegistryError::NotFound(fingerprint.to_hex()))?;

        Ok(state
            .children
            .get(&parent.record_id())
            .map(|fps| state.collect(fps))
            .unwrap_or_default())
    }

    /// Persist, index and announce a record. Runs under the write lock.
    fn commit(
        &self,
        state: &mut RegistryState,
        record: ProvenanceRecord,
    ) -> Result<RecordHandle> {
        {
            let mut journal = self.journal.lock().map_err(|_| RegistryError::Poisoned)?;
            journal.append(&record)?;
        }

        state.apply(record.clone());

        // No subscribers is not an error.
        let _ = self.events.send(AnchorEvent::from(&record));

        info!(
            "Anchored {} as {} (original: {}, creator: {})",
            record.fingerprint().short(),
            record.record_id(),
            record.is_original(),
            record.creator()
        );

        Ok(RecordHandle::new(record))
    }

    fn fresh_id(state: &RegistryState) -> RecordId {
        loop {
            let id = RecordId::new();
            if !state.by_record_id.contains_key(&id) {
                return id;
            }
        }
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, RegistryState>> {
        self.state.write().map_err(|_| RegistryError::Poisoned)
    }

    // Readers tolerate poisoning: indexes change only after the journal
    // append succeeds, and `apply` itself does not panic.
    fn read_state(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }
}
