//! SQLite-backed anchor journal

use crate::error::{RegistryError, Result};
use origin_domain::{
    AnchorJournal, ContentFingerprint, CreatorId, ProvenanceRecord, RecordId, RecordParts,
};
use rusqlite::{params, Connection, Row};
use std::path::Path;

/// Durable append-only journal stored in a single SQLite table
///
/// The `UNIQUE` constraints on `fingerprint` and `record_id` back up the
/// registry's own duplicate check, and the `seq` column fixes replay order.
///
/// # Thread Safety
///
/// SQLite connections are not `Sync`. The registry keeps the journal behind
/// a mutex and only touches it while holding its write lock.
pub struct SqliteJournal {
    conn: Connection,
}

impl SqliteJournal {
    /// Open (or create) a journal at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use origin_store::SqliteJournal;
    ///
    /// let journal = SqliteJournal::open("origin.db").unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let mut journal = Self { conn };
        journal.initialize_schema()?;
        Ok(journal)
    }

    /// Open a throwaway in-memory journal
    pub fn in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    fn initialize_schema(&mut self) -> Result<()> {
        self.conn.pragma_update(None, "foreign_keys", "ON")?;
        self.conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    /// Number of rows in the journal
    pub fn len(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM anchors", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// True if nothing has been appended yet
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn record_id_to_bytes(id: RecordId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    fn bytes_to_record_id(bytes: &[u8]) -> Result<RecordId> {
        let arr: [u8; 16] = bytes.try_into().map_err(|_| {
            RegistryError::Corrupt(format!("Expected 16 bytes for RecordId, got {}", bytes.len()))
        })?;
        Ok(RecordId::from_value(u128::from_be_bytes(arr)))
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<ProvenanceRecord> {
        use rusqlite::types::Type;
        let corrupt = |idx: usize, ty: Type, e: RegistryError| {
            rusqlite::Error::FromSqlConversionFailure(idx, ty, Box::new(e))
        };

        let id_bytes: Vec<u8> = row.get(0)?;
        let record_id = Self::bytes_to_record_id(&id_bytes).map_err(|e| corrupt(0, Type::Blob, e))?;

        let fp_bytes: Vec<u8> = row.get(1)?;
        let fingerprint = ContentFingerprint::from_slice(&fp_bytes)
            .map_err(|e| corrupt(1, Type::Blob, RegistryError::Corrupt(e.to_string())))?;

        let creator: String = row.get(5)?;
        let creator = CreatorId::new(creator).map_err(|e| corrupt(5, Type::Text, RegistryError::Corrupt(e)))?;

        let parent_bytes: Option<Vec<u8>> = row.get(7)?;
        let parent_id = parent_bytes
            .map(|b| Self::bytes_to_record_id(&b))
            .transpose()
            .map_err(|e| corrupt(7, Type::Blob, e))?;

        Ok(ProvenanceRecord::from_parts(RecordParts {
            record_id,
            fingerprint,
            storage_locator: row.get(2)?,
            location_tag: row.get(3)?,
            organization_tag: row.get(4)?,
            creator,
            created_at: row.get::<_, i64>(6)? as u64,
            parent_id,
            edit_type: row.get(8)?,
        }))
    }
}

impl AnchorJournal for SqliteJournal {
    type Error = RegistryError;

    fn append(&mut self, record: &ProvenanceRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO anchors (record_id, fingerprint, storage_locator, location_tag,
                                  organization_tag, creator, created_at, parent_id, edit_type)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                Self::record_id_to_bytes(record.record_id()),
                &record.fingerprint().as_bytes()[..],
                record.storage_locator(),
                record.location_tag(),
                record.organization_tag(),
                record.creator().as_str(),
                record.created_at() as i64,
                record.parent_id().map(Self::record_id_to_bytes),
                record.edit_type(),
            ],
        )?;
        Ok(())
    }

    fn replay(&self) -> Result<Vec<ProvenanceRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT record_id, fingerprint, storage_locator, location_tag, organization_tag,
                    creator, created_at, parent_id, edit_type
             FROM anchors ORDER BY seq ASC",
        )?;

        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| match e {
                rusqlite::Error::FromSqlConversionFailure(_, _, inner) => {
                    match inner.downcast::<RegistryError>() {
                        Ok(e) => *e,
                        Err(other) => RegistryError::Corrupt(other.to_string()),
                    }
                }
                other => RegistryError::Storage(other),
            })?;

        Ok(records)
    }
}
