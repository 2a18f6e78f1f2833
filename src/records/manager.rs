//! The discovery record store
//!
//! All methods take `&self`; every mutation runs as one critical section
//! behind an internal lock, so the store can be shared across any number of
//! concurrent fetch tasks. Snapshot writes take the read half of the lock
//! and snapshot loads the write half, which makes both mutually exclusive
//! with insertions.

use crate::records::snapshot;
use crate::records::{DiscoveryRecord, Inserted, RecordEntry};
use crate::StoreError;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::sync::RwLock;

/// Keyed store of discovery records, keyed by canonical raw URL
pub struct RecordManager {
    inner: RwLock<HashMap<String, DiscoveryRecord>>,
}

impl RecordManager {
    /// Returns an empty store
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts `entry` keyed by `entry.url.raw`
    ///
    /// The new record's `index` is the record count at the moment of
    /// insertion. When `parent_url` is non-empty the parent record is
    /// looked up under that key and the new index is appended to its
    /// `edges` in place.
    ///
    /// This method performs no existence check against the new key; callers
    /// are expected to have deduplicated first (see [`Self::insert_if_absent`]
    /// for the race-free variant the crawl loop uses).
    ///
    /// # Errors
    ///
    /// `StoreError::ParentNotFound` when `parent_url` is non-empty but no
    /// record exists under that key. The store is left untouched in that
    /// case.
    pub fn add_record(&self, entry: RecordEntry) -> Result<usize, StoreError> {
        let mut records = self.inner.write().expect("record store lock poisoned");
        Self::insert_locked(&mut records, entry)
    }

    /// Atomically inserts `entry` unless a record already exists for its key
    ///
    /// Lookup, index assignment, insertion, and parent linking all happen
    /// under one critical section: when two tasks race on the same newly
    /// discovered URL, exactly one insertion wins and the other observes the
    /// winner's record.
    pub fn insert_if_absent(&self, entry: RecordEntry) -> Result<Inserted, StoreError> {
        let mut records = self.inner.write().expect("record store lock poisoned");

        if let Some(existing) = records.get(&entry.url.raw) {
            return Ok(Inserted::Existing(existing.clone()));
        }

        let index = Self::insert_locked(&mut records, entry)?;
        Ok(Inserted::New(index))
    }

    /// Exact lookup by canonical raw URL
    ///
    /// No partial or normalized matching happens here; the caller must have
    /// canonicalized already. A miss is an expected outcome, not an error.
    pub fn get(&self, raw_url: &str) -> Option<DiscoveryRecord> {
        self.inner
            .read()
            .expect("record store lock poisoned")
            .get(raw_url)
            .cloned()
    }

    /// Records the outcome of a fetch on an existing record
    ///
    /// Returns false when no record exists under `raw_url`.
    pub fn record_fetch(&self, raw_url: &str, status_code: u16, err_string: &str) -> bool {
        let mut records = self.inner.write().expect("record store lock poisoned");
        match records.get_mut(raw_url) {
            Some(record) => {
                record.status_code = status_code;
                record.err_string = err_string.to_string();
                true
            }
            None => false,
        }
    }

    /// Number of records in the store
    pub fn len(&self) -> usize {
        self.inner.read().expect("record store lock poisoned").len()
    }

    /// Returns true when the store holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records that were discovered but never fetched, within the depth
    /// limit, in insertion order
    ///
    /// Used to rebuild the fetch frontier when resuming from a snapshot.
    /// Records whose fetch already failed (non-empty error) are not
    /// retried.
    pub fn pending_fetches(&self, max_depth: u32) -> Vec<DiscoveryRecord> {
        let records = self.inner.read().expect("record store lock poisoned");

        let mut pending: Vec<DiscoveryRecord> = records
            .values()
            .filter(|r| r.status_code == 0 && r.err_string.is_empty() && r.depth <= max_depth)
            .cloned()
            .collect();

        pending.sort_by_key(|r| r.index);
        pending
    }

    /// Clones every record, in insertion order
    pub fn all_records(&self) -> Vec<DiscoveryRecord> {
        let records = self.inner.read().expect("record store lock poisoned");

        let mut all: Vec<DiscoveryRecord> = records.values().cloned().collect();
        all.sort_by_key(|r| r.index);
        all
    }

    /// Serializes the entire store as one JSON object
    ///
    /// Keys are the canonical raw URL strings in ascending lexicographic
    /// order; a trailing newline terminates the document. The ordering is a
    /// committed contract (diff-friendly snapshots), not an iteration
    /// accident. `pretty` indents the output without changing key order or
    /// content; repeated calls on identical content produce identical
    /// bytes.
    pub fn save_to_writer<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), StoreError> {
        let records = self.inner.read().expect("record store lock poisoned");
        snapshot::write_snapshot(&records, writer, pretty)
    }

    /// Replaces the store's contents wholesale from a serialized snapshot
    ///
    /// `index`, `depth`, and `edges` are restored exactly as present in the
    /// input, with no recomputation from parent chains: a saved-then-loaded
    /// store is observably identical to the store at save time.
    pub fn load_from_reader<R: Read>(&self, reader: &mut R) -> Result<(), StoreError> {
        let loaded = snapshot::read_snapshot(reader)?;
        let mut records = self.inner.write().expect("record store lock poisoned");
        *records = loaded;
        Ok(())
    }

    /// Insertion under an already-held write lock
    fn insert_locked(
        records: &mut HashMap<String, DiscoveryRecord>,
        entry: RecordEntry,
    ) -> Result<usize, StoreError> {
        let index = records.len();

        if !entry.parent_url.is_empty() {
            let parent = records
                .get_mut(&entry.parent_url)
                .ok_or_else(|| StoreError::ParentNotFound(entry.parent_url.clone()))?;
            parent.edges.push(index);
        }

        let record = DiscoveryRecord {
            index,
            parent_url: entry.parent_url,
            url: entry.url,
            depth: entry.depth,
            edges: Vec::new(),
            status_code: entry.status_code,
            err_string: entry.err_string,
        };

        records.insert(record.url.raw.clone(), record);
        Ok(index)
    }
}

impl Default for RecordManager {
    fn default() -> Self {
        Self::new()
    }
}
