//! In-memory gallery of generated records.
//!
//! Records are stored newest-first in insertion order. Sorting never
//! touches that order: [`GalleryStore::view_ordered_by`] sorts a snapshot.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::record::Record;
use crate::sort::SortKey;
use crate::types::RecordId;

/// Session-lifetime collection of [`Record`]s.
///
/// Records are handed out as `Arc<Record>` so callers share read-only
/// snapshots and can never edit a stored record.
#[derive(Debug, Default)]
pub struct GalleryStore {
    records: VecDeque<Arc<Record>>,
}

impl GalleryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record at the front in O(1).
    pub fn prepend(&mut self, record: Record) -> Arc<Record> {
        let record = Arc::new(record);
        self.records.push_front(Arc::clone(&record));
        record
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<Arc<Record>> {
        self.records.iter().find(|r| r.id() == id).cloned()
    }

    /// Records in stored order (most recently inserted first).
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Record>> {
        self.records.iter()
    }

    /// A sorted copy of the collection.
    ///
    /// The sort is stable: records whose keys compare equal keep their
    /// stored relative order.
    pub fn view_ordered_by(&self, key: SortKey) -> Vec<Arc<Record>> {
        let mut view: Vec<Arc<Record>> = self.records.iter().cloned().collect();
        view.sort_by(|a, b| key.compare(a, b));
        view
    }
}
