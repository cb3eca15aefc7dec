use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use scout_fs::Record;

/// The in-memory catalog: an ordered record sequence plus a path-keyed
/// index into the same storage.
///
/// Invariants: every path in the map refers to exactly one slot in the
/// sequence and vice versa; no two records share a `full_path`. The
/// sequence order is insertion order and carries no meaning; the map is
/// always derivable from the sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    records: Vec<Record>,
    by_path: HashMap<PathBuf, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Rebuild a catalog from a loaded sequence. The sequence is the
    /// source of truth; a duplicated path replaces the earlier record
    /// in its existing slot.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut catalog = Catalog {
            records: Vec::with_capacity(records.len()),
            by_path: HashMap::with_capacity(records.len()),
        };
        for record in records {
            catalog.insert(record);
        }
        catalog
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    #[inline]
    pub fn get(&self, path: &Path) -> Option<&Record> {
        self.by_path.get(path).map(|&idx| &self.records[idx])
    }

    #[inline]
    pub fn get_mut(&mut self, path: &Path) -> Option<&mut Record> {
        self.by_path
            .get(path)
            .map(|&idx| &mut self.records[idx])
    }

    #[inline]
    pub fn contains(&self, path: &Path) -> bool {
        self.by_path.contains_key(path)
    }

    /// Insert a record, replacing in place if the path already exists
    /// (the slot, and therefore sequence position, is preserved).
    pub fn insert(&mut self, record: Record) {
        match self.by_path.get(&record.full_path) {
            Some(&idx) => self.records[idx] = record,
            None => {
                self.by_path
                    .insert(record.full_path.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    /// Drop every record failing the predicate and reindex the map.
    /// Returns how many records were removed.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&Record) -> bool,
    {
        let before = self.records.len();
        self.records.retain(|r| keep(r));
        let removed = before - self.records.len();
        if removed > 0 {
            self.reindex();
        }
        removed
    }

    /// Remove everything; used before a forced full rebuild.
    pub fn clear(&mut self) {
        self.records.clear();
        self.by_path.clear();
    }

    pub fn file_count(&self) -> u64 {
        self.records.iter().filter(|r| !r.is_dir()).count() as u64
    }

    pub fn dir_count(&self) -> u64 {
        self.records.iter().filter(|r| r.is_dir()).count() as u64
    }

    fn reindex(&mut self) {
        self.by_path.clear();
        for (idx, record) in self.records.iter().enumerate() {
            self.by_path.insert(record.full_path.clone(), idx);
        }
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
