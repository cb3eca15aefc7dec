use std::collections::HashSet;
use std::path::PathBuf;

use log::debug;
use scout_fs::Record;

use crate::catalog::Catalog;

/// Counters describing one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub added: u64,
    pub updated: u64,
    pub removed: u64,
    pub unchanged: u64,
}

/// Reconciles a fresh crawl against an existing catalog.
///
/// Feed it every record the crawl produced, then call `finish` with
/// the re-walked roots. Unseen paths are inserted, changed paths are
/// updated in place (fingerprint-gated, so untouched entries keep
/// their slot and allocation), and paths under a re-walked root that
/// did not reappear are removed. Roots that were not re-walked are
/// never inferred to have deletions.
pub struct Reconciler<'a> {
    catalog: &'a mut Catalog,
    seen: HashSet<PathBuf>,
    stats: DiffStats,
}

impl<'a> Reconciler<'a> {
    pub fn new(catalog: &'a mut Catalog) -> Self {
        Reconciler {
            catalog,
            seen: HashSet::new(),
            stats: DiffStats::default(),
        }
    }

    pub fn observe(&mut self, record: Record) {
        self.seen.insert(record.full_path.clone());

        match self.catalog.get_mut(&record.full_path) {
            Some(existing) if existing.kind == record.kind => {
                if existing.fingerprint == record.fingerprint {
                    self.stats.unchanged += 1;
                } else {
                    existing.update_from(record.size, record.mtime_secs);
                    self.stats.updated += 1;
                }
            }
            Some(existing) => {
                // Same path, different kind (file replaced by directory
                // or vice versa): replace the record wholesale.
                *existing = record;
                self.stats.updated += 1;
            }
            None => {
                self.catalog.insert(record);
                self.stats.added += 1;
            }
        }
    }

    pub fn observe_batch<I>(&mut self, batch: I)
    where
        I: IntoIterator<Item = Record>,
    {
        for record in batch {
            self.observe(record);
        }
    }

    /// Remove records under the re-walked roots that were not seen
    /// this pass, and return the pass counters.
    ///
    /// This is a linear filter over the whole sequence. Fine at
    /// moderate catalog sizes; the first thing to replace with a
    /// parent-directory index if catalogs grow into the millions.
    pub fn finish(mut self, roots: &[PathBuf]) -> DiffStats {
        let seen = std::mem::take(&mut self.seen);
        let removed = self.catalog.retain(|record| {
            let under_root = roots.iter().any(|root| record.full_path.starts_with(root));
            !under_root || seen.contains(&record.full_path)
        });
        self.stats.removed = removed as u64;

        debug!(
            "[diff] added={} updated={} removed={} unchanged={}",
            self.stats.added, self.stats.updated, self.stats.removed, self.stats.unchanged
        );

        self.stats
    }
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
