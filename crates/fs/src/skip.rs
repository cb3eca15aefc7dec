use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use scout_runtime::DEFAULT_SKIP_DIR_NAMES;

/// Per-root directory-name exclusion policy.
///
/// Holds lowercased directory base names. A directory whose lowercased
/// name is in the effective set for its root is pruned: no record, no
/// traversal beneath it. The effective set for a root is the union of
/// the global set and any names registered for that root.
#[derive(Debug, Clone, Default)]
pub struct SkipRules {
    global: HashSet<String>,
    per_root: HashMap<PathBuf, HashSet<String>>,
}

impl SkipRules {
    /// Empty rule set; nothing is pruned.
    pub fn empty() -> Self {
        SkipRules::default()
    }

    /// Rule set seeded with the platform defaults.
    pub fn with_defaults() -> Self {
        let mut rules = SkipRules::default();
        for name in DEFAULT_SKIP_DIR_NAMES {
            rules.add_global(name);
        }
        rules
    }

    pub fn add_global(&mut self, name: &str) {
        self.global.insert(name.to_lowercase());
    }

    pub fn add_for_root(&mut self, root: &Path, name: &str) {
        self.per_root
            .entry(root.to_path_buf())
            .or_default()
            .insert(name.to_lowercase());
    }

    /// `name_lower` must already be lowercased; the walker holds the
    /// lowercased name anyway, so the hot path avoids re-allocating.
    #[inline]
    pub fn is_skipped(&self, root: &Path, name_lower: &str) -> bool {
        if self.global.contains(name_lower) {
            return true;
        }
        self.per_root
            .get(root)
            .is_some_and(|set| set.contains(name_lower))
    }

    /// Every name in effect across all roots, sorted and deduplicated.
    /// Snapshot compatibility compares this against the stored set;
    /// any policy change invalidates old data, since pruned subtrees
    /// would otherwise never be backfilled.
    pub fn sorted_names(&self) -> Vec<String> {
        let mut all: BTreeSet<&str> = self.global.iter().map(String::as_str).collect();
        for set in self.per_root.values() {
            all.extend(set.iter().map(String::as_str));
        }
        all.into_iter().map(str::to_owned).collect()
    }
}

#[cfg(test)]
#[path = "skip_tests.rs"]
mod tests;
