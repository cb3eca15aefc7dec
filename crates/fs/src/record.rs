use std::path::PathBuf;

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    File,
    Directory,
}

/// Cheap change detector: size plus last-write time.
///
/// Exists purely to short-circuit unnecessary record updates during an
/// incremental pass. Not a content hash; two files with equal size and
/// mtime compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Fingerprint {
    pub size: u64,
    pub mtime_secs: u64,
}

impl Fingerprint {
    #[inline]
    pub fn new(size: u64, mtime_secs: u64) -> Self {
        Fingerprint { size, mtime_secs }
    }
}

/// One file or directory entry in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub kind: RecordKind,
    /// Absolute path; unique key within a catalog.
    pub full_path: PathBuf,
    /// Base name as stored on disk
    pub name: String,
    /// Lowercased base name, the keyword-match haystack
    pub name_lower: String,
    /// Lowercase extension without dot e.g., 'pdf'. Empty for
    /// directories and extensionless files.
    pub ext: String,
    /// File size in bytes; always 0 for directories
    pub size: u64,
    /// Last-write time as unix seconds
    pub mtime_secs: u64,
    pub fingerprint: Fingerprint,
}

impl Record {
    pub fn new(
        kind: RecordKind,
        full_path: PathBuf,
        name: String,
        ext: String,
        size: u64,
        mtime_secs: u64,
    ) -> Self {
        let name_lower = name.to_lowercase();
        Record {
            kind,
            full_path,
            name,
            name_lower,
            ext,
            size,
            mtime_secs,
            fingerprint: Fingerprint::new(size, mtime_secs),
        }
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == RecordKind::Directory
    }

    /// Human-readable last-write time, local zone.
    pub fn mtime_display(&self) -> String {
        match Local.timestamp_opt(self.mtime_secs as i64, 0) {
            chrono::LocalResult::Single(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            _ => String::new(),
        }
    }

    /// Refresh size/mtime/fingerprint from current on-disk values,
    /// leaving identity fields untouched.
    pub fn update_from(&mut self, size: u64, mtime_secs: u64) {
        self.size = size;
        self.mtime_secs = mtime_secs;
        self.fingerprint = Fingerprint::new(size, mtime_secs);
    }
}
