use std::{
    fs::{self, File},
    io::{self, Read, Write},
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use bincode::config;
use chrono::{Local, TimeZone};
use log::warn;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use scout_fs::Record;

use crate::catalog::Catalog;

/// Magic number: "SCOT" in little-endian
pub const SNAPSHOT_MAGIC: u32 = 0x544F4353;

pub const SNAPSHOT_VERSION: u32 = 2;

/// zstd level; snapshots are written once per build, read once per
/// start, so a mid-level setting is plenty.
const COMPRESSION_LEVEL: i32 = 3;

/// Fixed-size header preceding the compressed body:
/// `[magic u32][version u32][crc32 u32]`, all little-endian.
/// The crc covers the compressed body bytes.
const HEADER_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    /// Snapshot format version, checked on every load
    pub version: u32,
    /// Unix seconds when the catalog was first built
    pub created_secs: u64,
    /// Unix seconds of the last full or incremental update
    pub updated_secs: u64,
    /// Root set the catalog was last scanned from
    pub roots: Vec<PathBuf>,
    /// Effective skip-dir names, sorted, for compatibility equality
    pub skip_dirs: Vec<String>,
    pub record_count: u64,
    /// Free-form environment diagnostic
    pub environment: String,
}

impl SnapshotMeta {
    pub fn new(roots: Vec<PathBuf>, skip_dirs: Vec<String>, record_count: u64) -> Self {
        let now = unix_now();
        SnapshotMeta {
            version: SNAPSHOT_VERSION,
            created_secs: now,
            updated_secs: now,
            roots,
            skip_dirs,
            record_count,
            environment: format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH),
        }
    }

    /// Refresh the update timestamp and record count after a pass,
    /// keeping the original creation time.
    pub fn touch(&mut self, record_count: u64) {
        self.updated_secs = unix_now();
        self.record_count = record_count;
    }

    pub fn updated_display(&self) -> String {
        match Local.timestamp_opt(self.updated_secs as i64, 0) {
            chrono::LocalResult::Single(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            _ => String::new(),
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// Borrowed/owned pair with identical bincode encodings.
#[derive(Serialize)]
struct SnapshotRef<'a> {
    meta: &'a SnapshotMeta,
    records: &'a [Record],
}

#[derive(Deserialize)]
struct Snapshot {
    meta: SnapshotMeta,
    records: Vec<Record>,
}

/// Logical outcome of a snapshot load.
///
/// Everything short of an actual OS-level I/O failure is expressed
/// here rather than as an error: an unusable snapshot means "rebuild",
/// never a fault the caller has to unwind from.
pub enum SnapshotCompatibility {
    Missing,
    Corrupt,
    VersionMismatch { on_disk: u32, expected: u32 },
    SkipRulesMismatch { on_disk: Vec<String> },
    Loaded { meta: SnapshotMeta, catalog: Catalog },
}

/// Serialize, compress, and atomically replace the snapshot file.
///
/// An unwritable path is a configuration-level fault and propagates.
pub fn write_snapshot_atomic(
    path: &Path,
    meta: &SnapshotMeta,
    catalog: &Catalog,
) -> io::Result<()> {
    let body = bincode::serde::encode_to_vec(
        SnapshotRef {
            meta,
            records: catalog.records(),
        },
        config::standard(),
    )
    .map_err(io::Error::other)?;

    let compressed = zstd::encode_all(&body[..], COMPRESSION_LEVEL)?;
    let crc = crc32fast::hash(&compressed);

    let parent = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(&SNAPSHOT_MAGIC.to_le_bytes())?;
    tmp.write_all(&SNAPSHOT_VERSION.to_le_bytes())?;
    tmp.write_all(&crc.to_le_bytes())?;
    tmp.write_all(&compressed)?;
    tmp.flush()?;

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Load the snapshot at `path`, gated on format version and on the
/// currently effective skip-dir set.
///
/// Only OS-level failures surface as `Err`; truncated, corrupt, or
/// incompatible files come back as logical outcomes so the caller can
/// fall back to a full rebuild.
pub fn load_snapshot(
    path: &Path,
    expected_skip_dirs: &[String],
) -> io::Result<SnapshotCompatibility> {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(SnapshotCompatibility::Missing);
        }
        Err(e) => return Err(e),
    };

    let mut raw = Vec::new();
    if let Err(e) = file.read_to_end(&mut raw) {
        warn!("[snapshot] failed to read {}: {e}", path.display());
        return Ok(SnapshotCompatibility::Corrupt);
    }

    if raw.len() < HEADER_LEN {
        return Ok(SnapshotCompatibility::Corrupt);
    }

    let magic = u32::from_le_bytes(raw[0..4].try_into().unwrap());
    let version = u32::from_le_bytes(raw[4..8].try_into().unwrap());
    let crc = u32::from_le_bytes(raw[8..12].try_into().unwrap());
    let compressed = &raw[HEADER_LEN..];

    if magic != SNAPSHOT_MAGIC {
        return Ok(SnapshotCompatibility::Corrupt);
    }
    if version != SNAPSHOT_VERSION {
        return Ok(SnapshotCompatibility::VersionMismatch {
            on_disk: version,
            expected: SNAPSHOT_VERSION,
        });
    }
    if crc32fast::hash(compressed) != crc {
        return Ok(SnapshotCompatibility::Corrupt);
    }

    let body = match zstd::decode_all(compressed) {
        Ok(b) => b,
        Err(e) => {
            warn!("[snapshot] decompression failed for {}: {e}", path.display());
            return Ok(SnapshotCompatibility::Corrupt);
        }
    };

    let snapshot: Snapshot = match bincode::serde::decode_from_slice(&body, config::standard()) {
        Ok((s, _bytes_read)) => s,
        Err(e) => {
            warn!("[snapshot] decode failed for {}: {e}", path.display());
            return Ok(SnapshotCompatibility::Corrupt);
        }
    };

    if snapshot.meta.version != SNAPSHOT_VERSION {
        return Ok(SnapshotCompatibility::VersionMismatch {
            on_disk: snapshot.meta.version,
            expected: SNAPSHOT_VERSION,
        });
    }

    if snapshot.meta.skip_dirs != expected_skip_dirs {
        return Ok(SnapshotCompatibility::SkipRulesMismatch {
            on_disk: snapshot.meta.skip_dirs,
        });
    }

    // The sequence is the source of truth; the path map is rebuilt
    // by indexing it.
    let Snapshot { meta, records } = snapshot;
    Ok(SnapshotCompatibility::Loaded {
        meta,
        catalog: Catalog::from_records(records),
    })
}

#[cfg(test)]
#[path = "persist_tests.rs"]
mod tests;
