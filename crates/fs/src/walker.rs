use std::{
    fs::{self, read_dir},
    io::Result,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use crossbeam::channel::{self, RecvTimeoutError, Sender};
use log::{debug, warn};

use crate::{
    cancel::CancelToken,
    config::BATCH_SIZE,
    record::{Record, RecordKind},
    skip::SkipRules,
};

pub struct ScanContext {
    pub skip: SkipRules,
    pub cancel: CancelToken,
}

/// One pending directory, tagged with the root it was reached from so
/// skip rules resolve per root.
struct WorkItem {
    root: Arc<PathBuf>,
    dir: PathBuf,
}

/// Multi-threaded crawl over `roots` using a shared work queue.
///
/// The queue is the explicit traversal stack: directories are expanded
/// iteratively, never recursively, so tree depth does not bound the
/// call stack. Sibling order is whatever the platform's directory
/// enumeration yields and is not deterministic between runs.
///
/// Directories whose lowercased base name is in the skip set for their
/// root are pruned: no record, no traversal beneath them. Enumeration
/// failures are absorbed at single-directory granularity.
pub fn walk_parallel(
    roots: Vec<PathBuf>,
    file_tx: Sender<Vec<Record>>,
    ctx: Arc<ScanContext>,
    num_threads: usize,
) -> Result<()> {
    let (work_tx, work_rx) = channel::unbounded::<WorkItem>();

    // Track pending work items to know when to terminate
    let pending = Arc::new(AtomicUsize::new(roots.len()));

    // Seed work queue with roots
    for root in roots {
        let root = Arc::new(root);
        let _ = work_tx.send(WorkItem {
            dir: root.as_ref().clone(),
            root,
        });
    }

    debug!("[walk_parallel] starting with {} threads", num_threads);

    thread::scope(|s| {
        for _thread_id in 0..num_threads {
            let work_rx = work_rx.clone();
            let work_tx = work_tx.clone();
            let file_tx = file_tx.clone();
            let ctx = Arc::clone(&ctx);
            let pending = Arc::clone(&pending);

            s.spawn(move || {
                worker_loop(work_rx, work_tx, file_tx, &ctx, &pending);
            });
        }
    });

    Ok(())
}

/// Worker loop for the parallel crawl.
/// Each worker expands directories from the work queue and sends
/// batched records, checking for cancellation at directory boundaries.
fn worker_loop(
    work_rx: channel::Receiver<WorkItem>,
    work_tx: channel::Sender<WorkItem>,
    file_tx: Sender<Vec<Record>>,
    ctx: &ScanContext,
    pending: &AtomicUsize,
) {
    let mut batch = Vec::with_capacity(BATCH_SIZE);

    loop {
        // Use timeout to periodically check for completion or cancellation
        match work_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(item) => {
                if ctx.cancel.is_cancelled() {
                    debug!("[worker] cancellation observed, stopping");
                    break;
                }

                if let Err(e) = scan_dir(&item, &work_tx, &mut batch, ctx, pending) {
                    warn!("[worker] scan_dir({:?}) failed: {e}", item.dir);
                }
                // Send batch if it's full
                if batch.len() >= BATCH_SIZE {
                    let to_send = std::mem::take(&mut batch);
                    if file_tx.send(to_send).is_err() {
                        return;
                    }
                }

                // Decrement pending counter after processing directory
                if pending.fetch_sub(1, Ordering::AcqRel) == 1 {
                    // Last item! Done!
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if ctx.cancel.is_cancelled() || pending.load(Ordering::Acquire) == 0 {
                    break;
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    // Send any remaining records
    if !batch.is_empty() {
        let _ = file_tx.send(batch);
    }
}

/// Expand one directory: enqueue non-pruned subdirectories and collect
/// records into the batch. An unreadable directory contributes zero
/// entries and is never retried.
fn scan_dir(
    item: &WorkItem,
    work_tx: &channel::Sender<WorkItem>,
    batch: &mut Vec<Record>,
    ctx: &ScanContext,
    pending: &AtomicUsize,
) -> Result<()> {
    let rd = match read_dir(&item.dir) {
        Ok(rd) => rd,
        Err(e) => {
            warn!("[walk] read_dir({:?}) failed: {e}", item.dir);
            return Ok(());
        }
    };

    for entry_res in rd {
        let entry = match entry_res {
            Ok(e) => e,
            Err(e) => {
                warn!("[walk] error reading entry in {:?}: {e}", item.dir);
                continue;
            }
        };

        match inspect_fs_entry(&entry, &item.root, &ctx.skip) {
            Ok(Some(record)) => {
                if record.is_dir() {
                    // Increment pending count before sending subdirectory
                    pending.fetch_add(1, Ordering::AcqRel);
                    let _ = work_tx.send(WorkItem {
                        root: Arc::clone(&item.root),
                        dir: record.full_path.clone(),
                    });
                }
                batch.push(record);
            }
            Ok(None) => {}
            Err(e) => {
                warn!("[walk] inspect_entry error in {:?}: {e}", item.dir);
            }
        }
    }

    Ok(())
}

/// Build a record for one directory entry, or `None` when the entry is
/// pruned (skip-listed directory) or has a non-UTF-8 name.
fn inspect_fs_entry(
    entry: &fs::DirEntry,
    root: &Path,
    skip: &SkipRules,
) -> Result<Option<Record>> {
    let name_os = entry.file_name();
    let name = match name_os.to_str() {
        Some(s) => s.to_owned(),
        None => return Ok(None),
    };
    let name_lower = name.to_lowercase();

    // file_type never follows symlinks; a symlink to a directory is
    // recorded as a file and never traversed.
    let file_type = entry.file_type()?;
    let is_dir = file_type.is_dir();

    if is_dir && skip.is_skipped(root, &name_lower) {
        return Ok(None);
    }

    let full_path = entry.path();
    let metadata = entry.metadata()?;
    let mtime_secs = to_unix_secs(metadata.modified().ok());

    let (kind, size, ext) = if is_dir {
        (RecordKind::Directory, 0, String::new())
    } else {
        let ext = full_path
            .extension()
            .and_then(|os| os.to_str())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default();
        (RecordKind::File, metadata.len(), ext)
    };

    Ok(Some(Record::new(
        kind, full_path, name, ext, size, mtime_secs,
    )))
}

fn to_unix_secs(t: Option<SystemTime>) -> u64 {
    t.and_then(|tt| tt.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;
