use std::{
    path::{Path, PathBuf},
    sync::Arc,
    thread,
};

use anyhow::{Context, Error, Result, bail};
use crossbeam::channel;
use log::{info, warn};

use scout_engine::{
    Catalog, DiffStats, Reconciler, SnapshotCompatibility, SnapshotMeta, load_snapshot,
    write_snapshot_atomic,
};
use scout_fs::{CancelToken, Record, ScanContext, SkipRules, walk_parallel};

/// Everything the catalog service needs at construction.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Roots to crawl; at least one must exist on disk
    pub roots: Vec<PathBuf>,
    /// Snapshot file path
    pub catalog_path: PathBuf,
    pub skip: SkipRules,
    /// Build on first use when no valid snapshot is found
    pub auto_build: bool,
}

pub fn create_scan_context(skip: SkipRules, cancel: CancelToken) -> Arc<ScanContext> {
    Arc::new(ScanContext { skip, cancel })
}

fn resolve_roots(roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let resolved: Vec<PathBuf> = roots.iter().filter(|r| r.is_dir()).cloned().collect();
    if resolved.is_empty() {
        bail!("no resolvable scan roots among {roots:?}");
    }
    for missing in roots.iter().filter(|r| !r.is_dir()) {
        warn!("[indexer] skipping unresolvable root {:?}", missing);
    }
    Ok(resolved)
}

/// Run the crawl on a background thread, handing each record batch to
/// `sink`. Shared plumbing for full builds and incremental refreshes.
fn scan_roots<F>(roots: Vec<PathBuf>, ctx: Arc<ScanContext>, mut sink: F) -> Result<()>
where
    F: FnMut(Vec<Record>),
{
    let (file_tx, file_rx) = channel::unbounded::<Vec<Record>>();

    let num_threads = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);

    let walker_handle = {
        let ctx = Arc::clone(&ctx);
        let tx = file_tx.clone();

        thread::spawn(move || walk_parallel(roots, tx, ctx, num_threads))
    };

    drop(file_tx);

    while let Ok(batch) = file_rx.recv() {
        sink(batch);
    }

    let walk_result = walker_handle
        .join()
        .map_err(|_| Error::msg("filesystem walker thread panicked"))?;
    walk_result?;

    if ctx.cancel.is_cancelled() {
        bail!("scan cancelled");
    }

    Ok(())
}

/// Full crawl into a fresh catalog.
pub fn build_catalog(roots: &[PathBuf], ctx: Arc<ScanContext>) -> Result<Catalog> {
    let roots = resolve_roots(roots)?;

    let mut catalog = Catalog::new();
    scan_roots(roots, ctx, |batch| {
        for record in batch {
            catalog.insert(record);
        }
    })?;

    info!("[indexer] full scan produced {} records", catalog.len());
    Ok(catalog)
}

/// Incremental pass: crawl `roots` and reconcile into a detached copy
/// of `base`, leaving `base` untouched so in-flight readers keep a
/// consistent view until the copy is published.
pub fn refresh_catalog(
    base: &Catalog,
    roots: &[PathBuf],
    ctx: Arc<ScanContext>,
) -> Result<(Catalog, DiffStats)> {
    let roots = resolve_roots(roots)?;

    let mut working = base.clone();
    let mut reconciler = Reconciler::new(&mut working);
    scan_roots(roots.clone(), ctx, |batch| {
        reconciler.observe_batch(batch);
    })?;
    let stats = reconciler.finish(&roots);

    info!(
        "[indexer] refresh: +{} ~{} -{} ={}",
        stats.added, stats.updated, stats.removed, stats.unchanged
    );
    Ok((working, stats))
}

/// Write the snapshot after a build or update completes.
pub fn persist_catalog(path: &Path, meta: &SnapshotMeta, catalog: &Catalog) -> Result<()> {
    write_snapshot_atomic(path, meta, catalog)
        .with_context(|| format!("Failed to write catalog snapshot to {}", path.display()))
}

/// Load a compatible snapshot, or build from scratch.
///
/// Any logical snapshot problem (missing, corrupt, version or
/// skip-rule mismatch) falls back to a full crawl when `auto_build`
/// is set; with it unset the service starts empty. Only
/// configuration-level faults return an error.
pub fn open_or_build(config: &CatalogConfig, cancel: CancelToken) -> Result<(Catalog, SnapshotMeta)> {
    let skip_dirs = config.skip.sorted_names();

    match load_snapshot(&config.catalog_path, &skip_dirs)
        .with_context(|| format!("Failed to probe snapshot at {}", config.catalog_path.display()))?
    {
        SnapshotCompatibility::Loaded { meta, catalog } => {
            info!(
                "[indexer] loaded snapshot: {} records, last update {}",
                catalog.len(),
                meta.updated_display()
            );
            return Ok((catalog, meta));
        }
        SnapshotCompatibility::Missing => {
            info!("[indexer] no snapshot at {}", config.catalog_path.display());
        }
        SnapshotCompatibility::Corrupt => {
            warn!(
                "[indexer] snapshot at {} is corrupt; rebuilding",
                config.catalog_path.display()
            );
        }
        SnapshotCompatibility::VersionMismatch { on_disk, expected } => {
            warn!(
                "[indexer] snapshot format v{on_disk} != expected v{expected}; rebuilding"
            );
        }
        SnapshotCompatibility::SkipRulesMismatch { .. } => {
            warn!("[indexer] skip-dir policy changed; rebuilding");
        }
    }

    if !config.auto_build {
        info!("[indexer] auto-build disabled; starting with an empty catalog");
        let meta = SnapshotMeta::new(config.roots.clone(), skip_dirs, 0);
        return Ok((Catalog::new(), meta));
    }

    let ctx = create_scan_context(config.skip.clone(), cancel);
    let catalog = build_catalog(&config.roots, ctx)?;
    let meta = SnapshotMeta::new(config.roots.clone(), skip_dirs, catalog.len() as u64);
    persist_catalog(&config.catalog_path, &meta, &catalog)?;

    Ok((catalog, meta))
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
