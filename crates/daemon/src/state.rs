use std::sync::{Arc, Mutex, RwLock};

use anyhow::Result;
use log::info;
use scout_engine::{Catalog, SnapshotMeta};
use scout_fs::CancelToken;
use scout_indexer::{
    CatalogConfig, build_catalog, create_scan_context, open_or_build, persist_catalog,
    refresh_catalog,
};
use scout_protocol::ReloadStats;

use crate::config::DaemonConfig;

/// Owns the published catalog. Searches take an `Arc` snapshot and
/// keep using it even while a rebuild publishes a replacement; builds
/// work on detached catalogs and swap them in whole.
pub struct DaemonState {
    pub config: DaemonConfig,
    catalog: RwLock<Arc<Catalog>>,
    meta: RwLock<SnapshotMeta>,
    cancel: CancelToken,
    /// Serializes builds so two reload/rebuild requests never persist
    /// interleaved snapshots.
    build_lock: Mutex<()>,
}

impl DaemonState {
    pub fn new(config: DaemonConfig) -> Result<Self> {
        let cancel = CancelToken::new();
        let (catalog, meta) = open_or_build(&catalog_config(&config), cancel.clone())?;

        Ok(Self {
            config,
            catalog: RwLock::new(Arc::new(catalog)),
            meta: RwLock::new(meta),
            cancel,
            build_lock: Mutex::new(()),
        })
    }

    pub fn current_catalog(&self) -> Arc<Catalog> {
        self.catalog.read().unwrap().clone()
    }

    pub fn current_meta(&self) -> SnapshotMeta {
        self.meta.read().unwrap().clone()
    }

    /// Signals any in-flight crawl to stop at the next directory.
    pub fn cancel_scans(&self) {
        self.cancel.cancel();
    }

    /// Incremental pass over the configured roots, persisted and then
    /// published.
    pub fn reload(&self) -> Result<ReloadStats> {
        let _guard = self.build_lock.lock().unwrap();
        let base = self.current_catalog();
        let ctx = create_scan_context(self.config.skip.clone(), self.cancel.clone());

        let (updated, stats) = refresh_catalog(&base, &self.config.roots, ctx)?;
        let total = updated.len() as u64;

        self.publish(updated)?;
        info!(
            "[daemon] reload done: +{} ~{} -{} ({} records)",
            stats.added, stats.updated, stats.removed, total
        );

        Ok(ReloadStats {
            added: stats.added,
            updated: stats.updated,
            removed: stats.removed,
            unchanged: stats.unchanged,
            total,
        })
    }

    /// Forced full re-crawl, replacing the catalog wholesale.
    pub fn rebuild(&self) -> Result<ReloadStats> {
        let _guard = self.build_lock.lock().unwrap();
        let ctx = create_scan_context(self.config.skip.clone(), self.cancel.clone());
        let rebuilt = build_catalog(&self.config.roots, ctx)?;
        let total = rebuilt.len() as u64;

        self.publish(rebuilt)?;
        info!("[daemon] rebuild done: {total} records");

        Ok(ReloadStats {
            added: total,
            total,
            ..Default::default()
        })
    }

    /// Persist the detached catalog, then atomically swap it in as the
    /// version seen by subsequent searches.
    fn publish(&self, catalog: Catalog) -> Result<()> {
        let mut meta = self.current_meta();
        meta.touch(catalog.len() as u64);
        persist_catalog(&self.config.catalog_path, &meta, &catalog)?;

        *self.meta.write().unwrap() = meta;
        *self.catalog.write().unwrap() = Arc::new(catalog);
        Ok(())
    }
}

fn catalog_config(config: &DaemonConfig) -> CatalogConfig {
    CatalogConfig {
        roots: config.roots.clone(),
        catalog_path: config.catalog_path.clone(),
        skip: config.skip.clone(),
        auto_build: config.auto_build,
    }
}
