mod catalog;
mod diff;
mod persist;
mod query;

pub use catalog::Catalog;
pub use diff::{DiffStats, Reconciler};
pub use persist::{
    SNAPSHOT_MAGIC, SNAPSHOT_VERSION, SnapshotCompatibility, SnapshotMeta, load_snapshot,
    write_snapshot_atomic,
};
pub use query::run_search;
