mod cancel;
mod config;
mod record;
mod skip;
mod walker;

pub use cancel::CancelToken;
pub use config::BATCH_SIZE;
pub use record::{Fingerprint, Record, RecordKind};
pub use skip::SkipRules;
pub use walker::{ScanContext, walk_parallel};
