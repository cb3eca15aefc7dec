mod config;
pub mod logging;

pub use config::{
    DEFAULT_SKIP_DIR_NAMES, default_catalog_path, default_scan_roots, scout_dir,
    default_socket_path,
};

pub use config::{CATALOG_FILE_NAME, PROGRAM_LOG_LEVEL, PROGRAM_NAME};

pub use logging::init;
