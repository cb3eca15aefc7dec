use std::path::PathBuf;

pub const PROGRAM_NAME: &str = "scout";
pub const PROGRAM_LOG_LEVEL: &str = "SCOUT_LOG_LEVEL";
pub const CATALOG_FILE_NAME: &str = "catalog.bin";

pub fn xdg_or_home(xdg_var: &str, home_suffix: &str) -> PathBuf {
    if let Some(dir) = std::env::var_os(xdg_var) {
        PathBuf::from(dir)
    } else {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(home_suffix)
    }
}

/// Default root set for the catalog when the operator configures none:
/// the home directory, falling back to the working directory.
pub fn default_scan_roots() -> Vec<PathBuf> {
    let root = dirs::home_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    vec![root]
}

pub fn scout_dir() -> PathBuf {
    xdg_or_home("XDG_CACHE_HOME", ".cache").join(PROGRAM_NAME)
}

/// Default snapshot file path
pub fn default_catalog_path() -> PathBuf {
    scout_dir().join(CATALOG_FILE_NAME)
}

/// Default Unix domain socket path for the daemon
pub fn default_socket_path() -> PathBuf {
    scout_dir().join("daemon.sock")
}

/// Directory base names pruned from every scan unless overridden.
/// All entries are lowercase; matching is case-insensitive.
#[cfg(windows)]
pub const DEFAULT_SKIP_DIR_NAMES: &[&str] = &[
    "windows",
    "$recycle.bin",
    "system volume information",
    "programdata",
    "node_modules",
];

#[cfg(not(windows))]
pub const DEFAULT_SKIP_DIR_NAMES: &[&str] = &[
    ".trash",
    ".trashes",
    ".cache",
    "lost+found",
    "node_modules",
];
