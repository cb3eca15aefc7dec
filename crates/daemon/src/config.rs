use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use scout_fs::SkipRules;
use scout_runtime::{default_catalog_path, default_scan_roots, default_socket_path};

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub roots: Vec<PathBuf>,
    /// Path to the catalog snapshot
    pub catalog_path: PathBuf,
    // Unix domain socket path
    pub socket_path: PathBuf,
    pub skip: SkipRules,
    pub auto_build: bool,
}

#[derive(Debug, Parser)]
#[command(name = "scout-daemon", about = "Scout Daemon")]
pub struct Cli {
    /// Root directories to catalog (defaults to the home directory)
    #[arg(long = "root")]
    pub roots: Vec<PathBuf>,

    /// Path to the catalog snapshot file (optional override)
    #[arg(long)]
    pub catalog_path: Option<PathBuf>,

    /// Path to Unix domain socket (optional override)
    #[arg(long)]
    pub socket_path: Option<PathBuf>,

    /// Additional directory names to skip, on top of the defaults
    #[arg(long = "skip")]
    pub skip_names: Vec<String>,

    /// Replace the built-in skip-dir defaults instead of extending them
    #[arg(long)]
    pub no_default_skips: bool,

    /// Do not crawl at startup when no valid snapshot exists
    #[arg(long)]
    pub no_auto_build: bool,
}

impl DaemonConfig {
    pub fn from_args(args: &Cli) -> Result<Self> {
        let roots = if args.roots.is_empty() {
            default_scan_roots()
        } else {
            args.roots.clone()
        };

        let mut skip = if args.no_default_skips {
            SkipRules::empty()
        } else {
            SkipRules::with_defaults()
        };
        for name in &args.skip_names {
            skip.add_global(name);
        }

        Ok(Self {
            roots,
            catalog_path: args.catalog_path.clone().unwrap_or_else(default_catalog_path),
            socket_path: args.socket_path.clone().unwrap_or_else(default_socket_path),
            skip,
            auto_build: !args.no_auto_build,
        })
    }

    pub fn from_env() -> Result<Self> {
        let args = Cli::parse();
        Self::from_args(&args)
    }
}
