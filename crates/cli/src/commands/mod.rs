pub mod reload;
pub mod search;
pub mod status;

use std::os::unix::net::UnixStream;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Subcommand};
pub use reload::ReloadArgs;
pub use search::SearchArgs;
pub use status::StatusArgs;
use scout_runtime::default_socket_path;

/// Common error type for command handlers.
pub type CommandResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search the catalog by keyword, category, size and time.
    ///
    /// Example:
    ///   scout search report --category document
    ///   scout search -n 50 --any budget invoice
    Search(SearchArgs),

    /// Incrementally re-scan the configured roots.
    Reload(ReloadArgs),

    /// Discard the catalog and scan everything from scratch.
    Rebuild(ReloadArgs),

    /// Show catalog counts and the last update time.
    Status(StatusArgs),
}

/// Socket selection shared by every subcommand.
#[derive(Debug, Args)]
pub struct ConnectOptions {
    /// Path to the daemon socket (defaults to the scout cache dir)
    #[arg(long, value_name = "PATH")]
    pub socket_path: Option<PathBuf>,
}

impl ConnectOptions {
    pub fn connect(&self) -> CommandResult<UnixStream> {
        let socket_path = self
            .socket_path
            .clone()
            .unwrap_or_else(default_socket_path);

        let stream = UnixStream::connect(&socket_path).with_context(|| {
            format!(
                "failed to connect to scout daemon at {}",
                socket_path.display()
            )
        })?;
        Ok(stream)
    }
}
