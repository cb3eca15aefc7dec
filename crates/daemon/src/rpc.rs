use std::fs;
use std::io;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::Path;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use anyhow::Context;
use log::{debug, error, info};
use scout_protocol::codec::{read_message, write_message};
use scout_protocol::{DaemonRequest, DaemonResponse, StatusReport};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::flag;

use crate::search::execute_search;
use crate::state::DaemonState;

/// RAII guard that ensures the Unix socket file is removed on shutdown,
/// even if we return early or panic.
struct SocketGuard<'a> {
    path: &'a Path,
}

impl<'a> Drop for SocketGuard<'a> {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(self.path) {
            if err.kind() != io::ErrorKind::NotFound {
                error!(
                    "Failed to remove Unix socket at {} on shutdown: {err}",
                    self.path.display()
                );
            }
        }
    }
}

pub fn run_rpc_server(state: Arc<DaemonState>) -> anyhow::Result<()> {
    let socket_path = &state.config.socket_path;

    let shutdown = Arc::new(AtomicBool::new(false));

    // Register signal handlers. They only set the atomic flag
    for sig in [SIGINT, SIGTERM] {
        flag::register(sig, Arc::clone(&shutdown))
            .with_context(|| format!("Failed to register signal handler for {sig}"))?;
    }

    // Clean up stale socket if it exists.
    if socket_path.exists() {
        fs::remove_file(socket_path).with_context(|| {
            format!(
                "Failed to remove existing socket at {}",
                socket_path.display()
            )
        })?;
    }

    if let Some(parent) = socket_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create socket dir {}", parent.display()))?;
    }

    let listener = UnixListener::bind(socket_path)
        .with_context(|| format!("Failed to bind Unix socket at {}", socket_path.display()))?;

    // Ensure socket is cleaned up on any exit path.
    let _socket_guard = SocketGuard {
        path: socket_path.as_path(),
    };

    info!("scout daemon listening on {}", socket_path.display());

    loop {
        // Fast path: if shutdown already requested, stop accepting.
        if shutdown.load(Ordering::Relaxed) {
            info!("Shutdown signal observed; stopping RPC server.");
            state.cancel_scans();
            break;
        }

        match listener.accept() {
            Ok((stream, _addr)) => {
                let state = state.clone();
                std::thread::spawn(move || {
                    if let Err(err) = handle_client(stream, state) {
                        error!("Error while handling client: {err:#}");
                    }
                });
            }
            Err(ref err) if err.kind() == io::ErrorKind::Interrupted => {
                // System call interrupted by signal
                if shutdown.load(Ordering::Relaxed) {
                    info!("Accept interrupted by shutdown signal; exiting accept loop.");
                    state.cancel_scans();
                    break;
                }
                // Spurious EINTR... retry
                continue;
            }
            Err(err) => {
                // Non-EINTR errors: log and decide whether to break or continue.
                error!("Accept error: {err}");
                continue;
            }
        }
    }

    info!("RPC server shutdown complete.");
    Ok(())
}

fn handle_client(mut stream: UnixStream, state: Arc<DaemonState>) -> anyhow::Result<()> {
    let request: DaemonRequest =
        read_message(&mut stream).context("Failed to read DaemonRequest")?;

    debug!("Received request: {:?}", request);

    let response = match request {
        DaemonRequest::Ping => DaemonResponse::Pong,
        DaemonRequest::Status => DaemonResponse::Status(status_report(&state)),
        DaemonRequest::Search(req) => {
            // Searches run against whichever catalog version was
            // current when they started.
            DaemonResponse::SearchResult(execute_search(&state.current_catalog(), &req))
        }
        DaemonRequest::Reload => match state.reload() {
            Ok(stats) => DaemonResponse::ReloadResult(stats),
            Err(e) => DaemonResponse::Error(format!("Reload failed: {e:#}")),
        },
        DaemonRequest::Rebuild => match state.rebuild() {
            Ok(stats) => DaemonResponse::ReloadResult(stats),
            Err(e) => DaemonResponse::Error(format!("Rebuild failed: {e:#}")),
        },
    };

    write_message(&mut stream, &response).context("Failed to write DaemonResponse")
}

fn status_report(state: &DaemonState) -> StatusReport {
    let catalog = state.current_catalog();
    let meta = state.current_meta();

    StatusReport {
        roots: state
            .config
            .roots
            .iter()
            .map(|r| r.display().to_string())
            .collect(),
        catalog_path: state.config.catalog_path.display().to_string(),
        files: catalog.file_count(),
        directories: catalog.dir_count(),
        last_update: meta.updated_display(),
    }
}
