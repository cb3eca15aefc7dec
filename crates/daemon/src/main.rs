use std::sync::Arc;

mod config;
mod rpc;
mod search;
mod state;

use config::DaemonConfig;
use scout_runtime::logging;
use state::DaemonState;

use log::info;

fn main() -> anyhow::Result<()> {
    logging::init().ok();

    let config = DaemonConfig::from_env()?;

    info!(
        "Starting scout daemon: roots={:?}, catalog={}, socket={}",
        config.roots,
        config.catalog_path.display(),
        config.socket_path.display(),
    );

    let state = Arc::new(DaemonState::new(config)?);
    rpc::run_rpc_server(state)
}
