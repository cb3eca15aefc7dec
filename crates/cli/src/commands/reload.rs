use std::process::ExitCode;

use anyhow::anyhow;
use clap::Args;
use scout_protocol::codec::{read_message, write_message};
use scout_protocol::{DaemonRequest, DaemonResponse};

use crate::commands::{CommandResult, ConnectOptions};

#[derive(Debug, Args)]
pub struct ReloadArgs {
    #[command(flatten)]
    pub connect: ConnectOptions,
}

/// Shared by `reload` and `rebuild`; only the request differs.
pub fn run(args: ReloadArgs, rebuild: bool) -> ExitCode {
    match execute(&args, rebuild) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[error] {e}");
            ExitCode::from(2)
        }
    }
}

fn execute(args: &ReloadArgs, rebuild: bool) -> CommandResult<ExitCode> {
    let mut stream = args.connect.connect()?;

    let req = if rebuild {
        DaemonRequest::Rebuild
    } else {
        DaemonRequest::Reload
    };
    write_message(&mut stream, &req)?;
    let resp: DaemonResponse = read_message(&mut stream)?;

    match resp {
        DaemonResponse::ReloadResult(stats) => {
            println!(
                "{} entries: {} added, {} updated, {} removed, {} unchanged",
                stats.total, stats.added, stats.updated, stats.removed, stats.unchanged
            );
            Ok(ExitCode::from(0))
        }
        DaemonResponse::Error(msg) => Err(anyhow!("daemon error: {msg}").into()),
        other => Err(anyhow!("unexpected daemon response: {other:?}").into()),
    }
}
