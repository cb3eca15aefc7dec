use std::process::ExitCode;

use anyhow::anyhow;
use clap::Args;
use scout_protocol::codec::{read_message, write_message};
use scout_protocol::{DaemonRequest, DaemonResponse};

use crate::commands::{CommandResult, ConnectOptions};

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub connect: ConnectOptions,
}

pub fn run(args: StatusArgs) -> ExitCode {
    match execute(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[error] {e}");
            ExitCode::from(2)
        }
    }
}

fn execute(args: &StatusArgs) -> CommandResult<ExitCode> {
    let mut stream = args.connect.connect()?;
    write_message(&mut stream, &DaemonRequest::Status)?;
    let resp: DaemonResponse = read_message(&mut stream)?;

    match resp {
        DaemonResponse::Status(report) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("roots:       {}", report.roots.join(", "));
                println!("catalog:     {}", report.catalog_path);
                println!("files:       {}", report.files);
                println!("directories: {}", report.directories);
                println!("last update: {}", report.last_update);
            }
            Ok(ExitCode::from(0))
        }
        DaemonResponse::Error(msg) => Err(anyhow!("daemon error: {msg}").into()),
        other => Err(anyhow!("unexpected daemon response: {other:?}").into()),
    }
}
