use std::process::ExitCode;

use clap::Parser;

mod commands;
mod printer;

use commands::Command;
use scout_runtime::logging;

#[derive(Debug, Parser)]
#[command(name = "scout", version, about = "Fast File Catalog Search")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

fn main() -> ExitCode {
    logging::init().ok();

    let cli = Cli::parse();
    match cli.command {
        Command::Search(args) => commands::search::run(args),
        Command::Reload(args) => commands::reload::run(args, false),
        Command::Rebuild(args) => commands::reload::run(args, true),
        Command::Status(args) => commands::status::run(args),
    }
}
