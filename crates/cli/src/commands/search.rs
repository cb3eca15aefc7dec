use std::io::{Stderr, Stdout};
use std::process::ExitCode;

use anyhow::anyhow;
use clap::Args;
use scout_protocol::codec::{read_message, write_message};
use scout_protocol::{
    Category, DaemonRequest, DaemonResponse, MatchMode, SearchRequest, SortDirection, SortKey,
};

use crate::commands::{CommandResult, ConnectOptions};
use crate::printer::{
    ColorChoice, HumanPrinter, JsonPrinter, OutputFormat, PrinterConfig, SearchPrintContext,
    SearchPrinter,
};

#[derive(Debug, Args)]
pub struct OutputOptions {
    /// Output results as NDJSON (one JSON object per line)
    #[arg(long)]
    pub json: bool,

    /// When to use colors: auto, always, never
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: String,

    /// Suppress the result summary
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl OutputOptions {
    /// Create a printer based on the output options.
    pub fn make_printer(&self, limit: usize) -> Box<dyn SearchPrinter> {
        let format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        };

        let color = match self.color.as_str() {
            "always" => ColorChoice::Always,
            "never" => ColorChoice::Never,
            _ => ColorChoice::Auto,
        };

        let cfg = PrinterConfig {
            format,
            color,
            limit,
            show_summary: !self.quiet,
        };

        match format {
            OutputFormat::Human => Box::new(HumanPrinter::<Stdout, Stderr>::stdout(cfg)),
            OutputFormat::Json => Box::new(JsonPrinter::<Stdout, Stderr>::stdout(cfg)),
        }
    }
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Keywords to match against file names (all must match by default)
    #[arg(required = true)]
    pub keywords: Vec<String>,

    /// Match if any keyword matches instead of all
    #[arg(long)]
    pub any: bool,

    /// Restrict to a category: image, document, video, audio, archive,
    /// code, executable, folder, other
    #[arg(long, value_name = "NAME")]
    pub category: Option<String>,

    /// Minimum size in bytes (inclusive)
    #[arg(long, value_name = "BYTES")]
    pub min_size: Option<u64>,

    /// Maximum size in bytes (inclusive)
    #[arg(long, value_name = "BYTES")]
    pub max_size: Option<u64>,

    /// Only entries modified at or after this unix timestamp
    #[arg(long, value_name = "SECS")]
    pub after: Option<u64>,

    /// Only entries modified at or before this unix timestamp
    #[arg(long, value_name = "SECS")]
    pub before: Option<u64>,

    /// Sort key: time, size, name
    #[arg(long, value_name = "KEY", default_value = "time")]
    pub sort: String,

    /// Sort ascending instead of descending
    #[arg(long)]
    pub asc: bool,

    /// Maximum number of results to display
    #[arg(long, short = 'n', default_value = "50")]
    pub limit: usize,

    /// Output formatting options
    #[command(flatten)]
    pub output: OutputOptions,

    #[command(flatten)]
    pub connect: ConnectOptions,
}

impl SearchArgs {
    fn to_request(&self) -> CommandResult<SearchRequest> {
        let category = match &self.category {
            Some(name) => Some(
                Category::parse(name)
                    .ok_or_else(|| anyhow!("unknown category: {name}"))?,
            ),
            None => None,
        };

        let sort_key = match self.sort.as_str() {
            "time" => SortKey::LastWrite,
            "size" => SortKey::Size,
            "name" => SortKey::Name,
            other => return Err(anyhow!("unknown sort key: {other}").into()),
        };

        Ok(SearchRequest {
            keywords: self.keywords.join(" "),
            match_mode: if self.any {
                MatchMode::Any
            } else {
                MatchMode::All
            },
            category,
            min_size: self.min_size,
            max_size: self.max_size,
            min_time: self.after,
            max_time: self.before,
            sort_key,
            sort_direction: if self.asc {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            },
            limit: Some(self.limit),
        })
    }
}

pub fn run(args: SearchArgs) -> ExitCode {
    match execute(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[error] {e}");
            ExitCode::from(2)
        }
    }
}

fn execute(args: &SearchArgs) -> CommandResult<ExitCode> {
    let req = args.to_request()?;
    let keywords = req.keywords.clone();

    let mut stream = args.connect.connect()?;
    log::debug!("sending search request: {keywords:?}");
    write_message(&mut stream, &DaemonRequest::Search(req))?;
    let resp: DaemonResponse = read_message(&mut stream)?;

    match resp {
        DaemonResponse::SearchResult(sr) => {
            let mut printer = args.output.make_printer(args.limit);

            let total = sr.total as usize;
            let truncated = total > args.limit;

            let ctx = SearchPrintContext {
                keywords: &keywords,
                total,
                truncated,
            };

            printer.begin(&ctx)?;
            for hit in &sr.hits {
                printer.print_row(hit, &ctx)?;
            }
            printer.finish(&ctx)?;

            Ok(ExitCode::from(0))
        }
        DaemonResponse::Error(msg) => Err(anyhow!("daemon error: {msg}").into()),
        other => Err(anyhow!("unexpected daemon response: {other:?}").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args(keywords: &[&str]) -> SearchArgs {
        SearchArgs {
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            any: false,
            category: None,
            min_size: None,
            max_size: None,
            after: None,
            before: None,
            sort: "time".to_owned(),
            asc: false,
            limit: 50,
            output: OutputOptions {
                json: false,
                color: "never".to_owned(),
                quiet: true,
            },
            connect: ConnectOptions { socket_path: None },
        }
    }

    #[test]
    fn keywords_join_into_one_phrase() {
        let req = base_args(&["foo", "bar"]).to_request().unwrap();
        assert_eq!(req.keywords, "foo bar");
        assert_eq!(req.match_mode, MatchMode::All);
        assert_eq!(req.limit, Some(50));
    }

    #[test]
    fn any_flag_switches_match_mode() {
        let mut args = base_args(&["foo"]);
        args.any = true;
        let req = args.to_request().unwrap();
        assert_eq!(req.match_mode, MatchMode::Any);
    }

    #[test]
    fn category_and_sort_parse() {
        let mut args = base_args(&["x"]);
        args.category = Some("document".to_owned());
        args.sort = "size".to_owned();
        args.asc = true;
        let req = args.to_request().unwrap();
        assert_eq!(req.category, Some(Category::Document));
        assert_eq!(req.sort_key, SortKey::Size);
        assert_eq!(req.sort_direction, SortDirection::Ascending);
    }

    #[test]
    fn bad_category_is_rejected() {
        let mut args = base_args(&["x"]);
        args.category = Some("spreadsheet".to_owned());
        assert!(args.to_request().is_err());
    }

    #[test]
    fn bad_sort_key_is_rejected() {
        let mut args = base_args(&["x"]);
        args.sort = "rank".to_owned();
        assert!(args.to_request().is_err());
    }
}
