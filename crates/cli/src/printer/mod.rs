use std::io::{self, Write};

use scout_protocol::SearchHit;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output with optional colors.
    #[default]
    Human,
    /// NDJSON (newline-delimited JSON) for machine consumption.
    Json,
}

/// Color handling strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorChoice {
    /// Automatically detect TTY and enable colors if appropriate.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

/// Configuration for printing search results.
#[derive(Debug, Clone)]
pub struct PrinterConfig {
    /// Output format (human or JSON).
    pub format: OutputFormat,
    /// Color handling strategy.
    pub color: ColorChoice,
    /// Maximum number of results to print.
    pub limit: usize,
    /// Whether to show the result summary on stderr.
    pub show_summary: bool,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: ColorChoice::Auto,
            limit: 100,
            show_summary: true,
        }
    }
}

/// Render a byte count the way the human listing shows sizes.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < MB {
        format!("{:.2} KB", b / KB)
    } else if b < GB {
        format!("{:.2} MB", b / MB)
    } else {
        format!("{:.2} GB", b / GB)
    }
}

/// Static context about a print run.
#[derive(Debug)]
pub struct SearchPrintContext<'a> {
    /// Original keyword phrase.
    pub keywords: &'a str,
    /// Total number of matches (before limit).
    pub total: usize,
    /// Whether output was truncated due to limit.
    pub truncated: bool,
}

/// Trait for printing search results.
///
/// Implementations receive a stream of hits and context, and are responsible
/// for formatting and outputting them appropriately.
pub trait SearchPrinter {
    /// Called once before any rows are printed.
    fn begin(&mut self, ctx: &SearchPrintContext) -> io::Result<()>;

    /// Called for each result row.
    fn print_row(&mut self, hit: &SearchHit, ctx: &SearchPrintContext) -> io::Result<()>;

    /// Called once after all rows are printed.
    ///
    /// Use this for footers and summaries.
    fn finish(&mut self, ctx: &SearchPrintContext) -> io::Result<()>;
}

/// Human-readable printer with optional color support.
pub struct HumanPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
    use_color: bool,
}

impl<W: Write, E: Write> HumanPrinter<W, E> {
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        let use_color = match cfg.color {
            ColorChoice::Always => true,
            // Auto with arbitrary writers cannot probe for a TTY, so it
            // stays plain; `stdout` does the probe for the real terminal.
            ColorChoice::Never | ColorChoice::Auto => false,
        };

        Self {
            out,
            err,
            cfg,
            use_color,
        }
    }

    /// Create a printer that writes to stdout and stderr with TTY detection.
    pub fn stdout(cfg: PrinterConfig) -> HumanPrinter<io::Stdout, io::Stderr> {
        use std::io::IsTerminal;

        let use_color = match cfg.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => io::stdout().is_terminal(),
        };

        HumanPrinter {
            out: io::stdout(),
            err: io::stderr(),
            cfg,
            use_color,
        }
    }

    #[inline]
    fn format_path(&self, path: &str, is_dir: bool) -> String {
        if self.use_color && is_dir {
            format!("\x1b[34m{}\x1b[0m", path)
        } else if self.use_color {
            format!("\x1b[32m{}\x1b[0m", path)
        } else {
            path.to_owned()
        }
    }
}

impl<W: Write, E: Write> SearchPrinter for HumanPrinter<W, E> {
    fn begin(&mut self, _ctx: &SearchPrintContext) -> io::Result<()> {
        Ok(())
    }

    fn print_row(&mut self, hit: &SearchHit, _ctx: &SearchPrintContext) -> io::Result<()> {
        let size = if hit.is_dir {
            "<DIR>".to_owned()
        } else {
            format_size(hit.size)
        };
        let path = self.format_path(&hit.path, hit.is_dir);
        writeln!(self.out, "{:>10}  {}  {}", size, hit.mtime, path)
    }

    fn finish(&mut self, ctx: &SearchPrintContext) -> io::Result<()> {
        if ctx.truncated {
            let remaining = ctx.total.saturating_sub(self.cfg.limit);
            writeln!(self.out, "... and {} more results", remaining)?;
        }

        if self.cfg.show_summary {
            writeln!(self.err, "\n[search] {} results", ctx.total)?;
        }

        Ok(())
    }
}

pub struct JsonPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
}

impl<W: Write, E: Write> JsonPrinter<W, E> {
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        Self { out, err, cfg }
    }

    /// Create a printer that writes to stdout and stderr.
    pub fn stdout(cfg: PrinterConfig) -> JsonPrinter<io::Stdout, io::Stderr> {
        JsonPrinter {
            out: io::stdout(),
            err: io::stderr(),
            cfg,
        }
    }
}

impl<W: Write, E: Write> SearchPrinter for JsonPrinter<W, E> {
    fn begin(&mut self, _ctx: &SearchPrintContext) -> io::Result<()> {
        Ok(())
    }

    fn print_row(&mut self, hit: &SearchHit, _ctx: &SearchPrintContext) -> io::Result<()> {
        let obj = serde_json::json!({
            "path": hit.path,
            "name": hit.name,
            "is_dir": hit.is_dir,
            "size": hit.size,
            "mtime_secs": hit.mtime_secs,
            "mtime": hit.mtime,
        });
        writeln!(self.out, "{}", obj)
    }

    fn finish(&mut self, ctx: &SearchPrintContext) -> io::Result<()> {
        if self.cfg.show_summary {
            let obj = serde_json::json!({
                "type": "summary",
                "keywords": ctx.keywords,
                "total": ctx.total,
                "truncated": ctx.truncated,
            });
            writeln!(self.err, "{}", obj)?;
        }

        Ok(())
    }
}
