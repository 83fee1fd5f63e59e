//! Logging for a single `tax-estimator` run.
//!
//! The subscriber is assembled once from [`LogOptions`]: one filter for the
//! whole process, an optional stderr layer and an optional append-only file
//! layer. Stdout is left to reports and JSON.

use std::{
    env,
    fs::File,
    io::{self, IsTerminal},
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        self, FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Level used when neither the flags, the configuration nor `RUST_LOG` set one.
pub const DEFAULT_LEVEL: &str = "warn";

/// Logging choices gathered from the command line and the configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// `--log-level`.
    pub level_flag: Option<String>,
    /// `log_level` from the config file, or `TAX_ESTIMATOR_LOG`.
    pub configured_level: Option<String>,
    /// Drop the stderr layer.
    pub quiet: bool,
    pub file: Option<PathBuf>,
}

// --- Formatter ---

struct LocalFmt {
    time_format: &'static str,
    show_target: bool,
}

const CONSOLE_FORMAT: LocalFmt = LocalFmt {
    time_format: "%H:%M:%S%.3f",
    show_target: false,
};

const FILE_FORMAT: LocalFmt = LocalFmt {
    time_format: "%Y-%m-%dT%H:%M:%S%.6f%:z",
    show_target: true,
};

fn level_color(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "\x1b[1;31m",
        Level::WARN => "\x1b[1;33m",
        Level::INFO => "\x1b[1;32m",
        Level::DEBUG => "\x1b[1;34m",
        Level::TRACE => "\x1b[1;35m",
    }
}

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let timestamp = Local::now().format(self.time_format);

        if writer.has_ansi_escapes() {
            write!(
                writer,
                "\x1b[2m{timestamp}\x1b[0m {}{:>5}\x1b[0m ",
                level_color(meta.level()),
                meta.level()
            )?;
        } else {
            write!(writer, "{timestamp} {:>5} ", meta.level())?;
        }
        if self.show_target {
            write!(writer, "{} ", meta.target())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

// --- Filter ---

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Picks the filter directive: `--log-level`, then the configured level,
/// then `RUST_LOG`, then [`DEFAULT_LEVEL`].
///
/// A bad flag or configured level is an error. A bad `RUST_LOG` is ignored
/// so an unrelated environment cannot stop the estimator.
fn select_directive(
    options: &LogOptions,
    rust_log: Option<&str>,
) -> Result<String> {
    let requested = non_empty(options.level_flag.as_deref())
        .or_else(|| non_empty(options.configured_level.as_deref()));
    if let Some(level) = requested {
        EnvFilter::try_new(level).map_err(|e| anyhow!("invalid log level '{level}': {e}"))?;
        return Ok(level.to_string());
    }

    Ok(match non_empty(rust_log) {
        Some(directive) if EnvFilter::try_new(directive).is_ok() => directive.to_string(),
        _ => DEFAULT_LEVEL.to_string(),
    })
}

fn open_log_file(path: &Path) -> Result<File> {
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))
}

// --- Public API ---

/// Installs the global subscriber. Call once, before any command runs.
///
/// - Console: stderr, colored when attached to a terminal, absent with `quiet`.
/// - File: appended to with full timestamps and targets when `file` is set.
///   The directory must already exist.
pub fn init_logging(options: &LogOptions) -> Result<()> {
    let rust_log = env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = select_directive(options, rust_log.as_deref())?;
    let filter = EnvFilter::try_new(&directive)
        .map_err(|e| anyhow!("invalid log level '{directive}': {e}"))?;

    let console = (!options.quiet).then(|| {
        fmt::layer()
            .event_format(CONSOLE_FORMAT)
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
    });

    let file = match options.file.as_deref() {
        Some(path) => Some(
            fmt::layer()
                .event_format(FILE_FORMAT)
                .with_ansi(false)
                .with_writer(Mutex::new(open_log_file(path)?)),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .context("logging is already initialized")
}
