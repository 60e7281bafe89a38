//! Diagnostics for the CLI: level selection, the subscriber and fatal reports.
//!
//! Everything here writes to standard error. Standard output only carries the
//! run summary, so it stays clean when piped.

use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_indicatif::IndicatifLayer;
use tracing_indicatif::style::ProgressStyle;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

use super::LogArgs;

//================================================================================================
// Statics
//================================================================================================

/// Cleared once diagnostics are known to leave the terminal.
static ANSI: AtomicBool = AtomicBool::new(true);

const FATAL_STYLED: &str = "\x1b[35mFATAL\x1b[0m";
const FATAL_PLAIN: &str = "FATAL";

//================================================================================================
// Types
//================================================================================================

/// How diagnostics are rendered on standard error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    /// Compact lines sharing the terminal with the build progress bar.
    Terminal,
    /// One JSON object per event, for CI logs and redirected output.
    Json,
}

impl Format {
    fn detect() -> Self {
        if std::io::stderr().is_terminal() {
            Format::Terminal
        } else {
            Format::Json
        }
    }
}

//================================================================================================
// Macros
//================================================================================================

/// Log a run-ending error together with its chain of causes.
#[macro_export]
macro_rules! fatal {
    ($error:expr) => {
        tracing::error!(
            fatal = true,
            "{} {:#}",
            $crate::cli::logging::fatal_label(),
            $error
        )
    };
}

//================================================================================================
// Functions
//================================================================================================

/// The label leading a fatal report, colored only on a terminal.
#[doc(hidden)]
pub fn fatal_label() -> &'static str {
    if ANSI.load(Ordering::Relaxed) {
        FATAL_STYLED
    } else {
        FATAL_PLAIN
    }
}

/// Install the global subscriber; the returned guard flushes JSON output on drop.
pub fn init_global_subscriber(args: LogArgs) -> WorkerGuard {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let level = log_level(args, rust_log.as_deref());
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let progress = IndicatifLayer::new().with_progress_style(spinner_style());

    let format = Format::detect();
    ANSI.store(format == Format::Terminal, Ordering::Relaxed);
    let fmt = match format {
        Format::Terminal => fmt::layer()
            .without_time()
            .with_target(false)
            .with_writer(progress.get_stderr_writer())
            .compact()
            .boxed(),
        Format::Json => fmt::layer()
            .with_ansi(false)
            .json()
            .with_writer(writer)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt)
        .with(filter)
        .with(progress)
        .init();

    guard
}

/// Style for spans without their own bar; the build step replaces it with a progress bar.
fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{span_child_prefix}{spinner} {span_name} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Pick the maximum level: `-q` wins, then a plain level in `RUST_LOG`, then `-v`.
///
/// A `RUST_LOG` holding target directives (`repository=trace`) is not a level,
/// so the flags still decide the default and the directives apply on top.
fn log_level(args: LogArgs, rust_log: Option<&str>) -> LevelFilter {
    match args.quiet {
        0 => (),
        1 => return LevelFilter::WARN,
        _ => return LevelFilter::ERROR,
    }

    if let Some(level) = rust_log.and_then(|s| s.parse::<LevelFilter>().ok()) {
        return level;
    }

    match args.verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}
