use crate::error::{AnalyzerError, Result};
use chrono::Local;
use env_logger::{Builder, Env};
use std::io::Write;
use yansi::Paint;

/// Initializes logging for the analysis pipeline with the given level
///
/// Valid log levels are: error, warn, info, debug, trace. `RUST_LOG`
/// overrides the supplied level. Fails if a logger is already installed.
pub fn init(log_level: &str) -> Result<()> {
    builder(log_level)
        .try_init()
        .map_err(|e| AnalyzerError::Config(format!("Failed to install logger: {}", e)))
}

/// Like [`init`], but ignores an already-installed logger
///
/// Used by test suites, where several binaries race to install the global
/// logger.
pub fn try_init(log_level: &str) {
    let _ = builder(log_level).try_init();
}

fn builder(log_level: &str) -> Builder {
    let env = Env::default()
        .filter_or("RUST_LOG", log_level)
        .write_style_or("RUST_LOG_STYLE", "always");

    let mut builder = Builder::from_env(env);
    builder.format(|buf, record| writeln!(buf, "{}", format_log(record)));
    builder
}

/// Formats a log record into the single-line form used across the crate
///
/// Fetch and classification steps log their repository slug in the
/// message, so the line carries timestamp, level, module target, and
/// message only.
pub fn format_log(record: &log::Record) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let target = if !record.target().is_empty() {
        record.target()
    } else {
        record.module_path().unwrap_or("unknown")
    };

    format!(
        "[{}] {} {}: {}",
        level_tag(record.level()),
        timestamp,
        target,
        record.args()
    )
}

fn level_tag(level: log::Level) -> Paint<&'static str> {
    match level {
        log::Level::Error => Paint::red("ERROR").bold(),
        log::Level::Warn => Paint::yellow("WARN ").bold(),
        log::Level::Info => Paint::cyan("INFO ").bold(),
        log::Level::Debug => Paint::blue("DEBUG").bold(),
        log::Level::Trace => Paint::new("TRACE"),
    }
}
