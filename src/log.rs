//! Set up the program logger.
//!
//! Messages go to the terminal (coloured if it is one) and, once an output folder is known, to a
//! pair of log files inside it.
use anyhow::{Context, Result, bail};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record};
use std::env;
use std::fmt::Arguments;
use std::fs::{File, OpenOptions};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::OnceLock;

/// Set once the logger has been installed
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// Environment variable which overrides the configured log level
const LOG_LEVEL_ENV_VAR: &str = "MIXCOST_LOG_LEVEL";

/// The log level used when neither the environment nor `settings.toml` specify one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log file for ordinary progress messages
const LOG_INFO_FILE_NAME: &str = "mixcost_info.log";

/// Log file for warnings and errors
const LOG_ERROR_FILE_NAME: &str = "mixcost_error.log";

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Convert a log level name into a [`LevelFilter`]
fn parse_log_level(level: &str) -> Result<LevelFilter> {
    let filter = match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        unknown => bail!("Unknown log level: {unknown}"),
    };

    Ok(filter)
}

/// Install the program logger.
///
/// The log level is taken from the `MIXCOST_LOG_LEVEL` environment variable if set, otherwise
/// from `settings.toml`, otherwise `info`. Valid levels are `off`, `error`, `warn`, `info`, `debug`
/// and `trace`.
///
/// # Arguments
///
/// * `log_level_from_settings`: The log level specified in `settings.toml`
/// * `log_file_dir`: Folder in which to create log files, if any
pub fn init(log_level_from_settings: Option<&str>, log_file_dir: Option<&Path>) -> Result<()> {
    let log_level = match env::var(LOG_LEVEL_ENV_VAR) {
        Ok(level) => level,
        Err(_) => log_level_from_settings
            .unwrap_or(DEFAULT_LOG_LEVEL)
            .to_string(),
    };
    let log_level = parse_log_level(&log_level)?;

    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);
    let colour_stdout = std::io::stdout().is_terminal().then_some(colours);
    let colour_stderr = std::io::stderr().is_terminal().then_some(colours);

    let mut dispatch = Dispatch::new()
        .chain(
            // Progress messages to stdout
            Dispatch::new()
                .filter(|metadata| metadata.level() > LevelFilter::Warn)
                .format(move |out, message, record| {
                    write_log(out, message, record, colour_stdout.as_ref());
                })
                .level(log_level)
                .chain(std::io::stdout()),
        )
        .chain(
            // Warnings and errors to stderr
            Dispatch::new()
                .format(move |out, message, record| {
                    write_log(out, message, record, colour_stderr.as_ref());
                })
                .level(log_level.min(LevelFilter::Warn))
                .chain(std::io::stderr()),
        );

    if let Some(dir) = log_file_dir {
        dispatch = dispatch
            .chain(
                Dispatch::new()
                    .filter(|metadata| metadata.level() > LevelFilter::Warn)
                    .format(|out, message, record| write_log(out, message, record, None))
                    .level(log_level.max(LevelFilter::Info))
                    .chain(open_log_file(dir, LOG_INFO_FILE_NAME)?),
            )
            .chain(
                Dispatch::new()
                    .format(|out, message, record| write_log(out, message, record, None))
                    .level(LevelFilter::Warn)
                    .chain(open_log_file(dir, LOG_ERROR_FILE_NAME)?),
            );
    }

    dispatch.apply().context("Logger already initialised")?;
    let _ = LOGGER_INIT.set(());

    Ok(())
}

/// Create (or truncate) a log file in `dir`
fn open_log_file(dir: &Path, file_name: &str) -> Result<File> {
    let path = dir.join(file_name);
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&path)
        .with_context(|| format!("Could not create log file {}", path.display()))
}

/// Format a log record, colouring the level if `colours` is given
fn write_log(
    out: FormatCallback,
    message: &Arguments,
    record: &Record,
    colours: Option<&ColoredLevelConfig>,
) {
    let timestamp = Local::now().format("%H:%M:%S");
    let target = record.target();
    match colours {
        Some(colours) => {
            let level = colours.color(record.level());
            out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
        }
        None => {
            let level = record.level();
            out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
        }
    }
}
