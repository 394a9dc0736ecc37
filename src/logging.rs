// Logger setup plus conditional logging macros that are only active in debug builds

use chrono::Local;
use env_logger::{Builder, Env, Target};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

const DEFAULT_FILTER: &str = "word_guess=info";
const LOG_FILE_NAME: &str = "word-guess.log";

/// Where log records go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Used by the full-screen interface so records do not land on the board.
    File(PathBuf),
}

/// Default log file under the platform's local data directory.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("word-guess").join(LOG_FILE_NAME))
}

/// Install the global logger. `RUST_LOG` overrides the default filter.
///
/// Falls back to stderr when the log file cannot be created.
pub fn init_logging(target: &LogTarget) {
    let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} {:<5} [{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    let mut fallback = None;
    if let LogTarget::File(path) = target {
        match open_log_file(path) {
            Ok(file) => {
                builder.target(Target::Pipe(Box::new(file)));
            }
            Err(e) => fallback = Some(format!("{}: {e}", path.display())),
        }
    }

    // A second initialisation (e.g. from tests) is harmless.
    let _ = builder.try_init();
    if let Some(reason) = fallback {
        log::warn!("Could not open log file {reason}; logging to stderr");
    }
}

fn open_log_file(path: &PathBuf) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::options().create(true).append(true).open(path)
}

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        log::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{}};
}

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        log::info!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {{}};
}
