use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{self, LoggingSettings};

/// Where log lines go: `logging.file`, else the XDG state directory.
pub fn log_path(settings: &LoggingSettings) -> Option<PathBuf> {
    settings.file.clone().or_else(config::default_log_path)
}

/// Install the global subscriber writing to the log file.
///
/// The terminal belongs to the UI, so nothing is ever written to stderr.
/// `RUST_LOG` overrides `logging.level`. Logging stays off when the file
/// cannot be opened.
pub fn init(settings: &LoggingSettings) -> Option<PathBuf> {
    let path = log_path(settings)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.as_str()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .ok()?;

    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_log_file_wins() {
        let settings = LoggingSettings {
            level: "debug".into(),
            file: Some(PathBuf::from("/tmp/encore-test.log")),
        };
        assert_eq!(log_path(&settings), Some(PathBuf::from("/tmp/encore-test.log")));
    }
}
