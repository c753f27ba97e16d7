use crate::config::LoggingConfig;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `<data dir>/tweetsent/tweetsent.log`
pub fn default_log_file() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("tweetsent").join("tweetsent.log"))
}

/// Install the global subscriber. The terminal belongs to the UI, so
/// events go to a file; `RUST_LOG` wins over the configured level.
///
/// Returns the log file in use, or `None` when logging could not be set
/// up; the app keeps running either way.
pub fn init(config: &LoggingConfig) -> Option<PathBuf> {
    let path = config.file.clone().or_else(default_log_file)?;
    if let Some(parent) = path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return None;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .ok()?;

    Some(path)
}
