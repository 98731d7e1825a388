//! Tracing setup: console plus an append-only log file

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LogConfig, LogFormat};

/// Open `path` for appending, creating parent directories as needed
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber; `RUST_LOG` overrides the `info` default
pub fn init_tracing(config: &LogConfig) -> Result<()> {
    let file = open_log_file(Path::new(&config.file))
        .with_context(|| format!("failed to open log file {}", config.file))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Text => registry
            .with(fmt::layer())
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .try_init()?,
        LogFormat::Json => registry
            .with(fmt::layer().json())
            .with(fmt::layer().json().with_writer(Mutex::new(file)))
            .try_init()?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_log_file_creates_parents_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("bot.log");

        {
            let mut file = open_log_file(&path).unwrap();
            writeln!(file, "first").unwrap();
        }
        {
            let mut file = open_log_file(&path).unwrap();
            writeln!(file, "second").unwrap();
        }

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }
}
