//! Structured logging for the wireless status reporter
//!
//! Stdout is reserved for the rendered snapshot, so the console layer goes
//! to stderr and stays quiet below warn unless `RUST_LOG` says otherwise.
//! A JSON file layer with daily rotation keeps the detailed trail.

pub mod macros;

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system.
///
/// Creates the log directory and sets up daily rotating log files under
/// `~/.config/wlanstat/logs/` (`%APPDATA%/wlanstat/logs` on Windows).
///
/// Set `RUST_LOG` to control verbosity; the default is `warn` so the tool
/// stays silent on a healthy run.
pub fn init_logging() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "wlanstat.log");

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .json();

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;

    let init_result = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    if let Err(e) = init_result {
        // Another subsystem/test may already have installed a subscriber.
        if e.to_string().contains("already been set") {
            return Ok(log_dir);
        }
        return Err(Box::new(e));
    }

    tracing::debug!("Logging initialized. Log directory: {}", log_dir.display());

    Ok(log_dir)
}

/// Log directory path: `%APPDATA%/wlanstat/logs` on Windows,
/// `~/.config/wlanstat/logs` elsewhere.
fn get_log_directory() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .ok_or("Could not find APPDATA directory")?
            .join("wlanstat")
    } else {
        dirs::config_dir()
            .ok_or("Could not find config directory")?
            .join("wlanstat")
    };

    Ok(base_dir.join("logs"))
}

/// Current log file path, for pointing a user at today's trail.
pub fn get_current_log_file() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let log_dir = get_log_directory()?;
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    Ok(log_dir.join(format!("wlanstat.log.{}", today)))
}
