//! wlanstat — Wireless association status CLI
//!
//! Reconciles the runtime network store, live radio telemetry, the hardware
//! registry, the known-profile table and lease history into a single
//! provenance-tagged JSON snapshot on stdout.

use wlanstat::app::run;

/// Logs an error message to stderr
macro_rules! log_error {
    ($($arg:tt)*) => {
        wlanstat::log_error!($($arg)*);
    };
}

fn main() {
    if let Err(e) = wlanstat::logging::init_logging() {
        eprintln!("[WARN] Failed to initialize structured logging: {}", e);
    }

    match run(std::env::args()) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            log_error!("{:#}", e);
            std::process::exit(1);
        }
    }
}
