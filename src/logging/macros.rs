//! Logging macros that keep the user-facing stderr line and the structured
//! trail in sync.

/// Report a user-facing notice on stderr and record it in the log trail.
#[macro_export]
macro_rules! log_stderr {
    ($($arg:tt)*) => {{
        eprintln!($($arg)*);
        tracing::info!($($arg)*);
    }};
}

/// Report a user-facing error on stderr and record it in the log trail.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        eprintln!("error: {}", format_args!($($arg)*));
        tracing::error!($($arg)*);
    }};
}
