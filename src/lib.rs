//! wlanstat — Wireless association status reporting
//!
//! This crate reconciles several unreliable evidence sources into one
//! consistent wireless status snapshot:
//! - Runtime network store (services, routers, DHCP records)
//! - Live radio telemetry (association, signal, channel)
//! - Hardware registry (adapter properties)
//! - Known-profile table (historical network identity)
//! - DHCP lease history
//!
//! Every reported field carries a provenance tag naming the source that
//! supplied it, and a fixed precedence order keeps conflicting sources from
//! flapping the output.

pub mod app;
pub mod band;
pub mod cli;
pub mod config;
pub mod exports;
pub mod logging;
pub mod models;
pub mod providers;
pub mod ranking;
pub mod resolver;
pub mod selector;

#[cfg(test)]
pub(crate) mod testsupport;

pub use app::{
    execute_command, execute_command_with_context, run, AppContext, OutputHook,
};
pub use band::{band_for_channel, snr_db};
pub use cli::{parse_cli_args, usage_text, version_text, CliCommand};
pub use exports::{render_snapshot, render_snapshot_value};
pub use models::*;
pub use providers::{
    HardwareRegistry, KnownProfileFile, KnownProfileStore, LeaseHistory, PrimaryService,
    Providers, RadioTelemetry, RuntimeStore, ServiceInfo, SystemHardwareRegistry,
    SystemLeaseHistory, SystemRadioTelemetry, SystemRuntimeStore,
};
pub use resolver::{resolve, Resolution};
pub use selector::select_environment;

// Re-export logging macros for use across crate
pub use crate::logging::macros;
