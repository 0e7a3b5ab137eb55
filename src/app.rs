//! Command dispatch
//!
//! `AppContext` owns the injected providers and an optional output hook so
//! tests can capture stdout lines without a real radio. The CLI entrypoint
//! builds a system-backed context; everything below it is provider-agnostic.

use std::sync::Arc;

use anyhow::Result;

use crate::cli::{parse_cli_args, usage_text, version_text, CliCommand};
use crate::config::is_tunnel_interface;
use crate::exports::render_snapshot;
use crate::providers::{
    HardwareRegistry, KnownProfileFile, KnownProfileStore, LeaseHistory, Providers,
    RadioTelemetry, RuntimeStore, SystemHardwareRegistry, SystemLeaseHistory,
    SystemRadioTelemetry, SystemRuntimeStore,
};
use crate::resolver::resolve;
use crate::selector::select_environment;

pub type OutputHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Everything a command needs to run: the five evidence providers plus the
/// output sink.
pub struct AppContext {
    runtime: Box<dyn RuntimeStore>,
    telemetry: Box<dyn RadioTelemetry>,
    registry: Box<dyn HardwareRegistry>,
    leases: Box<dyn LeaseHistory>,
    profiles: Box<dyn KnownProfileStore>,
    output_hook: Option<OutputHook>,
}

impl AppContext {
    /// Context backed by the OS adapters and the default profile table.
    pub fn from_system() -> Self {
        Self {
            runtime: Box::new(SystemRuntimeStore::new()),
            telemetry: Box::new(SystemRadioTelemetry::new(true)),
            registry: Box::new(SystemHardwareRegistry::new()),
            leases: Box::new(SystemLeaseHistory::new()),
            profiles: Box::new(KnownProfileFile::new(KnownProfileFile::default_path())),
            output_hook: None,
        }
    }

    /// Context over caller-supplied providers. This is the seam tests use.
    pub fn with_providers(
        runtime: Box<dyn RuntimeStore>,
        telemetry: Box<dyn RadioTelemetry>,
        registry: Box<dyn HardwareRegistry>,
        leases: Box<dyn LeaseHistory>,
        profiles: Box<dyn KnownProfileStore>,
    ) -> Self {
        Self {
            runtime,
            telemetry,
            registry,
            leases,
            profiles,
            output_hook: None,
        }
    }

    /// Replaces the profile table location, keeping the defensive open gate.
    pub fn with_profile_store_path(mut self, path: std::path::PathBuf) -> Self {
        self.profiles = Box::new(KnownProfileFile::new(path));
        self
    }

    pub fn with_output_hook(mut self, hook: OutputHook) -> Self {
        self.output_hook = Some(hook);
        self
    }

    fn emit(&self, line: &str) {
        match &self.output_hook {
            Some(hook) => hook(line),
            None => println!("{}", line),
        }
    }

    fn providers(&self) -> Providers<'_> {
        Providers {
            runtime: &*self.runtime,
            telemetry: &*self.telemetry,
            registry: &*self.registry,
            leases: &*self.leases,
            profiles: &*self.profiles,
        }
    }
}

/// Run the app by parsing CLI-style args and dispatching the command.
/// Returns the process exit code.
pub fn run<I, S>(args: I) -> Result<i32>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let command = parse_cli_args(args)?;
    execute_command(command)
}

/// Execute a pre-parsed command against the system-backed context.
pub fn execute_command(command: CliCommand) -> Result<i32> {
    execute_command_with_context(command, &AppContext::from_system())
}

/// Execute a pre-parsed command. Reusable for non-CLI entrypoints and tests.
pub fn execute_command_with_context(command: CliCommand, context: &AppContext) -> Result<i32> {
    match command {
        CliCommand::Help => {
            context.emit(&usage_text());
            Ok(0)
        }
        CliCommand::Version => {
            context.emit(&version_text());
            Ok(0)
        }
        CliCommand::Interfaces => handle_interfaces(context),
        CliCommand::Status {
            interface,
            provenance,
            compact,
        } => handle_status(context, interface.as_deref(), provenance, compact),
    }
}

fn handle_status(
    context: &AppContext,
    interface: Option<&str>,
    with_provenance: bool,
    compact: bool,
) -> Result<i32> {
    let environment = select_environment(&*context.runtime, &*context.leases, interface);
    tracing::debug!(
        "selected environment: interface='{}' wireless={}",
        environment.interface,
        environment.wireless
    );

    let resolution = resolve(&environment, &context.providers());
    let rendered = render_snapshot(
        &resolution.snapshot,
        &resolution.provenance,
        with_provenance,
        compact,
    )?;
    context.emit(&rendered);
    Ok(resolution.snapshot.state.exit_code())
}

fn handle_interfaces(context: &AppContext) -> Result<i32> {
    let mut interfaces: Vec<String> = context
        .runtime
        .wireless_interfaces()
        .into_iter()
        .filter(|name| !is_tunnel_interface(name))
        .collect();
    interfaces.sort();
    interfaces.dedup();

    if interfaces.is_empty() {
        context.emit("No wireless interfaces found.");
    } else {
        for interface in interfaces {
            context.emit(&interface);
        }
    }
    Ok(0)
}
