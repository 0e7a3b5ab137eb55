//! Evidence provider interfaces
//!
//! Each provider is one independent read path into the OS. Providers are
//! individually unreliable: any call may return no data, and that is never
//! an error. The resolver consumes these traits only, so tests inject fakes
//! and the system adapters stay at the edge.

pub mod profiles;
pub mod system;

use std::collections::BTreeMap;

use crate::models::{ProfileRecord, RadioFacts, RegistryFacts};

pub use profiles::KnownProfileFile;
pub use system::{
    SystemHardwareRegistry, SystemLeaseHistory, SystemRadioTelemetry, SystemRuntimeStore,
};

/// The OS-designated primary network service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryService {
    pub interface: String,
    pub service_id: String,
    pub router_address: Option<String>,
}

/// One IPv4-configured service known to the runtime store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    pub interface: String,
    pub service_id: String,
    pub router_address: Option<String>,
    /// Position in the configured service order; lower ranks first.
    pub service_order: u32,
}

/// Live OS-maintained record of current network configuration.
pub trait RuntimeStore {
    fn primary_service(&self) -> Option<PrimaryService>;
    fn service_for_interface(&self, interface: &str) -> Option<String>;
    fn router_for_service(&self, service_id: &str) -> Option<String>;
    /// Interfaces with wireless capability, regardless of association.
    fn wireless_interfaces(&self) -> Vec<String>;
    /// Services carrying a usable IPv4 address.
    fn ipv4_services(&self) -> Vec<ServiceInfo>;
    /// Raw per-service DHCP record, keys as the store spells them.
    fn dhcp_record(&self, service_id: &str) -> Option<BTreeMap<String, String>>;
    /// Secondary per-service DHCP record variant (stored/previous lease).
    fn dhcp_record_alternate(&self, service_id: &str) -> Option<BTreeMap<String, String>>;
}

/// Passive read of the active radio. Disable-able; when disabled no method
/// is consulted and association truth falls back to runtime evidence.
pub trait RadioTelemetry {
    fn is_enabled(&self) -> bool {
        true
    }
    /// Radio power state; `None` when the driver does not report one.
    fn power_state(&self, interface: &str) -> Option<bool>;
    /// Current-association facts; `None` when telemetry is unavailable.
    fn link_facts(&self, interface: &str) -> Option<RadioFacts>;
    /// Historical connection profiles the driver keeps, possibly empty.
    fn connection_profiles(&self, interface: &str) -> Vec<ProfileRecord>;
}

/// Driver/firmware-exposed adapter properties, independent of live telemetry.
pub trait HardwareRegistry {
    fn adapter_facts(&self, interface: &str) -> RegistryFacts;
}

/// Historical DHCP lease records kept by the network stack.
pub trait LeaseHistory {
    /// DHCP server address from the most relevant lease for the interface.
    fn dhcp_server_for_interface(&self, interface: &str) -> Option<String>;
}

/// Persisted known-network profile table.
pub trait KnownProfileStore {
    /// The historical profile table; empty when the backing file is missing
    /// or fails the access gate.
    fn profiles(&self) -> &[ProfileRecord];
}

/// The full provider set the resolver draws evidence from.
pub struct Providers<'a> {
    pub runtime: &'a dyn RuntimeStore,
    pub telemetry: &'a dyn RadioTelemetry,
    pub registry: &'a dyn HardwareRegistry,
    pub leases: &'a dyn LeaseHistory,
    pub profiles: &'a dyn KnownProfileStore,
}
