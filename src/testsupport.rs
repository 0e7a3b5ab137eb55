//! In-memory provider fakes shared by the unit tests.

use std::cell::Cell;
use std::collections::BTreeMap;

use crate::models::{EnvironmentInfo, ProfileRecord, RadioFacts, RegistryFacts};
use crate::providers::{
    HardwareRegistry, KnownProfileStore, LeaseHistory, PrimaryService, RadioTelemetry,
    RuntimeStore, ServiceInfo,
};

/// Runtime store with nothing configured. The resolver never consults the
/// runtime store directly (the selector already did), so the empty fake is
/// enough for resolver tests.
#[derive(Default)]
pub struct FakeRuntime {
    pub primary: Option<PrimaryService>,
    pub services: Vec<ServiceInfo>,
    pub wireless: Vec<String>,
    pub dhcp_records: BTreeMap<String, BTreeMap<String, String>>,
}

impl RuntimeStore for FakeRuntime {
    fn primary_service(&self) -> Option<PrimaryService> {
        self.primary.clone()
    }

    fn service_for_interface(&self, interface: &str) -> Option<String> {
        self.services
            .iter()
            .find(|s| s.interface == interface)
            .map(|s| s.service_id.clone())
    }

    fn router_for_service(&self, service_id: &str) -> Option<String> {
        self.services
            .iter()
            .find(|s| s.service_id == service_id)
            .and_then(|s| s.router_address.clone())
    }

    fn wireless_interfaces(&self) -> Vec<String> {
        self.wireless.clone()
    }

    fn ipv4_services(&self) -> Vec<ServiceInfo> {
        self.services.clone()
    }

    fn dhcp_record(&self, service_id: &str) -> Option<BTreeMap<String, String>> {
        self.dhcp_records.get(service_id).cloned()
    }

    fn dhcp_record_alternate(&self, _service_id: &str) -> Option<BTreeMap<String, String>> {
        None
    }
}

/// Telemetry fake that counts link queries so tests can prove the gates
/// short-circuit enrichment.
pub struct FakeTelemetry {
    pub enabled: bool,
    pub power: Option<bool>,
    pub facts: Option<RadioFacts>,
    pub profiles: Vec<ProfileRecord>,
    pub link_calls: Cell<u32>,
}

impl Default for FakeTelemetry {
    fn default() -> Self {
        Self {
            enabled: true,
            power: None,
            facts: None,
            profiles: Vec::new(),
            link_calls: Cell::new(0),
        }
    }
}

impl FakeTelemetry {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

impl RadioTelemetry for FakeTelemetry {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn power_state(&self, _interface: &str) -> Option<bool> {
        self.power
    }

    fn link_facts(&self, _interface: &str) -> Option<RadioFacts> {
        self.link_calls.set(self.link_calls.get() + 1);
        self.facts.clone()
    }

    fn connection_profiles(&self, _interface: &str) -> Vec<ProfileRecord> {
        self.profiles.clone()
    }
}

#[derive(Default)]
pub struct FakeRegistry {
    pub channel: Option<u32>,
    pub country_code: Option<String>,
    pub hardware_address: Option<String>,
    pub name: Option<String>,
    pub calls: Cell<u32>,
}

impl HardwareRegistry for FakeRegistry {
    fn adapter_facts(&self, _interface: &str) -> RegistryFacts {
        self.calls.set(self.calls.get() + 1);
        RegistryFacts {
            channel: self.channel,
            country_code: self.country_code.clone(),
            hardware_address: self.hardware_address.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Default)]
pub struct FakeLeases {
    pub server: Option<String>,
}

impl LeaseHistory for FakeLeases {
    fn dhcp_server_for_interface(&self, _interface: &str) -> Option<String> {
        self.server.clone()
    }
}

#[derive(Default)]
pub struct FakeProfiles {
    pub records: Vec<ProfileRecord>,
    pub calls: Cell<u32>,
}

impl KnownProfileStore for FakeProfiles {
    fn profiles(&self) -> &[ProfileRecord] {
        self.calls.set(self.calls.get() + 1);
        &self.records
    }
}

/// Selector output for a wireless interface, optionally with a router.
pub fn env_with_router(interface: &str, router: Option<&str>) -> EnvironmentInfo {
    EnvironmentInfo {
        interface: interface.to_string(),
        service_id: Some(format!("service-{interface}")),
        router_address: router.map(str::to_string),
        dhcp_server_address: None,
        dhcp_discovery_method: None,
        dhcp_origin: None,
        wireless: true,
    }
}

/// Radio facts for a healthy association: name and hardware address only;
/// callers add channel/signal fields as each test needs them.
pub fn online_radio(name: &str) -> RadioFacts {
    RadioFacts {
        name: Some(name.to_string()),
        hardware_address: Some("aa:bb:cc:dd:ee:ff".to_string()),
        ..RadioFacts::default()
    }
}
