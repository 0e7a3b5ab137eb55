//! Shared in-memory providers for the integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use wlanstat::{
    AppContext, HardwareRegistry, KnownProfileStore, LeaseHistory, OutputHook, PrimaryService,
    ProfileRecord, RadioFacts, RadioTelemetry, RegistryFacts, RuntimeStore, ServiceInfo,
};

#[derive(Default, Clone)]
pub struct StubRuntime {
    pub primary: Option<PrimaryService>,
    pub services: Vec<ServiceInfo>,
    pub wireless: Vec<String>,
    pub dhcp: BTreeMap<String, BTreeMap<String, String>>,
}

impl StubRuntime {
    /// A store with one wireless service on `wlan0`, optionally routed.
    pub fn single_wireless(router: Option<&str>) -> Self {
        Self {
            services: vec![ServiceInfo {
                interface: "wlan0".to_string(),
                service_id: "svc-wifi".to_string(),
                router_address: router.map(str::to_string),
                service_order: 0,
            }],
            wireless: vec!["wlan0".to_string()],
            ..Self::default()
        }
    }
}

impl RuntimeStore for StubRuntime {
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
        self.dhcp.get(service_id).cloned()
    }

    fn dhcp_record_alternate(&self, _service_id: &str) -> Option<BTreeMap<String, String>> {
        None
    }
}

#[derive(Clone)]
pub struct StubTelemetry {
    pub enabled: bool,
    pub power: Option<bool>,
    pub facts: Option<RadioFacts>,
    pub profiles: Vec<ProfileRecord>,
}

impl Default for StubTelemetry {
    fn default() -> Self {
        Self {
            enabled: true,
            power: None,
            facts: None,
            profiles: Vec::new(),
        }
    }
}

impl StubTelemetry {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Telemetry for a healthy 5 GHz association.
    pub fn associated(name: &str) -> Self {
        Self {
            facts: Some(RadioFacts {
                name: Some(name.to_string()),
                hardware_address: Some("aa:bb:cc:dd:ee:ff".to_string()),
                channel: Some(149),
                signal_dbm: Some(-55),
                noise_dbm: Some(-92),
                tx_rate_mbps: Some(866.7),
                country_code: Some("US".to_string()),
                security: Some("wpa2".to_string()),
                phy_mode: Some("802.11ac".to_string()),
            }),
            ..Self::default()
        }
    }
}

impl RadioTelemetry for StubTelemetry {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn power_state(&self, _interface: &str) -> Option<bool> {
        self.power
    }

    fn link_facts(&self, _interface: &str) -> Option<RadioFacts> {
        self.facts.clone()
    }

    fn connection_profiles(&self, _interface: &str) -> Vec<ProfileRecord> {
        self.profiles.clone()
    }
}

#[derive(Default, Clone)]
pub struct StubRegistry {
    pub facts: RegistryFacts,
}

impl HardwareRegistry for StubRegistry {
    fn adapter_facts(&self, _interface: &str) -> RegistryFacts {
        self.facts.clone()
    }
}

#[derive(Default, Clone)]
pub struct StubLeases {
    pub by_interface: BTreeMap<String, String>,
}

impl LeaseHistory for StubLeases {
    fn dhcp_server_for_interface(&self, interface: &str) -> Option<String> {
        self.by_interface.get(interface).cloned()
    }
}

#[derive(Default, Clone)]
pub struct StubProfiles {
    pub records: Vec<ProfileRecord>,
}

impl KnownProfileStore for StubProfiles {
    fn profiles(&self) -> &[ProfileRecord] {
        &self.records
    }
}

/// Builds a capture context over the given providers; returns the context and
/// the lines its output hook records.
pub fn make_test_context(
    runtime: StubRuntime,
    telemetry: StubTelemetry,
    registry: StubRegistry,
    leases: StubLeases,
    profiles: StubProfiles,
) -> (AppContext, Arc<Mutex<Vec<String>>>) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&lines);
    let output_hook: OutputHook = Arc::new(move |line: &str| {
        sink.lock()
            .expect("output lock should not be poisoned")
            .push(line.to_string());
    });

    let context = AppContext::with_providers(
        Box::new(runtime),
        Box::new(telemetry),
        Box::new(registry),
        Box::new(leases),
        Box::new(profiles),
    )
    .with_output_hook(output_hook);

    (context, lines)
}

pub fn captured(lines: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
    lines
        .lock()
        .expect("output lock should not be poisoned")
        .clone()
}
