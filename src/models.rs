//! Data models for the wireless status reporter

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Output field keys. The emitter and the provenance map share these so a
/// field is present in the rendered snapshot exactly when it carries a tag.
pub mod field {
    pub const IFACE: &str = "iface";
    pub const SERVICE_ID: &str = "serviceId";
    pub const ROUTER_ADDRESS: &str = "routerAddress";
    pub const DHCP_SERVER_ADDRESS: &str = "dhcpServerAddress";
    pub const DHCP_DISCOVERY_METHOD: &str = "dhcpDiscoveryMethod";
    pub const NAME: &str = "name";
    pub const NAME_LAST_SEEN: &str = "nameLastSeen";
    pub const HARDWARE_ADDRESS: &str = "hardwareAddress";
    pub const CHANNEL: &str = "channel";
    pub const BAND: &str = "band";
    pub const PHY_MODE: &str = "phyMode";
    pub const SECURITY: &str = "security";
    pub const COUNTRY_CODE: &str = "countryCode";
    pub const SIGNAL: &str = "signal";
    pub const NOISE: &str = "noise";
    pub const SNR: &str = "snr";
    pub const TX_RATE: &str = "txRate";
}

/// Consolidated connectivity state. Every resolve produces exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectivityState {
    /// The radio is powered off.
    PowerOff,
    /// No current association (or the selected interface is not wireless).
    Unassociated,
    /// Live telemetry proves an association, but the runtime store carries
    /// no router/DHCP record for it yet.
    AssociatedNoRuntime,
    /// Associated with runtime network-store evidence.
    AssociatedOnline,
}

impl ConnectivityState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectivityState::PowerOff => "PowerOff",
            ConnectivityState::Unassociated => "Unassociated",
            ConnectivityState::AssociatedNoRuntime => "AssociatedNoRuntime",
            ConnectivityState::AssociatedOnline => "AssociatedOnline",
        }
    }

    /// Exit code the CLI maps this state to. 1 is reserved for errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConnectivityState::AssociatedOnline => 0,
            ConnectivityState::PowerOff => 2,
            ConnectivityState::Unassociated => 3,
            ConnectivityState::AssociatedNoRuntime => 4,
        }
    }
}

/// Which provider supplied a field. Declaration order is precedence order,
/// highest first; an earlier origin never yields to a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldOrigin {
    RuntimeStore,
    RadioTelemetry,
    HardwareRegistry,
    KnownProfile,
    LeaseHistory,
    Heuristic,
    Derived,
}

impl FieldOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldOrigin::RuntimeStore => "RuntimeStore",
            FieldOrigin::RadioTelemetry => "RadioTelemetry",
            FieldOrigin::HardwareRegistry => "HardwareRegistry",
            FieldOrigin::KnownProfile => "KnownProfile",
            FieldOrigin::LeaseHistory => "LeaseHistory",
            FieldOrigin::Heuristic => "Heuristic",
            FieldOrigin::Derived => "Derived",
        }
    }
}

/// Frequency band derived from a channel number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Band {
    Band2_4Ghz,
    Band5Ghz,
}

impl Band {
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Band2_4Ghz => "2.4 GHz",
            Band::Band5Ghz => "5 GHz",
        }
    }
}

/// Per-field origin tags for one resolved snapshot.
///
/// Keys are the `field::*` constants. Interface and state are always present
/// and fixed to `RuntimeStore`; everything else is tagged when filled and
/// untagged when scrubbed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    tags: BTreeMap<String, FieldOrigin>,
}

impl Provenance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, origin: FieldOrigin) {
        self.tags.insert(key.to_string(), origin);
    }

    pub fn get(&self, key: &str) -> Option<FieldOrigin> {
        self.tags.get(key).copied()
    }

    pub fn remove(&mut self, key: &str) {
        self.tags.remove(key);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// The resolved point-in-time status record.
///
/// Optional means "unknown": absence of evidence surfaces as absence of the
/// field, never as a placeholder value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub interface: String,
    pub state: ConnectivityState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<Band>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phy_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub router_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_server_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_discovery_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_dbm: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise_dbm: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snr_db: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_rate_mbps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_last_seen: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Canonical minimal constructor to avoid field drift across call-sites.
    pub fn new(interface: String, state: ConnectivityState) -> Self {
        Self {
            interface,
            state,
            service_id: None,
            name: None,
            hardware_address: None,
            channel: None,
            band: None,
            phy_mode: None,
            security: None,
            country_code: None,
            router_address: None,
            dhcp_server_address: None,
            dhcp_discovery_method: None,
            signal_dbm: None,
            noise_dbm: None,
            snr_db: None,
            tx_rate_mbps: None,
            name_last_seen: None,
        }
    }
}

/// Output of the active service selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentInfo {
    /// Empty when no interface could be resolved.
    pub interface: String,
    pub service_id: Option<String>,
    pub router_address: Option<String>,
    pub dhcp_server_address: Option<String>,
    pub dhcp_discovery_method: Option<String>,
    pub dhcp_origin: Option<FieldOrigin>,
    pub wireless: bool,
}

/// One hardware-address entry of a historical profile record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddressEntry {
    pub hardware_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dhcp_signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router_signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_associated_at: Option<DateTime<Utc>>,
}

/// A persisted known-network record. Loaded once per process, never written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phy_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router_signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_joined_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disconnected_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovered_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<AddressEntry>,
}

impl ProfileRecord {
    /// Most recent activity across every timestamp-bearing field, including
    /// per-entry association times. `None` when the record carries none.
    pub fn latest_activity(&self) -> Option<DateTime<Utc>> {
        let mut latest: Option<DateTime<Utc>> = None;
        for ts in [
            self.updated_at,
            self.user_joined_at,
            self.disconnected_at,
            self.discovered_at,
        ]
        .into_iter()
        .flatten()
        {
            latest = Some(latest.map_or(ts, |cur| cur.max(ts)));
        }
        for entry in &self.entries {
            if let Some(ts) = entry.last_associated_at {
                latest = Some(latest.map_or(ts, |cur| cur.max(ts)));
            }
        }
        latest
    }
}

/// Facts read from the live radio in one passive query. All optional; a
/// missing field simply was not reported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RadioFacts {
    pub name: Option<String>,
    pub hardware_address: Option<String>,
    pub channel: Option<u32>,
    pub signal_dbm: Option<i32>,
    pub noise_dbm: Option<i32>,
    pub tx_rate_mbps: Option<f64>,
    pub country_code: Option<String>,
    pub security: Option<String>,
    pub phy_mode: Option<String>,
}

/// Best-effort adapter properties from the hardware registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistryFacts {
    pub channel: Option<u32>,
    pub country_code: Option<String>,
    pub hardware_address: Option<String>,
    pub name: Option<String>,
}
