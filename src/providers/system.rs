//! Best-effort system adapters behind the provider traits
//!
//! Every read here is passive and degrades to "no data" on any failure. The
//! adapters never trigger scans, never write, and never surface errors; the
//! core only ever sees optional facts.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::process::Command;

use pnet::datalink;

use crate::models::{ProfileRecord, RadioFacts, RegistryFacts};
use crate::providers::{
    HardwareRegistry, LeaseHistory, PrimaryService, RadioTelemetry, RuntimeStore, ServiceInfo,
};

/// Lease file locations probed for DHCP history, newest record wins.
fn lease_file_candidates(interface: &str) -> Vec<PathBuf> {
    vec![
        PathBuf::from(format!("/var/lib/dhcp/dhclient.{interface}.leases")),
        PathBuf::from(format!("/var/lib/dhcp/dhclient-{interface}.leases")),
        PathBuf::from("/var/lib/dhcp/dhclient.leases"),
    ]
}

fn has_usable_ipv4(iface: &datalink::NetworkInterface) -> bool {
    iface.ips.iter().any(|net| match net.ip() {
        std::net::IpAddr::V4(v4) => {
            !v4.is_unspecified()
                && net.prefix() > 0
                && !(v4.octets()[0] == 169 && v4.octets()[1] == 254)
        }
        std::net::IpAddr::V6(_) => false,
    })
}

fn is_wireless_interface(name: &str) -> bool {
    Path::new("/sys/class/net").join(name).join("wireless").exists()
}

/// Runs a command and returns stdout, or `None` on any failure.
fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok()
}

/// Runtime network-state adapter over pnet enumeration and /proc routes.
pub struct SystemRuntimeStore;

impl SystemRuntimeStore {
    pub fn new() -> Self {
        Self
    }

    /// Default gateway per interface from /proc/net/route (dest 0.0.0.0).
    fn default_routes() -> BTreeMap<String, Ipv4Addr> {
        let mut routes = BTreeMap::new();
        let Ok(table) = std::fs::read_to_string("/proc/net/route") else {
            return routes;
        };
        for line in table.lines().skip(1) {
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < 3 || cols[1] != "00000000" {
                continue;
            }
            if let Ok(raw) = u32::from_str_radix(cols[2], 16) {
                // /proc stores the gateway little-endian.
                let gateway = Ipv4Addr::from(raw.swap_bytes());
                if !gateway.is_unspecified() {
                    routes.entry(cols[0].to_string()).or_insert(gateway);
                }
            }
        }
        routes
    }
}

impl Default for SystemRuntimeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeStore for SystemRuntimeStore {
    fn primary_service(&self) -> Option<PrimaryService> {
        // The interface carrying the default route is the primary service.
        let routes = Self::default_routes();
        let (interface, gateway) = routes.iter().next()?;
        Some(PrimaryService {
            interface: interface.clone(),
            service_id: interface.clone(),
            router_address: Some(gateway.to_string()),
        })
    }

    fn service_for_interface(&self, interface: &str) -> Option<String> {
        datalink::interfaces()
            .iter()
            .find(|i| i.name == interface)
            .map(|i| i.name.clone())
    }

    fn router_for_service(&self, service_id: &str) -> Option<String> {
        Self::default_routes()
            .get(service_id)
            .map(|gw| gw.to_string())
    }

    fn wireless_interfaces(&self) -> Vec<String> {
        datalink::interfaces()
            .into_iter()
            .filter(|i| !i.is_loopback() && is_wireless_interface(&i.name))
            .map(|i| i.name)
            .collect()
    }

    fn ipv4_services(&self) -> Vec<ServiceInfo> {
        let routes = Self::default_routes();
        datalink::interfaces()
            .into_iter()
            .filter(|i| !i.is_loopback() && has_usable_ipv4(i))
            .enumerate()
            .map(|(order, i)| ServiceInfo {
                service_id: i.name.clone(),
                router_address: routes.get(&i.name).map(|gw| gw.to_string()),
                interface: i.name,
                service_order: order as u32,
            })
            .collect()
    }

    fn dhcp_record(&self, service_id: &str) -> Option<BTreeMap<String, String>> {
        latest_lease_record(service_id)
    }

    fn dhcp_record_alternate(&self, service_id: &str) -> Option<BTreeMap<String, String>> {
        // NetworkManager keeps its own per-interface lease state.
        let dir = Path::new("/var/lib/NetworkManager");
        let entries = std::fs::read_dir(dir).ok()?;
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            if !name.ends_with(&format!("-{service_id}.lease")) {
                continue;
            }
            let body = std::fs::read_to_string(entry.path()).ok()?;
            let mut record = BTreeMap::new();
            for line in body.lines() {
                if let Some((key, value)) = line.split_once('=') {
                    record.insert(key.trim().to_string(), value.trim().to_string());
                }
            }
            if !record.is_empty() {
                return Some(record);
            }
        }
        None
    }
}

/// Parses the newest lease block of a dhclient lease file into a record map.
fn parse_dhclient_leases(body: &str) -> Option<BTreeMap<String, String>> {
    let mut latest = None;
    let mut current: Option<BTreeMap<String, String>> = None;
    for line in body.lines() {
        let line = line.trim();
        if line.starts_with("lease {") || line == "lease {" {
            current = Some(BTreeMap::new());
        } else if line == "}" {
            if let Some(record) = current.take() {
                latest = Some(record);
            }
        } else if let Some(record) = current.as_mut() {
            let line = line.trim_end_matches(';');
            if let Some(rest) = line.strip_prefix("option ") {
                if let Some((key, value)) = rest.split_once(' ') {
                    record.insert(key.to_string(), value.trim_matches('"').to_string());
                }
            }
        }
    }
    latest.filter(|r| !r.is_empty())
}

fn latest_lease_record(interface: &str) -> Option<BTreeMap<String, String>> {
    for path in lease_file_candidates(interface) {
        if let Ok(body) = std::fs::read_to_string(&path) {
            if let Some(record) = parse_dhclient_leases(&body) {
                return Some(record);
            }
        }
    }
    None
}

/// Radio telemetry via passive `iw` queries. Construction takes an enabled
/// flag so callers can honor a redaction/disable policy.
pub struct SystemRadioTelemetry {
    enabled: bool,
}

impl SystemRadioTelemetry {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl RadioTelemetry for SystemRadioTelemetry {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn power_state(&self, _interface: &str) -> Option<bool> {
        // rfkill exposes soft/hard block per wlan device.
        let entries = std::fs::read_dir("/sys/class/rfkill").ok()?;
        for entry in entries.flatten() {
            let base = entry.path();
            let kind = std::fs::read_to_string(base.join("type")).unwrap_or_default();
            if kind.trim() != "wlan" {
                continue;
            }
            let soft = std::fs::read_to_string(base.join("soft")).unwrap_or_default();
            let hard = std::fs::read_to_string(base.join("hard")).unwrap_or_default();
            return Some(soft.trim() != "1" && hard.trim() != "1");
        }
        None
    }

    fn link_facts(&self, interface: &str) -> Option<RadioFacts> {
        let link = command_stdout("iw", &["dev", interface, "link"])?;
        let mut facts = RadioFacts::default();

        if link.trim_start().starts_with("Not connected") {
            return Some(facts);
        }
        for line in link.lines() {
            let line = line.trim();
            if let Some(rest) = line.strip_prefix("Connected to ") {
                facts.hardware_address = rest.split_whitespace().next().map(str::to_string);
            } else if let Some(rest) = line.strip_prefix("SSID: ") {
                if !rest.is_empty() {
                    facts.name = Some(rest.to_string());
                }
            } else if let Some(rest) = line.strip_prefix("freq: ") {
                facts.channel = rest
                    .split('.')
                    .next()
                    .and_then(|f| f.parse::<u32>().ok())
                    .and_then(channel_for_frequency);
            } else if let Some(rest) = line.strip_prefix("signal: ") {
                facts.signal_dbm = rest
                    .split_whitespace()
                    .next()
                    .and_then(|v| v.parse::<i32>().ok());
            } else if let Some(rest) = line.strip_prefix("tx bitrate: ") {
                facts.tx_rate_mbps = rest
                    .split_whitespace()
                    .next()
                    .and_then(|v| v.parse::<f64>().ok());
            }
        }

        if let Some(info) = command_stdout("iw", &["dev", interface, "info"]) {
            for line in info.lines() {
                let line = line.trim();
                if let Some(rest) = line.strip_prefix("channel ") {
                    if facts.channel.is_none() {
                        facts.channel = rest
                            .split_whitespace()
                            .next()
                            .and_then(|v| v.parse::<u32>().ok());
                    }
                }
            }
        }

        Some(facts)
    }

    fn connection_profiles(&self, _interface: &str) -> Vec<ProfileRecord> {
        // Linux drivers keep no per-address history comparable to the
        // profile table; the known-profile store covers recovery instead.
        Vec::new()
    }
}

/// Converts a center frequency in MHz to its channel number.
fn channel_for_frequency(freq_mhz: u32) -> Option<u32> {
    match freq_mhz {
        2412..=2472 => Some((freq_mhz - 2407) / 5),
        2484 => Some(14),
        5160..=5885 => Some((freq_mhz - 5000) / 5),
        _ => None,
    }
}

/// Hardware registry over sysfs and the regulatory database.
pub struct SystemHardwareRegistry;

impl SystemHardwareRegistry {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemHardwareRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HardwareRegistry for SystemHardwareRegistry {
    fn adapter_facts(&self, interface: &str) -> RegistryFacts {
        let mut facts = RegistryFacts::default();

        let addr_path = Path::new("/sys/class/net").join(interface).join("address");
        if let Ok(address) = std::fs::read_to_string(addr_path) {
            let address = address.trim().to_string();
            if !address.is_empty() {
                facts.hardware_address = Some(address);
            }
        }

        if let Some(reg) = command_stdout("iw", &["reg", "get"]) {
            for line in reg.lines() {
                if let Some(rest) = line.trim().strip_prefix("country ") {
                    let code = rest.trim_end_matches(':').chars().take(2).collect::<String>();
                    if code.chars().all(|c| c.is_ascii_uppercase()) {
                        facts.country_code = Some(code);
                        break;
                    }
                }
            }
        }

        facts
    }
}

/// Lease history over the same dhclient files, exposed as a lookup.
pub struct SystemLeaseHistory;

impl SystemLeaseHistory {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemLeaseHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl LeaseHistory for SystemLeaseHistory {
    fn dhcp_server_for_interface(&self, interface: &str) -> Option<String> {
        let record = latest_lease_record(interface)?;
        crate::selector::dhcp_server_from_record(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequencies_map_to_channels() {
        assert_eq!(channel_for_frequency(2412), Some(1));
        assert_eq!(channel_for_frequency(2437), Some(6));
        assert_eq!(channel_for_frequency(2484), Some(14));
        assert_eq!(channel_for_frequency(5180), Some(36));
        assert_eq!(channel_for_frequency(5745), Some(149));
        assert_eq!(channel_for_frequency(900), None);
    }

    #[test]
    fn dhclient_lease_parser_returns_newest_block() {
        let body = r#"
lease {
  interface "wlan0";
  option dhcp-server-identifier 192.168.0.1;
  option routers 192.168.0.1;
}
lease {
  interface "wlan0";
  option dhcp-server-identifier 10.0.0.1;
  option routers 10.0.0.1;
}
"#;
        let record = parse_dhclient_leases(body).expect("lease blocks should parse");
        assert_eq!(
            record.get("dhcp-server-identifier").map(String::as_str),
            Some("10.0.0.1")
        );
    }

    #[test]
    fn empty_lease_file_yields_nothing() {
        assert_eq!(parse_dhclient_leases(""), None);
        assert_eq!(parse_dhclient_leases("# no leases yet\n"), None);
    }
}
