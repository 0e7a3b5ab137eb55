//! Configuration constants for the wireless status reporter

// ====== Runtime-store DHCP record keys ======

/// Key spellings accepted for a DHCP server identifier in raw runtime-store
/// and lease records. The upstream schema is undocumented and varies across
/// OS versions, so the accepted list is configuration, not an assumption.
/// Matched case-insensitively.
pub const DHCP_SERVER_KEYS: &[&str] = &[
    "ServerIdentifier",
    "server_identifier",
    "dhcp-server-identifier",
    "DHCPServerIdentifier",
    "SERVER_ADDRESS",
    "siaddr",
];

// ====== DHCP discovery method labels ======

pub const DHCP_METHOD_RUNTIME: &str = "runtime-dhcp";
pub const DHCP_METHOD_RUNTIME_ALTERNATE: &str = "runtime-dhcp-stored";
pub const DHCP_METHOD_LEASE_HISTORY: &str = "lease-history";
pub const DHCP_METHOD_ROUTER_FALLBACK: &str = "router-heuristic";

// ====== Interface selection ======

/// Name prefixes of tunnel/VPN interfaces, excluded from auto-selection.
pub const TUNNEL_INTERFACE_PREFIXES: &[&str] = &["utun", "tun", "tap", "ppp", "ipsec", "wg"];

/// Hardware address reported by redacting providers in place of the real one.
pub const PLACEHOLDER_HARDWARE_ADDRESS: &str = "00:00:00:00:00:00";

// ====== Profile ranking scores ======

/// Entry score when its DHCP-server signature matches the environment.
pub const SCORE_DHCP_SIGNATURE: f64 = 0.85;

/// Entry score when its router signature matches the environment.
pub const SCORE_ROUTER_SIGNATURE: f64 = 0.72;

/// Record-level fallback when no entry matched but the record's own
/// top-level router signature does.
pub const SCORE_RECORD_ROUTER_FALLBACK: f64 = 0.70;

/// Additive bonus when an entry's channel matches the known channel.
pub const SCORE_CHANNEL_BONUS: f64 = 0.05;

/// Ceiling for any combined entry score.
pub const SCORE_CAP: f64 = 1.0;

// ====== Security labels ======

/// Canonical security labels emitted after normalizing provider descriptors.
pub const SECURITY_LABELS: &[&str] = &[
    "Open",
    "WEP",
    "WPA-Personal",
    "WPA/WPA2 Mixed",
    "WPA2-Personal",
    "WPA3-Personal",
    "WPA2/WPA3",
];

/// Returns true when the interface name marks a tunnel/VPN interface.
pub fn is_tunnel_interface(name: &str) -> bool {
    let lower = name.to_lowercase();
    TUNNEL_INTERFACE_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

/// Returns true when the address is absent, all-zero, or the provider's
/// redaction placeholder. Such addresses never count as evidence.
pub fn is_placeholder_hardware_address(address: &str) -> bool {
    if address.is_empty() {
        return true;
    }
    address
        .chars()
        .all(|c| c == '0' || c == ':' || c == '-' || c == '.')
}
