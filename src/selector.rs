//! Active service/interface selection
//!
//! Chooses the interface and service the resolver inspects. Strict mode
//! honors a caller-supplied interface; auto mode ranks active wireless
//! services, never a tunnel. Read-only: a missing backing store degrades to
//! a zero-valued `EnvironmentInfo`, never an error.

use std::collections::BTreeMap;

use crate::config::{
    is_tunnel_interface, DHCP_METHOD_LEASE_HISTORY, DHCP_METHOD_ROUTER_FALLBACK,
    DHCP_METHOD_RUNTIME, DHCP_METHOD_RUNTIME_ALTERNATE, DHCP_SERVER_KEYS,
};
use crate::models::{EnvironmentInfo, FieldOrigin};
use crate::providers::{LeaseHistory, RuntimeStore, ServiceInfo};

/// Extracts a DHCP server address from a raw record, trying every accepted
/// key spelling case-insensitively.
pub fn dhcp_server_from_record(record: &BTreeMap<String, String>) -> Option<String> {
    for key in DHCP_SERVER_KEYS {
        if let Some(value) = record
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
        {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Picks the best-ranked active wireless service: router-bearing services
/// first, then configured service order, then interface name.
fn best_wireless_service(store: &dyn RuntimeStore) -> Option<ServiceInfo> {
    let wireless = store.wireless_interfaces();
    let mut candidates: Vec<ServiceInfo> = store
        .ipv4_services()
        .into_iter()
        .filter(|s| !is_tunnel_interface(&s.interface))
        .filter(|s| wireless.iter().any(|w| *w == s.interface))
        .collect();

    candidates.sort_by(|a, b| {
        b.router_address
            .is_some()
            .cmp(&a.router_address.is_some())
            .then(a.service_order.cmp(&b.service_order))
            .then(a.interface.cmp(&b.interface))
    });

    candidates.into_iter().next()
}

/// Resolves the environment for a caller-supplied interface (strict mode)
/// or the best active wireless service (auto mode).
pub fn select_environment(
    store: &dyn RuntimeStore,
    leases: &dyn LeaseHistory,
    preferred_interface: Option<&str>,
) -> EnvironmentInfo {
    let mut info = match preferred_interface {
        Some(name) if !is_tunnel_interface(name) => {
            let mut info = EnvironmentInfo {
                interface: name.to_string(),
                ..EnvironmentInfo::default()
            };
            match store.service_for_interface(name) {
                Some(service_id) => {
                    info.service_id = Some(service_id);
                    info.wireless = store.wireless_interfaces().iter().any(|w| w == name);
                }
                None => {
                    // Unknown interface: keep the name, no service, not
                    // treated as wireless.
                    tracing::debug!("no service for interface {}", name);
                }
            }
            info
        }
        // A tunnel was requested explicitly; fall back to the best active
        // wireless service rather than inspecting the VPN leg.
        _ => auto_select(store),
    };

    if info.interface.is_empty() {
        return info;
    }

    resolve_router_and_dhcp(store, leases, &mut info);
    info
}

fn auto_select(store: &dyn RuntimeStore) -> EnvironmentInfo {
    let wireless = store.wireless_interfaces();

    if let Some(primary) = store.primary_service() {
        let primary_is_wireless = wireless.iter().any(|w| *w == primary.interface);
        let primary_has_address = store
            .ipv4_services()
            .iter()
            .any(|s| s.service_id == primary.service_id);
        if primary_is_wireless && primary_has_address && !is_tunnel_interface(&primary.interface) {
            return EnvironmentInfo {
                interface: primary.interface,
                service_id: Some(primary.service_id),
                router_address: primary.router_address,
                wireless: true,
                ..EnvironmentInfo::default()
            };
        }
    }

    match best_wireless_service(store) {
        Some(service) => EnvironmentInfo {
            interface: service.interface,
            service_id: Some(service.service_id),
            router_address: service.router_address,
            wireless: true,
            ..EnvironmentInfo::default()
        },
        None => EnvironmentInfo::default(),
    }
}

/// Fills router and DHCP fields in strict sub-order: runtime record, then
/// its stored variant, then lease history, then the router-fallback
/// heuristic when nothing else is known.
fn resolve_router_and_dhcp(
    store: &dyn RuntimeStore,
    leases: &dyn LeaseHistory,
    info: &mut EnvironmentInfo,
) {
    if let Some(service_id) = info.service_id.clone() {
        if info.router_address.is_none() {
            info.router_address = store.router_for_service(&service_id);
        }

        if let Some(record) = store.dhcp_record(&service_id) {
            if let Some(server) = dhcp_server_from_record(&record) {
                info.dhcp_server_address = Some(server);
                info.dhcp_discovery_method = Some(DHCP_METHOD_RUNTIME.to_string());
                info.dhcp_origin = Some(FieldOrigin::RuntimeStore);
            }
        }
        if info.dhcp_server_address.is_none() {
            if let Some(record) = store.dhcp_record_alternate(&service_id) {
                if let Some(server) = dhcp_server_from_record(&record) {
                    info.dhcp_server_address = Some(server);
                    info.dhcp_discovery_method = Some(DHCP_METHOD_RUNTIME_ALTERNATE.to_string());
                    info.dhcp_origin = Some(FieldOrigin::RuntimeStore);
                }
            }
        }
    }

    if info.dhcp_server_address.is_none() {
        if let Some(server) = leases.dhcp_server_for_interface(&info.interface) {
            info.dhcp_server_address = Some(server);
            info.dhcp_discovery_method = Some(DHCP_METHOD_LEASE_HISTORY.to_string());
            info.dhcp_origin = Some(FieldOrigin::LeaseHistory);
        }
    }

    if info.dhcp_server_address.is_none() {
        if let Some(router) = info.router_address.clone() {
            info.dhcp_server_address = Some(router);
            info.dhcp_discovery_method = Some(DHCP_METHOD_ROUTER_FALLBACK.to_string());
            info.dhcp_origin = Some(FieldOrigin::Heuristic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::PrimaryService;

    #[derive(Default)]
    struct FakeStore {
        primary: Option<PrimaryService>,
        services: Vec<ServiceInfo>,
        wireless: Vec<String>,
        dhcp: BTreeMap<String, BTreeMap<String, String>>,
        dhcp_alt: BTreeMap<String, BTreeMap<String, String>>,
    }

    impl RuntimeStore for FakeStore {
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
        fn dhcp_record_alternate(&self, service_id: &str) -> Option<BTreeMap<String, String>> {
            self.dhcp_alt.get(service_id).cloned()
        }
    }

    #[derive(Default)]
    struct FakeLeases {
        by_interface: BTreeMap<String, String>,
    }

    impl LeaseHistory for FakeLeases {
        fn dhcp_server_for_interface(&self, interface: &str) -> Option<String> {
            self.by_interface.get(interface).cloned()
        }
    }

    fn service(interface: &str, id: &str, router: Option<&str>, order: u32) -> ServiceInfo {
        ServiceInfo {
            interface: interface.to_string(),
            service_id: id.to_string(),
            router_address: router.map(str::to_string),
            service_order: order,
        }
    }

    #[test]
    fn strict_mode_resolves_requested_interface() {
        let store = FakeStore {
            services: vec![service("wlan0", "svc-wifi", Some("192.168.1.1"), 0)],
            wireless: vec!["wlan0".to_string()],
            ..FakeStore::default()
        };
        let info = select_environment(&store, &FakeLeases::default(), Some("wlan0"));
        assert_eq!(info.interface, "wlan0");
        assert_eq!(info.service_id.as_deref(), Some("svc-wifi"));
        assert!(info.wireless);
        assert_eq!(info.router_address.as_deref(), Some("192.168.1.1"));
    }

    #[test]
    fn strict_mode_unknown_interface_is_partial() {
        let store = FakeStore::default();
        let info = select_environment(&store, &FakeLeases::default(), Some("wlan9"));
        assert_eq!(info.interface, "wlan9");
        assert_eq!(info.service_id, None);
        assert!(!info.wireless);
    }

    #[test]
    fn strict_mode_tunnel_falls_back_to_wireless() {
        let store = FakeStore {
            services: vec![
                service("utun3", "svc-vpn", Some("10.8.0.1"), 0),
                service("wlan0", "svc-wifi", Some("192.168.1.1"), 1),
            ],
            wireless: vec!["wlan0".to_string()],
            ..FakeStore::default()
        };
        let info = select_environment(&store, &FakeLeases::default(), Some("utun3"));
        assert_eq!(info.interface, "wlan0");
        assert!(info.wireless);
    }

    #[test]
    fn auto_mode_prefers_wireless_primary() {
        let store = FakeStore {
            primary: Some(PrimaryService {
                interface: "wlan0".to_string(),
                service_id: "svc-wifi".to_string(),
                router_address: Some("192.168.1.1".to_string()),
            }),
            services: vec![service("wlan0", "svc-wifi", Some("192.168.1.1"), 0)],
            wireless: vec!["wlan0".to_string()],
            ..FakeStore::default()
        };
        let info = select_environment(&store, &FakeLeases::default(), None);
        assert_eq!(info.interface, "wlan0");
        assert!(info.wireless);
    }

    #[test]
    fn auto_mode_skips_wired_primary_and_ranks_candidates() {
        let store = FakeStore {
            primary: Some(PrimaryService {
                interface: "eth0".to_string(),
                service_id: "svc-wired".to_string(),
                router_address: Some("10.0.0.1".to_string()),
            }),
            services: vec![
                service("eth0", "svc-wired", Some("10.0.0.1"), 0),
                service("wlan1", "svc-b", None, 1),
                service("wlan0", "svc-a", Some("192.168.1.1"), 2),
            ],
            wireless: vec!["wlan0".to_string(), "wlan1".to_string()],
            ..FakeStore::default()
        };
        let info = select_environment(&store, &FakeLeases::default(), None);
        // Router-bearing wireless service wins despite later service order.
        assert_eq!(info.interface, "wlan0");
    }

    #[test]
    fn auto_mode_never_selects_a_tunnel() {
        let store = FakeStore {
            services: vec![service("utun0", "svc-vpn", Some("10.8.0.1"), 0)],
            wireless: vec!["utun0".to_string()],
            ..FakeStore::default()
        };
        let info = select_environment(&store, &FakeLeases::default(), None);
        assert_eq!(info, EnvironmentInfo::default());
    }

    #[test]
    fn auto_mode_service_order_then_name_breaks_ties() {
        let store = FakeStore {
            services: vec![
                service("wlan1", "svc-b", Some("192.168.1.1"), 1),
                service("wlan0", "svc-a", Some("192.168.1.1"), 1),
            ],
            wireless: vec!["wlan0".to_string(), "wlan1".to_string()],
            ..FakeStore::default()
        };
        let info = select_environment(&store, &FakeLeases::default(), None);
        assert_eq!(info.interface, "wlan0");
    }

    #[test]
    fn dhcp_runtime_record_wins_with_alternate_spelling() {
        let mut dhcp = BTreeMap::new();
        dhcp.insert(
            "svc-wifi".to_string(),
            BTreeMap::from([("server_identifier".to_string(), "192.168.1.1".to_string())]),
        );
        let store = FakeStore {
            services: vec![service("wlan0", "svc-wifi", Some("192.168.1.1"), 0)],
            wireless: vec!["wlan0".to_string()],
            dhcp,
            ..FakeStore::default()
        };
        let info = select_environment(&store, &FakeLeases::default(), Some("wlan0"));
        assert_eq!(info.dhcp_server_address.as_deref(), Some("192.168.1.1"));
        assert_eq!(info.dhcp_discovery_method.as_deref(), Some(DHCP_METHOD_RUNTIME));
        assert_eq!(info.dhcp_origin, Some(FieldOrigin::RuntimeStore));
    }

    #[test]
    fn dhcp_falls_back_to_alternate_then_leases_then_router() {
        // Alternate record variant.
        let mut dhcp_alt = BTreeMap::new();
        dhcp_alt.insert(
            "svc-wifi".to_string(),
            BTreeMap::from([("SERVER_ADDRESS".to_string(), "192.168.1.2".to_string())]),
        );
        let store = FakeStore {
            services: vec![service("wlan0", "svc-wifi", Some("192.168.1.1"), 0)],
            wireless: vec!["wlan0".to_string()],
            dhcp_alt,
            ..FakeStore::default()
        };
        let info = select_environment(&store, &FakeLeases::default(), Some("wlan0"));
        assert_eq!(info.dhcp_server_address.as_deref(), Some("192.168.1.2"));
        assert_eq!(
            info.dhcp_discovery_method.as_deref(),
            Some(DHCP_METHOD_RUNTIME_ALTERNATE)
        );

        // Lease history when the runtime store has nothing.
        let store = FakeStore {
            services: vec![service("wlan0", "svc-wifi", Some("192.168.1.1"), 0)],
            wireless: vec!["wlan0".to_string()],
            ..FakeStore::default()
        };
        let leases = FakeLeases {
            by_interface: BTreeMap::from([("wlan0".to_string(), "192.168.1.3".to_string())]),
        };
        let info = select_environment(&store, &leases, Some("wlan0"));
        assert_eq!(info.dhcp_server_address.as_deref(), Some("192.168.1.3"));
        assert_eq!(info.dhcp_origin, Some(FieldOrigin::LeaseHistory));

        // Router heuristic when nothing else is known.
        let store = FakeStore {
            services: vec![service("wlan0", "svc-wifi", Some("192.168.1.1"), 0)],
            wireless: vec!["wlan0".to_string()],
            ..FakeStore::default()
        };
        let info = select_environment(&store, &FakeLeases::default(), Some("wlan0"));
        assert_eq!(info.dhcp_server_address.as_deref(), Some("192.168.1.1"));
        assert_eq!(
            info.dhcp_discovery_method.as_deref(),
            Some(DHCP_METHOD_ROUTER_FALLBACK)
        );
        assert_eq!(info.dhcp_origin, Some(FieldOrigin::Heuristic));
    }

    #[test]
    fn empty_store_yields_zero_environment() {
        let info = select_environment(&FakeStore::default(), &FakeLeases::default(), None);
        assert_eq!(info, EnvironmentInfo::default());
    }

    #[test]
    fn record_keys_match_case_insensitively() {
        let record = BTreeMap::from([("DHCP-Server-Identifier".to_string(), "1.2.3.4".to_string())]);
        assert_eq!(dhcp_server_from_record(&record).as_deref(), Some("1.2.3.4"));
        let empty = BTreeMap::from([("ServerIdentifier".to_string(), "  ".to_string())]);
        assert_eq!(dhcp_server_from_record(&empty), None);
    }
}
