//! Evidence resolver
//!
//! Orchestrates the providers under strict precedence (RuntimeStore >
//! RadioTelemetry > HardwareRegistry > KnownProfile > LeaseHistory >
//! Heuristic > Derived), runs the early-exit state gates, and scrubs stale
//! identity fields before stamping the final state. First writer wins: an
//! enrichment call only ever fills currently-empty fields.
//!
//! Channel presence alone is never association evidence — a radio can
//! report a cached channel while disassociated — so every gate keys off
//! live name/hardware-address facts or runtime-store evidence only.

use crate::band::{band_for_channel, snr_db};
use crate::config::is_placeholder_hardware_address;
use crate::models::{
    field, ConnectivityState, EnvironmentInfo, FieldOrigin, ProfileRecord, Provenance, Snapshot,
};
use crate::providers::Providers;
use crate::ranking;

/// A resolved snapshot plus its per-field origin tags.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub snapshot: Snapshot,
    pub provenance: Provenance,
}

/// Live-association truth derived from telemetry: `Some(true)` when the
/// radio reports a name or a real hardware address, `Some(false)` when it
/// reports neither, `None` when telemetry is unavailable or disabled.
fn pre_association_live(providers: &Providers, interface: &str) -> Option<bool> {
    if !providers.telemetry.is_enabled() {
        return None;
    }
    let facts = providers.telemetry.link_facts(interface)?;
    let has_name = facts.name.as_deref().is_some_and(|n| !n.is_empty());
    let has_address = facts
        .hardware_address
        .as_deref()
        .is_some_and(|a| !is_placeholder_hardware_address(a));
    Some(has_name || has_address)
}

/// Resolves one snapshot for the selected environment.
pub fn resolve(env: &EnvironmentInfo, providers: &Providers) -> Resolution {
    let mut snapshot = Snapshot::new(env.interface.clone(), ConnectivityState::Unassociated);
    let mut provenance = Provenance::new();

    // Interface and state are always present; their origin is fixed.
    provenance.set(field::IFACE, FieldOrigin::RuntimeStore);

    fill_environment(env, &mut snapshot, &mut provenance);

    // Gate 1: a powered-off radio short-circuits everything else.
    if providers.telemetry.is_enabled()
        && providers.telemetry.power_state(&env.interface) == Some(false)
    {
        snapshot.state = ConnectivityState::PowerOff;
        return Resolution { snapshot, provenance };
    }

    let has_runtime = has_runtime_evidence(&snapshot, &provenance);
    let pre_assoc_live = pre_association_live(providers, &env.interface);

    // Gate 2: a non-wireless interface can never be associated.
    if !env.wireless {
        snapshot.state = ConnectivityState::Unassociated;
        return Resolution { snapshot, provenance };
    }

    // Gate 3: telemetry confirmed no association and the runtime store
    // agrees; skip all enrichment.
    if pre_assoc_live == Some(false) && !has_runtime {
        snapshot.state = ConnectivityState::Unassociated;
        return Resolution { snapshot, provenance };
    }

    enrich(env, providers, &mut snapshot, &mut provenance);
    apply_scrub(env.wireless, &mut snapshot, &mut provenance);
    derive_fields(&mut snapshot, &mut provenance);
    stamp_state(env, providers, &mut snapshot, &provenance);

    Resolution { snapshot, provenance }
}

/// Step 1: runtime-store facts carried in by the selector.
fn fill_environment(env: &EnvironmentInfo, snapshot: &mut Snapshot, provenance: &mut Provenance) {
    if let Some(service_id) = &env.service_id {
        snapshot.service_id = Some(service_id.clone());
        provenance.set(field::SERVICE_ID, FieldOrigin::RuntimeStore);
    }
    if let Some(router) = &env.router_address {
        snapshot.router_address = Some(router.clone());
        provenance.set(field::ROUTER_ADDRESS, FieldOrigin::RuntimeStore);
    }
    if let (Some(server), Some(origin)) = (&env.dhcp_server_address, env.dhcp_origin) {
        snapshot.dhcp_server_address = Some(server.clone());
        provenance.set(field::DHCP_SERVER_ADDRESS, origin);
        if let Some(method) = &env.dhcp_discovery_method {
            snapshot.dhcp_discovery_method = Some(method.clone());
            provenance.set(field::DHCP_DISCOVERY_METHOD, origin);
        }
    }
}

fn has_runtime_evidence(snapshot: &Snapshot, provenance: &Provenance) -> bool {
    snapshot.router_address.is_some()
        || provenance.get(field::DHCP_SERVER_ADDRESS) == Some(FieldOrigin::RuntimeStore)
}

/// True when live telemetry supplied the name or hardware address. Channel
/// origin is deliberately not consulted.
fn has_live_association(provenance: &Provenance) -> bool {
    provenance.get(field::NAME) == Some(FieldOrigin::RadioTelemetry)
        || provenance.get(field::HARDWARE_ADDRESS) == Some(FieldOrigin::RadioTelemetry)
}

fn fill_string(
    target: &mut Option<String>,
    value: Option<String>,
    key: &str,
    origin: FieldOrigin,
    provenance: &mut Provenance,
) {
    if target.is_none() {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            *target = Some(value);
            provenance.set(key, origin);
        }
    }
}

/// Step 7: enrichment in precedence order; fills empty fields only.
fn enrich(
    env: &EnvironmentInfo,
    providers: &Providers,
    snapshot: &mut Snapshot,
    provenance: &mut Provenance,
) {
    if providers.telemetry.is_enabled() {
        if let Some(facts) = providers.telemetry.link_facts(&env.interface) {
            fill_string(
                &mut snapshot.name,
                facts.name,
                field::NAME,
                FieldOrigin::RadioTelemetry,
                provenance,
            );
            fill_string(
                &mut snapshot.hardware_address,
                facts
                    .hardware_address
                    .filter(|a| !is_placeholder_hardware_address(a)),
                field::HARDWARE_ADDRESS,
                FieldOrigin::RadioTelemetry,
                provenance,
            );
            if snapshot.channel.is_none() {
                if let Some(channel) = facts.channel {
                    snapshot.channel = Some(channel);
                    provenance.set(field::CHANNEL, FieldOrigin::RadioTelemetry);
                }
            }
            if snapshot.signal_dbm.is_none() {
                if let Some(signal) = facts.signal_dbm {
                    snapshot.signal_dbm = Some(signal);
                    provenance.set(field::SIGNAL, FieldOrigin::RadioTelemetry);
                }
            }
            if snapshot.noise_dbm.is_none() {
                if let Some(noise) = facts.noise_dbm {
                    snapshot.noise_dbm = Some(noise);
                    provenance.set(field::NOISE, FieldOrigin::RadioTelemetry);
                }
            }
            if snapshot.tx_rate_mbps.is_none() {
                if let Some(rate) = facts.tx_rate_mbps {
                    snapshot.tx_rate_mbps = Some(rate);
                    provenance.set(field::TX_RATE, FieldOrigin::RadioTelemetry);
                }
            }
            fill_string(
                &mut snapshot.country_code,
                facts.country_code,
                field::COUNTRY_CODE,
                FieldOrigin::RadioTelemetry,
                provenance,
            );
            fill_string(
                &mut snapshot.security,
                facts.security.as_deref().map(ranking::normalize_security),
                field::SECURITY,
                FieldOrigin::RadioTelemetry,
                provenance,
            );
            fill_string(
                &mut snapshot.phy_mode,
                facts.phy_mode,
                field::PHY_MODE,
                FieldOrigin::RadioTelemetry,
                provenance,
            );
        }
    }

    let registry = providers.registry.adapter_facts(&env.interface);
    if snapshot.channel.is_none() {
        if let Some(channel) = registry.channel {
            snapshot.channel = Some(channel);
            provenance.set(field::CHANNEL, FieldOrigin::HardwareRegistry);
        }
    }
    fill_string(
        &mut snapshot.country_code,
        registry.country_code,
        field::COUNTRY_CODE,
        FieldOrigin::HardwareRegistry,
        provenance,
    );
    fill_string(
        &mut snapshot.hardware_address,
        registry
            .hardware_address
            .filter(|a| !is_placeholder_hardware_address(a)),
        field::HARDWARE_ADDRESS,
        FieldOrigin::HardwareRegistry,
        provenance,
    );
    fill_string(
        &mut snapshot.name,
        registry.name,
        field::NAME,
        FieldOrigin::HardwareRegistry,
        provenance,
    );

    // Historical recovery only when identity fields are still missing; the
    // profile store read is the expensive path.
    if snapshot.name.is_some() && snapshot.hardware_address.is_some() && snapshot.security.is_some()
    {
        return;
    }
    recover_identity(env, providers, snapshot, provenance);
}

/// Step 7 continued: identity recovery from historical profiles, ordered
/// name, then hardware address, then security/PHY.
fn recover_identity(
    env: &EnvironmentInfo,
    providers: &Providers,
    snapshot: &mut Snapshot,
    provenance: &mut Provenance,
) {
    let mut candidates: Vec<ProfileRecord> = Vec::new();
    if providers.telemetry.is_enabled() {
        candidates.extend(providers.telemetry.connection_profiles(&env.interface));
    }
    candidates.extend_from_slice(providers.profiles.profiles());
    if candidates.is_empty() {
        return;
    }

    let dhcp = env.dhcp_server_address.as_deref();
    let router = env.router_address.as_deref();
    let channel = snapshot.channel;

    if snapshot.name.is_none() {
        if let Some(matched) = ranking::infer_name(&candidates, dhcp, router, channel) {
            tracing::debug!(
                "recovered network name from profiles (score {:.2})",
                matched.score
            );
            snapshot.name = Some(matched.name);
            provenance.set(field::NAME, FieldOrigin::KnownProfile);
            if let Some(seen) = matched.last_seen {
                snapshot.name_last_seen = Some(seen);
                provenance.set(field::NAME_LAST_SEEN, FieldOrigin::KnownProfile);
            }
        }
    }

    let Some(name) = snapshot.name.clone() else {
        return;
    };

    if snapshot.hardware_address.is_none() {
        if let Some(address) =
            ranking::infer_hardware_address(&candidates, &name, dhcp, router, channel)
        {
            snapshot.hardware_address = Some(address);
            provenance.set(field::HARDWARE_ADDRESS, FieldOrigin::KnownProfile);
        }
    }

    if snapshot.security.is_none() || snapshot.phy_mode.is_none() {
        if let Some((security, phy_mode)) = ranking::infer_security(&candidates, &name) {
            fill_string(
                &mut snapshot.security,
                security,
                field::SECURITY,
                FieldOrigin::KnownProfile,
                provenance,
            );
            fill_string(
                &mut snapshot.phy_mode,
                phy_mode,
                field::PHY_MODE,
                FieldOrigin::KnownProfile,
                provenance,
            );
        }
    }
}

/// Step 8: clears identity/telemetry fields once evidence shows the link is
/// not currently associated. Idempotent.
pub fn apply_scrub(wireless: bool, snapshot: &mut Snapshot, provenance: &mut Provenance) {
    let has_runtime = has_runtime_evidence(snapshot, provenance);
    let live = has_live_association(provenance);
    if (has_runtime || live) && wireless {
        return;
    }

    snapshot.name = None;
    snapshot.hardware_address = None;
    snapshot.signal_dbm = None;
    snapshot.noise_dbm = None;
    snapshot.snr_db = None;
    snapshot.tx_rate_mbps = None;
    snapshot.security = None;
    snapshot.phy_mode = None;
    snapshot.channel = None;
    snapshot.band = None;
    snapshot.name_last_seen = None;

    for key in [
        field::NAME,
        field::HARDWARE_ADDRESS,
        field::SIGNAL,
        field::NOISE,
        field::SNR,
        field::TX_RATE,
        field::SECURITY,
        field::PHY_MODE,
        field::CHANNEL,
        field::BAND,
        field::NAME_LAST_SEEN,
    ] {
        provenance.remove(key);
    }
}

/// Step 9: band and SNR, computed only when their inputs survived the scrub.
fn derive_fields(snapshot: &mut Snapshot, provenance: &mut Provenance) {
    if snapshot.band.is_none() {
        if let Some(band) = snapshot.channel.and_then(band_for_channel) {
            snapshot.band = Some(band);
            provenance.set(field::BAND, FieldOrigin::Derived);
        }
    }
    if snapshot.snr_db.is_none() {
        if let (Some(signal), Some(noise)) = (snapshot.signal_dbm, snapshot.noise_dbm) {
            snapshot.snr_db = Some(snr_db(signal, noise));
            provenance.set(field::SNR, FieldOrigin::Derived);
        }
    }
}

/// Step 10: final stamping.
fn stamp_state(
    env: &EnvironmentInfo,
    providers: &Providers,
    snapshot: &mut Snapshot,
    provenance: &Provenance,
) {
    if providers.telemetry.is_enabled()
        && providers.telemetry.power_state(&env.interface) == Some(false)
    {
        snapshot.state = ConnectivityState::PowerOff;
    } else if has_runtime_evidence(snapshot, provenance) {
        snapshot.state = ConnectivityState::AssociatedOnline;
    } else if has_live_association(provenance) {
        snapshot.state = ConnectivityState::AssociatedNoRuntime;
    } else {
        snapshot.state = ConnectivityState::Unassociated;
    }
}
