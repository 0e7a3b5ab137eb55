//! Deterministic JSON rendering of a resolved snapshot
//!
//! Output is byte-identical for identical inputs: `state` first, `iface`
//! second, then every present field in ascending key order. With provenance
//! enabled each field is immediately followed by `<key>Source`; `state`
//! itself never carries a source tag. Absent fields are omitted entirely.

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};

use crate::models::{field, Provenance, Snapshot};

/// Builds the ordered JSON object for one snapshot.
pub fn render_snapshot_value(
    snapshot: &Snapshot,
    provenance: &Provenance,
    with_provenance: bool,
) -> Value {
    let mut out = Map::new();
    out.insert("state".to_string(), json!(snapshot.state.as_str()));
    insert_field(
        &mut out,
        field::IFACE,
        json!(snapshot.interface),
        provenance,
        with_provenance,
    );

    let mut pairs = present_fields(snapshot);
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    for (key, value) in pairs {
        insert_field(&mut out, key, value, provenance, with_provenance);
    }

    Value::Object(out)
}

/// Renders the snapshot to its final textual form.
pub fn render_snapshot(
    snapshot: &Snapshot,
    provenance: &Provenance,
    with_provenance: bool,
    compact: bool,
) -> Result<String> {
    let value = render_snapshot_value(snapshot, provenance, with_provenance);
    let rendered = if compact {
        serde_json::to_string(&value)
    } else {
        serde_json::to_string_pretty(&value)
    };
    rendered.context("failed to serialize status snapshot")
}

fn insert_field(
    out: &mut Map<String, Value>,
    key: &str,
    value: Value,
    provenance: &Provenance,
    with_provenance: bool,
) {
    out.insert(key.to_string(), value);
    if with_provenance {
        if let Some(origin) = provenance.get(key) {
            out.insert(format!("{key}Source"), json!(origin.as_str()));
        }
    }
}

/// Every populated optional field as a key/value pair, unordered.
fn present_fields(snapshot: &Snapshot) -> Vec<(&'static str, Value)> {
    let mut pairs = Vec::new();
    if let Some(v) = &snapshot.service_id {
        pairs.push((field::SERVICE_ID, json!(v)));
    }
    if let Some(v) = &snapshot.name {
        pairs.push((field::NAME, json!(v)));
    }
    if let Some(v) = &snapshot.name_last_seen {
        pairs.push((field::NAME_LAST_SEEN, json!(v.to_rfc3339())));
    }
    if let Some(v) = &snapshot.hardware_address {
        pairs.push((field::HARDWARE_ADDRESS, json!(v)));
    }
    if let Some(v) = snapshot.channel {
        pairs.push((field::CHANNEL, json!(v)));
    }
    if let Some(v) = snapshot.band {
        pairs.push((field::BAND, json!(v.as_str())));
    }
    if let Some(v) = &snapshot.phy_mode {
        pairs.push((field::PHY_MODE, json!(v)));
    }
    if let Some(v) = &snapshot.security {
        pairs.push((field::SECURITY, json!(v)));
    }
    if let Some(v) = &snapshot.country_code {
        pairs.push((field::COUNTRY_CODE, json!(v)));
    }
    if let Some(v) = &snapshot.router_address {
        pairs.push((field::ROUTER_ADDRESS, json!(v)));
    }
    if let Some(v) = &snapshot.dhcp_server_address {
        pairs.push((field::DHCP_SERVER_ADDRESS, json!(v)));
    }
    if let Some(v) = &snapshot.dhcp_discovery_method {
        pairs.push((field::DHCP_DISCOVERY_METHOD, json!(v)));
    }
    if let Some(v) = snapshot.signal_dbm {
        pairs.push((field::SIGNAL, json!(v)));
    }
    if let Some(v) = snapshot.noise_dbm {
        pairs.push((field::NOISE, json!(v)));
    }
    if let Some(v) = snapshot.snr_db {
        pairs.push((field::SNR, json!(v)));
    }
    if let Some(v) = snapshot.tx_rate_mbps {
        pairs.push((field::TX_RATE, json!(v)));
    }
    pairs
}
