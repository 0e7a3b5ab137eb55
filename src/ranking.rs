//! Historical-profile ranking heuristics
//!
//! Recovers redacted identity fields (network name, hardware address,
//! security/PHY) from persisted records. Pure functions over immutable
//! candidate slices with deterministic tie-breaks: name inference uses the
//! only continuous score in the system; everything else uses integer ranks.

use chrono::{DateTime, TimeZone, Utc};

use crate::config::{
    is_placeholder_hardware_address, SCORE_CAP, SCORE_CHANNEL_BONUS, SCORE_DHCP_SIGNATURE,
    SCORE_RECORD_ROUTER_FALLBACK, SCORE_ROUTER_SIGNATURE,
};
use crate::models::{AddressEntry, ProfileRecord};

/// Winning candidate of the name inference.
#[derive(Debug, Clone, PartialEq)]
pub struct NameMatch {
    pub name: String,
    pub score: f64,
    /// Most recent activity recorded for the winning profile.
    pub last_seen: Option<DateTime<Utc>>,
}

fn epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(0, 0).single().unwrap_or_default()
}

fn signature_matches(signature: Option<&str>, expected: Option<&str>) -> bool {
    match (signature, expected) {
        (Some(sig), Some(exp)) => !sig.is_empty() && sig == exp,
        _ => false,
    }
}

/// Score for one address entry against the environment evidence:
/// DHCP-signature match dominates, router-signature match is next, and a
/// channel match adds a small bonus, capped.
fn entry_score(
    entry: &AddressEntry,
    dhcp_server: Option<&str>,
    router: Option<&str>,
    channel: Option<u32>,
) -> f64 {
    let mut score = if signature_matches(entry.dhcp_signature.as_deref(), dhcp_server) {
        SCORE_DHCP_SIGNATURE
    } else if signature_matches(entry.router_signature.as_deref(), router) {
        SCORE_ROUTER_SIGNATURE
    } else {
        0.0
    };
    if channel.is_some() && entry.channel == channel {
        score += SCORE_CHANNEL_BONUS;
    }
    score.min(SCORE_CAP)
}

fn record_score(
    record: &ProfileRecord,
    dhcp_server: Option<&str>,
    router: Option<&str>,
    channel: Option<u32>,
) -> f64 {
    let best_entry = record
        .entries
        .iter()
        .map(|e| entry_score(e, dhcp_server, router, channel))
        .fold(0.0_f64, f64::max);
    if best_entry > 0.0 {
        return best_entry;
    }
    if signature_matches(record.router_signature.as_deref(), router) {
        return SCORE_RECORD_ROUTER_FALLBACK;
    }
    0.0
}

/// Infers a redacted network name from historical records.
///
/// Highest score wins; ties break toward the most recently active record
/// (epoch when a record carries no timestamps). Zero-score records are
/// discarded.
pub fn infer_name(
    records: &[ProfileRecord],
    dhcp_server: Option<&str>,
    router: Option<&str>,
    channel: Option<u32>,
) -> Option<NameMatch> {
    let mut best: Option<(f64, DateTime<Utc>, &ProfileRecord)> = None;
    for record in records {
        let score = record_score(record, dhcp_server, router, channel);
        if score <= 0.0 {
            continue;
        }
        let activity = record.latest_activity().unwrap_or_else(epoch);
        let candidate = (score, activity, record);
        best = match best {
            None => Some(candidate),
            Some(current) => {
                if score > current.0 || (score == current.0 && activity > current.1) {
                    Some(candidate)
                } else {
                    Some(current)
                }
            }
        };
    }
    best.map(|(score, _, record)| NameMatch {
        name: record.name.clone(),
        score,
        last_seen: record.latest_activity(),
    })
}

/// Infers the hardware address for an already-resolved network name.
///
/// Ranks every non-placeholder entry across records bearing that name:
/// 3 for a DHCP-signature match, 2 for a router-signature match, 1 for a
/// channel match, 0 otherwise; ties break toward the latest timestamp.
pub fn infer_hardware_address(
    records: &[ProfileRecord],
    name: &str,
    dhcp_server: Option<&str>,
    router: Option<&str>,
    channel: Option<u32>,
) -> Option<String> {
    let mut best: Option<(u8, DateTime<Utc>, &AddressEntry)> = None;
    for record in records.iter().filter(|r| r.name == name) {
        for entry in &record.entries {
            if is_placeholder_hardware_address(&entry.hardware_address) {
                continue;
            }
            let rank = if signature_matches(entry.dhcp_signature.as_deref(), dhcp_server) {
                3
            } else if signature_matches(entry.router_signature.as_deref(), router) {
                2
            } else if channel.is_some() && entry.channel == channel {
                1
            } else {
                0
            };
            let seen = entry.last_associated_at.unwrap_or_else(epoch);
            best = match best {
                None => Some((rank, seen, entry)),
                Some(current) => {
                    if rank > current.0 || (rank == current.0 && seen > current.1) {
                        Some((rank, seen, entry))
                    } else {
                        Some(current)
                    }
                }
            };
        }
    }
    best.map(|(_, _, entry)| entry.hardware_address.clone())
}

/// Infers security type and PHY mode for an already-resolved name.
///
/// When several records share the name, the one with the most recent
/// activity wins; its security descriptor is normalized to the canonical
/// label set.
pub fn infer_security(
    records: &[ProfileRecord],
    name: &str,
) -> Option<(Option<String>, Option<String>)> {
    let record = records
        .iter()
        .filter(|r| r.name == name)
        .max_by_key(|r| r.latest_activity().unwrap_or_else(epoch))?;
    let security = record.security.as_deref().map(normalize_security);
    let phy_mode = record.phy_mode.clone();
    if security.is_none() && phy_mode.is_none() {
        return None;
    }
    Some((security, phy_mode))
}

/// Normalizes a textual security descriptor to the canonical label set.
/// Unrecognized descriptors pass through unchanged.
pub fn normalize_security(raw: &str) -> String {
    let lower = raw.to_lowercase();
    let has = |needle: &str| lower.contains(needle);

    if has("wpa3") && has("wpa2") {
        "WPA2/WPA3".to_string()
    } else if has("wpa3") {
        "WPA3-Personal".to_string()
    } else if has("wpa2") && (has("wpa/") || has("mixed") || has("wpa ")) {
        "WPA/WPA2 Mixed".to_string()
    } else if has("wpa2") {
        "WPA2-Personal".to_string()
    } else if has("wpa") {
        "WPA-Personal".to_string()
    } else if has("wep") {
        "WEP".to_string()
    } else if has("open") || has("none") {
        "Open".to_string()
    } else {
        raw.to_string()
    }
}
