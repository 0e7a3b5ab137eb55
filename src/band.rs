//! Pure derived-field calculators: channel-to-band and SNR

use crate::models::Band;

/// Maps a channel number to its frequency band.
///
/// 6 GHz channel numbers collide with the 2.4 GHz range, so nothing is
/// inferred outside the unambiguous 2.4/5 GHz channel plans.
pub fn band_for_channel(channel: u32) -> Option<Band> {
    match channel {
        1..=14 => Some(Band::Band2_4Ghz),
        32..=177 => Some(Band::Band5Ghz),
        _ => None,
    }
}

/// Signal-to-noise ratio in dB from signal and noise levels in dBm.
pub fn snr_db(signal_dbm: i32, noise_dbm: i32) -> i32 {
    signal_dbm - noise_dbm
}
