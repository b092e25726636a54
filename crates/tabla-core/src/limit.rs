//! How many channels the list shows.

use crate::model::ChannelRef;

pub const DEFAULT_CHANNEL_COUNT: usize = 10;
pub const MAX_CHANNEL_COUNT: usize = 2000;

/// Parse user-entered count text the way a browser number field reads it:
/// decimal or exponent notation, `0x`/`0o`/`0b` integers, and only the exact
/// spelling `Infinity` for infinity.  Empty or non-numeric text is `None`.
pub fn parse_requested_count(raw: Option<&str>) -> Option<f64> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }
    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        let digits = s
            .strip_prefix(prefix)
            .or_else(|| s.strip_prefix(prefix.to_ascii_uppercase().as_str()));
        if let Some(digits) = digits {
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                return None;
            }
            return u64::from_str_radix(digits, radix).ok().map(|n| n as f64);
        }
    }
    match s {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    // Rust also accepts "inf", "nan" and friends in any case; a browser does not.
    if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Absent, zero, negative or NaN requests fall back to the default; anything
/// positive is clamped to `1..=MAX_CHANNEL_COUNT` and floored.
pub fn effective_count(requested: Option<f64>) -> usize {
    match requested {
        Some(n) if n > 0.0 => n.clamp(1.0, MAX_CHANNEL_COUNT as f64).floor() as usize,
        _ => DEFAULT_CHANNEL_COUNT,
    }
}

/// First `effective_count(requested)` channels, in original order.
pub fn limit_channels(channels: &[ChannelRef], requested: Option<f64>) -> &[ChannelRef] {
    let n = effective_count(requested).min(channels.len());
    &channels[..n]
}
