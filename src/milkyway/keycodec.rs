//! Seed key packing and unpacking.
//!
//! The server identifies a galaxy configuration with a single 64-bit
//! "seed key" whose decimal digits pack four fields:
//!
//! ```text
//! seed key = seed * 10^8  +  stars * 10^5  +  mult_raw * 10^3  +  diff_raw
//!            └ galaxy seed ┘  └ 3 digits ┘    └ 2 digits ┘        └ 3 digits ┘
//! ```
//!
//! The two low fields additionally carry display conventions: a raw
//! multiplier of 99 means unlimited resources, and a raw difficulty below
//! 100 means peace mode.

/// The four fields recovered from a seed key.
///
/// `resource_multiplier` and `combat_difficulty` are the human-readable
/// renderings used throughout the reports; the raw digits are lossy once
/// rendered (see [`combat_difficulty_to_raw`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedKeyParts {
    pub seed: i64,
    pub stars: i32,
    pub resource_multiplier: String,
    pub combat_difficulty: String,
}

/// Unpack a seed key into its four fields.
pub fn decode_seed_key(seed_key: i64) -> SeedKeyParts {
    SeedKeyParts {
        seed: seed_key / 100_000_000,
        stars: ((seed_key / 100_000) % 1000) as i32,
        resource_multiplier: resource_multiplier(((seed_key / 1000) % 100) as i32),
        combat_difficulty: combat_difficulty((seed_key % 1000) as i32),
    }
}

/// Pack the four raw fields into a seed key.
///
/// Inverse of [`decode_seed_key`] on the raw integer fields; used to build
/// cluster page request URLs.
pub fn encode_seed_key(seed: i64, stars: i32, mult_raw: i32, diff_raw: i32) -> i64 {
    seed * 100_000_000 + i64::from(stars) * 100_000 + i64::from(mult_raw) * 1000 + i64::from(diff_raw)
}

/// Render a raw resource multiplier for display.
///
/// 99 is the sentinel for unlimited resources; any other raw value is
/// tenths of the multiplier.
pub fn resource_multiplier(raw: i32) -> String {
    if raw == 99 {
        "无限".to_string()
    } else {
        format!("{:.1}", f64::from(raw) / 10.0)
    }
}

/// Render a raw combat difficulty for display.
///
/// A raw value below 100 is peace mode; otherwise only the low two digits
/// are the displayed difficulty number (not zero-padded).
pub fn combat_difficulty(raw: i32) -> String {
    if raw / 100 == 0 {
        "和平模式".to_string()
    } else {
        (raw % 100).to_string()
    }
}

/// Recover the raw resource multiplier from its display string.
pub fn resource_multiplier_to_raw(display: &str) -> Option<i32> {
    if display == "无限" {
        return Some(99);
    }
    display.parse::<f64>().ok().map(|m| (m * 10.0) as i32)
}

/// Recover the raw combat difficulty from its display string.
///
/// The server's encoding is asymmetric here: a displayed single digit
/// reconstructs as "10"+digit (so "3" becomes 103) while longer numbers
/// reconstruct as "1"+digits (so "30" becomes 130). Raw values such as 230
/// are therefore unreachable from display strings, which matches the keys
/// the server actually hands out.
pub fn combat_difficulty_to_raw(display: &str) -> Option<i32> {
    if display == "和平模式" {
        return Some(0);
    }
    let reconstructed = if display.chars().count() == 1 {
        format!("10{display}")
    } else {
        format!("1{display}")
    };
    reconstructed.parse::<i32>().ok()
}
