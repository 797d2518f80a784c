//! Generation capacity rendering and parsing.

use std::sync::OnceLock;

use log::warn;
use regex::Regex;

/// Unit ladder for watt-derived display values, largest first.
const UNITS: &[(i64, &str)] = &[
    (1_000_000_000_000_000, "PW"),
    (1_000_000_000_000, "TW"),
    (1_000_000_000, "GW"),
    (1_000_000, "MW"),
    (1_000, "kW"),
    (1, "W"),
];

/// Compiled regex for power strings like "20.6 PW" or "1000 kW".
static POWER_PATTERN: OnceLock<Regex> = OnceLock::new();

fn power_regex() -> &'static Regex {
    POWER_PATTERN.get_or_init(|| {
        Regex::new(r"^([\d.]+)\s*([a-zA-Z]+W?)$").expect("invalid power string pattern")
    })
}

/// Format a watt count with the largest unit it reaches.
///
/// Precision shrinks as the leading value grows: two decimals below 10,
/// one decimal below 100, none from 100 up. The caller is responsible for
/// the ticks-to-watts conversion (raw counts arrive in 1/60 W units).
pub fn format_generation_capacity(watts: i64) -> String {
    for &(threshold, unit) in UNITS {
        if watts >= threshold {
            let value = watts as f64 / threshold as f64;
            return if value >= 100.0 {
                format!("{value:.0} {unit}")
            } else if value >= 10.0 {
                format!("{value:.1} {unit}")
            } else {
                format!("{value:.2} {unit}")
            };
        }
    }
    format!("{watts} W")
}

/// Parse a display power string back to integer watts.
///
/// Accepts the formatter's own output plus minor variations seen in the
/// wild: embedded thousands separators, any unit casing, and a missing
/// trailing "W" ("100 k"). Unparsable strings log a warning and yield 0 so
/// one odd row never aborts an aggregation pass.
pub fn parse_power_to_watts(power: &str) -> i64 {
    let normalized = power.trim().replace(',', "");

    let Some(caps) = power_regex().captures(&normalized) else {
        warn!("Could not parse power string: {power}");
        return 0;
    };

    let Ok(value) = caps[1].parse::<f64>() else {
        warn!("Could not parse power value: {power}");
        return 0;
    };

    let mut unit = caps[2].trim().to_ascii_lowercase();
    if !unit.ends_with('w') {
        unit.push('w');
    }

    let multiplier: i64 = match unit.as_str() {
        "pw" => 1_000_000_000_000_000,
        "tw" => 1_000_000_000_000,
        "gw" => 1_000_000_000,
        "mw" => 1_000_000,
        "kw" => 1_000,
        _ => 1,
    };

    (value * multiplier as f64) as i64
}
