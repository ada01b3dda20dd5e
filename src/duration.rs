//! Duration parsing utilities for human-readable durations like "30s", "2s",
//! "100ms".

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{de, Deserialize, Deserializer};

/// Parse a duration string like "60s", "2m", "100ms".
///
/// Supported units:
/// - `h` - hours
/// - `m` - minutes
/// - `s` - seconds
/// - `ms` - milliseconds
///
/// The input is case-insensitive and whitespace is trimmed.
///
/// # Examples
///
/// ```
/// use conciliador::duration::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(2 * 60 * 60));
/// assert_eq!(parse_duration("30m").unwrap(), Duration::from_secs(30 * 60));
/// assert_eq!(parse_duration("60s").unwrap(), Duration::from_secs(60));
/// assert_eq!(parse_duration("100ms").unwrap(), Duration::from_millis(100));
/// ```
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim().to_lowercase();
    // "ms" must be checked before "m" and "s".
    let (num, unit) = if s.ends_with("ms") {
        (s.trim_end_matches("ms"), "ms")
    } else if s.ends_with('h') {
        (s.trim_end_matches('h'), "h")
    } else if s.ends_with('m') {
        (s.trim_end_matches('m'), "m")
    } else if s.ends_with('s') {
        (s.trim_end_matches('s'), "s")
    } else {
        anyhow::bail!("Duration must end with h, m, s, or ms");
    };

    let num: u64 = num.parse().with_context(|| "Invalid number in duration")?;

    let millis = match unit {
        "h" => num
            .checked_mul(60 * 60 * 1000)
            .context("Duration is too large")?,
        "m" => num.checked_mul(60 * 1000).context("Duration is too large")?,
        "s" => num.checked_mul(1000).context("Duration is too large")?,
        "ms" => num,
        _ => unreachable!(),
    };

    Ok(Duration::from_millis(millis))
}

/// Format a duration to a human-readable string.
///
/// Uses the largest unit that divides the duration evenly.
///
/// # Examples
///
/// ```
/// use conciliador::duration::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_secs(2 * 60 * 60)), "2h");
/// assert_eq!(format_duration(Duration::from_secs(90)), "90s");
/// assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
/// ```
pub fn format_duration(d: Duration) -> String {
    let millis = d.as_millis();

    const MILLIS_PER_HOUR: u128 = 60 * 60 * 1000;
    const MILLIS_PER_MINUTE: u128 = 60 * 1000;
    const MILLIS_PER_SECOND: u128 = 1000;

    if millis >= MILLIS_PER_HOUR && millis % MILLIS_PER_HOUR == 0 {
        format!("{}h", millis / MILLIS_PER_HOUR)
    } else if millis >= MILLIS_PER_MINUTE && millis % MILLIS_PER_MINUTE == 0 {
        format!("{}m", millis / MILLIS_PER_MINUTE)
    } else if millis >= MILLIS_PER_SECOND && millis % MILLIS_PER_SECOND == 0 {
        format!("{}s", millis / MILLIS_PER_SECOND)
    } else {
        format!("{millis}ms")
    }
}

/// Serde deserializer for duration strings.
///
/// Use with `#[serde(deserialize_with = "deserialize_duration")]`.
pub fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_duration(&s).map_err(de::Error::custom)
}
