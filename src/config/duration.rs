// src/config/duration.rs

use std::time::Duration;

use crate::errors::{Result, TimeboundError};

/// Parse a duration like `"10"`, `"1.5s"`, `"250ms"`, `"2m"`, `"1h"`, `"1d"`.
///
/// A bare number means seconds, as with GNU `timeout`.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return Err(invalid(s, "empty duration string"));
    }

    // Find the boundary between the number and the suffix.
    let idx = s
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
        .map(|(i, _)| i)
        .unwrap_or(s.len());

    let (num_part, unit_part) = s.split_at(idx);
    let value: f64 = num_part
        .parse()
        .map_err(|e| invalid(s, &format!("invalid number '{num_part}': {e}")))?;

    let secs = match unit_part.trim().to_lowercase().as_str() {
        "ms" => value / 1000.0,
        "" | "s" => value,
        "m" => value * 60.0,
        "h" => value * 60.0 * 60.0,
        "d" => value * 60.0 * 60.0 * 24.0,
        unit => {
            return Err(invalid(
                s,
                &format!("unsupported unit '{unit}'; expected ms, s, m, h or d"),
            ));
        }
    };

    Duration::try_from_secs_f64(secs).map_err(|e| invalid(s, &e.to_string()))
}

fn invalid(input: &str, reason: &str) -> TimeboundError {
    TimeboundError::ConfigError(format!("invalid duration '{input}': {reason}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_numbers_are_seconds() {
        assert_eq!(parse_duration("10").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
    }

    #[test]
    fn suffixes_and_fractions() {
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("0.5d").unwrap(), Duration::from_secs(43_200));
        assert_eq!(parse_duration(" 3S ").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn rejects_bad_input() {
        for s in ["", "s", "abc", "1x", "1.2.3s", "-1s"] {
            assert!(parse_duration(s).is_err(), "{s:?} should be rejected");
        }
    }
}
