//! Text formatting for box widgets.

const DAY_SECS: u64 = 24 * 60 * 60;

/// Formats an elapsed number of seconds as `"[Nd ]Hh Mm Ss"`.
///
/// Whole days are split off only while more than 24 hours remain, so exactly
/// one day prints as `"24h 0m 0s"`. The rest follows the compact `1h2m3s`
/// style, with one space after the hour and minute tokens. Leading zero
/// units are omitted (`"59s"`, `"1m 0s"`).
#[must_use]
pub fn format_seconds(seconds: u64) -> String {
    let mut remaining = seconds;
    let mut days = 0u64;
    while remaining > DAY_SECS {
        days += 1;
        remaining -= DAY_SECS;
    }

    let mut out = if days > 0 { format!("{days}d ") } else { String::new() };
    for ch in compact_hms(remaining).chars() {
        out.push(ch);
        if ch == 'h' || ch == 'm' {
            out.push(' ');
        }
    }
    out
}

/// `3661` -> `1h1m1s`, `61` -> `1m1s`, `0` -> `0s`.
fn compact_hms(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}h{minutes}m{secs}s")
    } else if minutes > 0 {
        format!("{minutes}m{secs}s")
    } else {
        format!("{secs}s")
    }
}

/// Formats a utilization rate with two decimals, e.g. `"42.00 %"`.
#[must_use]
pub fn format_percent(rate: f64) -> String {
    format!("{rate:.2} %")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_one_day_one_hour_one_minute_one_second() {
        assert_eq!(format_seconds(90_061), "1d 1h 1m 1s");
    }

    #[test]
    fn test_zero_has_no_day_prefix() {
        assert_eq!(format_seconds(0), "0s");
    }

    #[test]
    fn test_minutes_and_seconds_only() {
        assert_eq!(format_seconds(59), "59s");
        assert_eq!(format_seconds(60), "1m 0s");
        assert_eq!(format_seconds(3599), "59m 59s");
    }

    #[test]
    fn test_exactly_one_day_is_not_split() {
        assert_eq!(format_seconds(DAY_SECS), "24h 0m 0s");
        assert_eq!(format_seconds(DAY_SECS + 1), "1d 1s");
    }

    #[test]
    fn test_multiple_days() {
        assert_eq!(format_seconds(3 * DAY_SECS + 7200), "3d 2h 0m 0s");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(42.0), "42.00 %");
        assert_eq!(format_percent(3.14159), "3.14 %");
        assert_eq!(format_percent(100.0), "100.00 %");
    }

    fn parse_back(text: &str) -> u64 {
        text.split_whitespace()
            .map(|token| {
                let (value, unit) = token.split_at(token.len() - 1);
                let value: u64 = value.parse().unwrap();
                match unit {
                    "d" => value * DAY_SECS,
                    "h" => value * 3600,
                    "m" => value * 60,
                    "s" => value,
                    other => panic!("unexpected unit {other}"),
                }
            })
            .sum()
    }

    proptest! {
        #[test]
        fn prop_formatting_preserves_total(seconds in 0u64..10_000_000) {
            prop_assert_eq!(parse_back(&format_seconds(seconds)), seconds);
        }

        #[test]
        fn prop_day_prefix_only_past_one_day(seconds in 0u64..10_000_000) {
            let text = format_seconds(seconds);
            prop_assert_eq!(text.contains('d'), seconds > DAY_SECS);
            prop_assert!(text.ends_with('s'));
            prop_assert!(!text.contains("  "));
        }
    }
}
