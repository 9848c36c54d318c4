//! Conversions between `HH:MM:SS` strings, whole seconds, and milliseconds.

/// Parse a `H:MM:SS`, `MM:SS`, or `SS` string into total seconds.
///
/// Missing higher units are padded with zero, so `"5:30"` is 5 minutes
/// 30 seconds. Returns `None` on any malformed token; callers substitute
/// a default rather than failing.
pub fn parse_time(text: &str) -> Option<u64> {
    let mut parts = Vec::new();
    for token in text.trim().split(':') {
        parts.push(token.trim().parse::<u64>().ok()?);
    }

    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    while parts.len() < 3 {
        parts.insert(0, 0);
    }

    Some(parts[0] * 3600 + parts[1] * 60 + parts[2])
}

/// Format total seconds as `HH:MM:SS`, zero-padded per field.
///
/// Hour counts past 99 widen the field rather than truncating.
pub fn format_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Format total seconds as a human `"<h>h <m>m <s>s"` label.
pub fn format_duration_label(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    format!("{}h {}m {}s", hours, minutes, secs)
}

/// Exact integer scaling to milliseconds.
pub fn seconds_to_millis(seconds: u64) -> u64 {
    seconds * 1000
}

/// Exact integer scaling from milliseconds (whole seconds at this boundary).
pub fn millis_to_seconds(millis: u64) -> u64 {
    millis / 1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_form() {
        assert_eq!(parse_time("01:02:03"), Some(3723));
        assert_eq!(parse_time("00:00:00"), Some(0));
    }

    #[test]
    fn test_parse_pads_missing_units() {
        assert_eq!(parse_time("90"), Some(90));
        assert_eq!(parse_time("5:30"), Some(330));
        assert_eq!(parse_time("1:00:00"), Some(3600));
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        assert_eq!(parse_time(" 00:01:30 "), Some(90));
    }

    #[test]
    fn test_parse_malformed_returns_none() {
        assert_eq!(parse_time(""), None);
        assert_eq!(parse_time("abc"), None);
        assert_eq!(parse_time("1:2:3:4"), None);
        assert_eq!(parse_time("1:xx:00"), None);
        assert_eq!(parse_time("-5"), None);
        assert_eq!(parse_time("1.5:00"), None);
    }

    #[test]
    fn test_format_zero_pads() {
        assert_eq!(format_time(0), "00:00:00");
        assert_eq!(format_time(90), "00:01:30");
        assert_eq!(format_time(3723), "01:02:03");
    }

    #[test]
    fn test_format_widens_large_hours() {
        // 4-digit hour counts still render
        assert_eq!(format_time(3600 * 1234), "1234:00:00");
    }

    #[test]
    fn test_round_trip_canonicalizes() {
        for input in ["00:01:30", "12:34:56", "99:59:59"] {
            let seconds = parse_time(input).unwrap();
            assert_eq!(format_time(seconds), input);
        }
        // Short forms canonicalize to the padded form
        assert_eq!(format_time(parse_time("90").unwrap()), "00:01:30");
    }

    #[test]
    fn test_duration_label() {
        assert_eq!(format_duration_label(90), "0h 1m 30s");
        assert_eq!(format_duration_label(3723), "1h 2m 3s");
        assert_eq!(format_duration_label(0), "0h 0m 0s");
    }

    #[test]
    fn test_millisecond_scaling() {
        assert_eq!(seconds_to_millis(90), 90_000);
        assert_eq!(millis_to_seconds(90_000), 90);
        assert_eq!(millis_to_seconds(seconds_to_millis(3600)), 3600);
    }
}
