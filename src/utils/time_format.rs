use std::time::Duration;

/// Formats a playback offset for the elapsed/remaining labels.
///
/// Offsets under an hour render as `mm:ss`, longer ones as `h:mm:ss`.
/// Negative offsets (time remaining) get a leading `-`.
pub fn format_offset(millis: i64) -> String {
    let sign = if millis < 0 { "-" } else { "" };
    let total_secs = millis.unsigned_abs() / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}{}:{:02}:{:02}", sign, hours, minutes, seconds)
    } else {
        format!("{}{:02}:{:02}", sign, minutes, seconds)
    }
}

pub fn format_elapsed(elapsed: Duration) -> String {
    format_offset(elapsed.as_millis() as i64)
}

pub fn format_remaining(remaining: Duration) -> String {
    format_offset(-(remaining.as_millis() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_offsets_use_minutes_and_seconds() {
        assert_eq!(format_offset(0), "00:00");
        assert_eq!(format_offset(65_000), "01:05");
        assert_eq!(format_offset(59 * 60 * 1000 + 59_999), "59:59");
    }

    #[test]
    fn test_long_offsets_include_hours() {
        assert_eq!(format_offset(3_600_000), "1:00:00");
        assert_eq!(format_offset(2 * 3_600_000 + 5 * 60_000 + 7_000), "2:05:07");
    }

    #[test]
    fn test_remaining_is_negative() {
        assert_eq!(format_remaining(Duration::from_secs(90)), "-01:30");
        assert_eq!(format_remaining(Duration::ZERO), "00:00");
        assert_eq!(format_elapsed(Duration::from_secs(3725)), "1:02:05");
    }
}
