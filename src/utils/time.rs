use chrono::Duration;

/// Renders a duration the way the dashboard shows tracked time: seconds under
/// a minute, minutes under an hour, hours and minutes beyond that.
pub fn format_duration(v: Duration) -> String {
    let seconds = v.num_seconds();
    if seconds < 60 {
        return format!("{seconds}s");
    }
    let minutes = seconds / 60;
    let hours = minutes / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes % 60)
    } else {
        format!("{minutes}m")
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::format_duration;

    #[test]
    fn formats_match_the_dashboard_convention() {
        assert_eq!(format_duration(Duration::seconds(0)), "0s");
        assert_eq!(format_duration(Duration::seconds(59)), "59s");
        assert_eq!(format_duration(Duration::seconds(60)), "1m");
        assert_eq!(format_duration(Duration::seconds(59 * 60)), "59m");
        assert_eq!(format_duration(Duration::seconds(3600)), "1h 0m");
        assert_eq!(format_duration(Duration::seconds(3600 + 90)), "1h 1m");
        assert_eq!(format_duration(Duration::seconds(26 * 3600)), "26h 0m");
    }
}
