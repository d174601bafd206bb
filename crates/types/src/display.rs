//! Formatting helpers for presentation layers.
//!
//! Nothing in the core depends on these; they exist so every view formats
//! countdowns the same way.

/// Format a countdown as `m:ss`.
pub fn format_countdown(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Percentage of a round that has elapsed, in `[0, 100]`.
pub fn progress_percent(time_remaining: u32, duration: u32) -> f64 {
    if duration == 0 {
        return 100.0;
    }
    let elapsed = duration.saturating_sub(time_remaining);
    elapsed as f64 * 100.0 / duration as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(60), "1:00");
        assert_eq!(format_countdown(15), "0:15");
        assert_eq!(format_countdown(0), "0:00");
        assert_eq!(format_countdown(305), "5:05");
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(60, 60), 0.0);
        assert_eq!(progress_percent(30, 60), 50.0);
        assert_eq!(progress_percent(0, 60), 100.0);
        assert_eq!(progress_percent(0, 0), 100.0);
    }
}
