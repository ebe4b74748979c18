use chrono::{DateTime, Utc};

use quiz_core::time::elapsed;

/// `m:ss`, or `h:mm:ss` past the hour.
#[must_use]
pub fn format_elapsed(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    let secs = elapsed(from, to).num_seconds();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::time::fixed_now;

    #[test]
    fn formats_minutes_and_hours() {
        let start = fixed_now();
        assert_eq!(format_elapsed(start, start + Duration::seconds(65)), "1:05");
        assert_eq!(format_elapsed(start, start + Duration::seconds(3_725)), "1:02:05");
        assert_eq!(format_elapsed(start, start), "0:00");
    }
}
