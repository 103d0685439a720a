//! Wall-clock display helpers

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone};

/// Hours and minutes, 24-hour
pub const CLOCK_FORMAT: &str = "%H:%M";

pub fn format_clock<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.format(CLOCK_FORMAT).to_string()
}

/// Current local time as shown on the clock face
pub fn now_display() -> String {
    format_clock(&Local::now())
}

/// Message shown when the clock is tapped
pub fn tap_message(time: &str) -> String {
    format!("Current time: {}", time)
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn formats_hours_and_minutes() {
        let time = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 59).unwrap();
        assert_eq!(format_clock(&time), "07:05");

        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(format_clock(&time.with_timezone(&offset)), "16:05");
    }

    #[test]
    fn tap_message_includes_time() {
        assert_eq!(tap_message("13:37"), "Current time: 13:37");
    }
}
