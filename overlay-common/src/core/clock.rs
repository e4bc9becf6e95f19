//! Display strings for the wall-clock overlay.

use chrono::{DateTime, Datelike, TimeZone, Timelike};

const WEEKDAYS: [&str; 7] = [
    "星期日",
    "星期一",
    "星期二",
    "星期三",
    "星期四",
    "星期五",
    "星期六",
];
const SHORT_WEEKDAYS: [&str; 7] = ["周日", "周一", "周二", "周三", "周四", "周五", "周六"];

/// How the date line is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `2026年8月6日`
    Cn,
    /// `2026/08/06`
    Slash,
}

/// Formatting options for the clock overlay.
#[derive(Debug, Clone, Copy)]
pub struct ClockFormat {
    pub show_seconds: bool,
    pub short_weekday: bool,
    pub date_style: DateStyle,
}

impl Default for ClockFormat {
    fn default() -> Self {
        Self {
            show_seconds: true,
            short_weekday: false,
            date_style: DateStyle::Cn,
        }
    }
}

/// The three strings the clock overlay paints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockStrings {
    /// `HH:MM:SS`, or `HH:MM` with seconds off.
    pub time: String,
    pub date: String,
    pub weekday: String,
}

impl ClockStrings {
    pub fn compute<Tz: TimeZone>(now: &DateTime<Tz>, format: &ClockFormat) -> Self {
        let time = if format.show_seconds {
            format!("{:02}:{:02}:{:02}", now.hour(), now.minute(), now.second())
        } else {
            format!("{:02}:{:02}", now.hour(), now.minute())
        };

        let date = match format.date_style {
            DateStyle::Cn => format!("{}年{}月{}日", now.year(), now.month(), now.day()),
            DateStyle::Slash => format!("{}/{:02}/{:02}", now.year(), now.month(), now.day()),
        };

        let day_index = now.weekday().num_days_from_sunday() as usize;
        let weekday = if format.short_weekday {
            SHORT_WEEKDAYS[day_index]
        } else {
            WEEKDAYS[day_index]
        };

        Self {
            time,
            date,
            weekday: weekday.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_full_format() {
        // 2024-03-09 is a Saturday
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 8, 5, 3).unwrap();
        let strings = ClockStrings::compute(&now, &ClockFormat::default());
        assert_eq!(strings.time, "08:05:03");
        assert_eq!(strings.date, "2024年3月9日");
        assert_eq!(strings.weekday, "星期六");
    }

    #[test]
    fn test_seconds_hidden() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 8, 5, 3).unwrap();
        let format = ClockFormat {
            show_seconds: false,
            ..ClockFormat::default()
        };
        assert_eq!(ClockStrings::compute(&now, &format).time, "08:05");
    }

    #[test]
    fn test_slash_date_and_short_weekday() {
        let now = Utc.with_ymd_and_hms(2024, 12, 1, 23, 59, 0).unwrap();
        let format = ClockFormat {
            short_weekday: true,
            date_style: DateStyle::Slash,
            ..ClockFormat::default()
        };
        let strings = ClockStrings::compute(&now, &format);
        assert_eq!(strings.date, "2024/12/01");
        assert_eq!(strings.weekday, "周日");
    }
}
