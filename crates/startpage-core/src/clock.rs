//! Clock and date text.

use chrono::{Datelike, Timelike, Weekday};

use crate::settings::{ClockSeparator, TimeFormat};

/// Clock text such as `09:05`, `09:05:07`, or `9:05 PM` in 12-hour mode.
pub fn format_clock<T: Timelike>(
    time: &T,
    format: TimeFormat,
    show_seconds: bool,
    separator: ClockSeparator,
) -> String {
    let sep = separator.as_char();
    let mut text = match format {
        TimeFormat::TwentyFourHour => format!("{:02}{}{:02}", time.hour(), sep, time.minute()),
        TimeFormat::TwelveHour => {
            let (_, hour) = time.hour12();
            format!("{}{}{:02}", hour, sep, time.minute())
        }
    };
    if show_seconds {
        text.push(sep);
        text.push_str(&format!("{:02}", time.second()));
    }
    if format == TimeFormat::TwelveHour {
        let (pm, _) = time.hour12();
        text.push_str(if pm { " PM" } else { " AM" });
    }
    text
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "星期一",
        Weekday::Tue => "星期二",
        Weekday::Wed => "星期三",
        Weekday::Thu => "星期四",
        Weekday::Fri => "星期五",
        Weekday::Sat => "星期六",
        Weekday::Sun => "星期日",
    }
}

/// Date line under the clock, e.g. `2024年5月1日 星期三`.
pub fn format_date<D: Datelike>(date: &D) -> String {
    format!(
        "{}年{}月{}日 {}",
        date.year(),
        date.month(),
        date.day(),
        weekday_name(date.weekday())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn time(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_24_hour() {
        let t = time(9, 5, 7);
        assert_eq!(
            format_clock(&t, TimeFormat::TwentyFourHour, false, ClockSeparator::Colon),
            "09:05"
        );
        assert_eq!(
            format_clock(&t, TimeFormat::TwentyFourHour, true, ClockSeparator::Dot),
            "09.05.07"
        );
    }

    #[test]
    fn test_12_hour() {
        assert_eq!(
            format_clock(&time(21, 5, 0), TimeFormat::TwelveHour, false, ClockSeparator::Colon),
            "9:05 PM"
        );
        assert_eq!(
            format_clock(&time(0, 30, 15), TimeFormat::TwelveHour, true, ClockSeparator::Space),
            "12 30 15 AM"
        );
    }

    #[test]
    fn test_date_line() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(format_date(&date), "2024年5月1日 星期三");
    }
}
