use chrono::{Datelike, Duration, NaiveDate, Weekday};
use shared::TimeSlot;

/// A selectable date: the ISO value sent on the wire plus the label shown
/// in the picker ("Sat, Jun 1").
#[derive(Debug, Clone, PartialEq)]
pub struct DateOption {
    pub value: NaiveDate,
    pub label: String,
}

/// Booking window offered by the pickers: today plus the next 29 days.
pub const BOOKING_WINDOW_DAYS: i64 = 30;

pub fn upcoming_dates(from: NaiveDate) -> Vec<DateOption> {
    (0..BOOKING_WINDOW_DAYS)
        .map(|offset| {
            let value = from + Duration::days(offset);
            DateOption { value, label: short_date_label(value) }
        })
        .collect()
}

/// "Sat, Jun 1" — weekday, short month, day of month.
pub fn short_date_label(date: NaiveDate) -> String {
    format!(
        "{}, {} {}",
        weekday_abbrev(date.weekday()),
        month_abbrev(date.month()),
        date.day()
    )
}

/// "Sat, Jun 1 at 10:00 AM" for cart rows and the conflict modal; an
/// unscheduled booking renders as "No date selected".
pub fn schedule_label(date: Option<NaiveDate>, time: Option<TimeSlot>) -> String {
    match (date, time) {
        (Some(date), Some(time)) => format!("{} at {}", short_date_label(date), time.display()),
        (Some(date), None) => short_date_label(date),
        (None, Some(time)) => time.display().to_string(),
        (None, None) => "No date selected".to_string(),
    }
}

fn weekday_abbrev(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

fn month_abbrev(month: u32) -> &'static str {
    match month {
        1 => "Jan", 2 => "Feb", 3 => "Mar", 4 => "Apr",
        5 => "May", 6 => "Jun", 7 => "Jul", 8 => "Aug",
        9 => "Sep", 10 => "Oct", 11 => "Nov", 12 => "Dec",
        _ => "Jan",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_upcoming_dates_covers_the_booking_window() {
        let options = upcoming_dates(date("2024-06-01"));
        assert_eq!(options.len(), 30);
        assert_eq!(options[0].value, date("2024-06-01"));
        assert_eq!(options[29].value, date("2024-06-30"));
    }

    #[test]
    fn test_short_date_label() {
        assert_eq!(short_date_label(date("2024-06-01")), "Sat, Jun 1");
        assert_eq!(short_date_label(date("2024-12-25")), "Wed, Dec 25");
    }

    #[test]
    fn test_schedule_label_variants() {
        assert_eq!(
            schedule_label(Some(date("2024-06-01")), Some(TimeSlot::TenAm)),
            "Sat, Jun 1 at 10:00 AM"
        );
        assert_eq!(schedule_label(Some(date("2024-06-01")), None), "Sat, Jun 1");
        assert_eq!(schedule_label(None, None), "No date selected");
    }
}
