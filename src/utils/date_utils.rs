use chrono::{NaiveDate, NaiveTime, Utc};

/// The queue day. Dates are taken in UTC, matching how appointment dates are stamped.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// `Monday, October 19, 2026`
pub fn long_date_label(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// `Oct 19`
pub fn short_date_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

pub fn format_clinic_hours(start: NaiveTime, end: NaiveTime) -> String {
    format!("{} - {}", start.format("%H:%M"), end.format("%H:%M"))
}

/// Accepts form input (`09:30`) as well as backend values (`09:30:00`).
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_labels() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(long_date_label(date), "Monday, October 19, 2026");
        assert_eq!(short_date_label(date), "Oct 19");
    }

    #[test]
    fn parses_form_and_backend_times() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert_eq!(parse_time_of_day("09:00"), Some(nine));
        assert_eq!(parse_time_of_day("09:00:00"), Some(nine));
        assert_eq!(parse_time_of_day("9am"), None);
        assert_eq!(
            format_clinic_hours(nine, NaiveTime::from_hms_opt(17, 30, 0).unwrap()),
            "09:00 - 17:30"
        );
    }
}
