use chrono::{DateTime, NaiveDate, Utc};

/// Calendar-day membership in UTC.
pub fn is_same_day(instant: DateTime<Utc>, date: NaiveDate) -> bool {
    instant.date_naive() == date
}

/// Builds a UTC instant on `date`, returning `None` for out-of-range clock values.
pub fn at_time(date: NaiveDate, hour: u32, minute: u32) -> Option<DateTime<Utc>> {
    date.and_hms_opt(hour, minute, 0).map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midnight_belongs_to_the_next_day() {
        let date = NaiveDate::from_ymd_opt(2030, 3, 14).unwrap();
        let next = NaiveDate::from_ymd_opt(2030, 3, 15).unwrap();
        let midnight = at_time(next, 0, 0).unwrap();

        assert!(!is_same_day(midnight, date));
        assert!(is_same_day(midnight, next));
    }

    #[test]
    fn at_time_rejects_invalid_clock() {
        let date = NaiveDate::from_ymd_opt(2030, 3, 14).unwrap();
        assert!(at_time(date, 24, 0).is_none());
        assert!(is_same_day(at_time(date, 23, 59).unwrap(), date));
    }
}
