//! Calendar helpers for month-anchored reporting windows.

use chrono::{Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};

/// First instant of the anchor's month (day 1, 00:00:00)
pub fn first_day_of_month(anchor: NaiveDate) -> NaiveDateTime {
    month_start(anchor).and_time(NaiveTime::MIN)
}

/// Last instant of the anchor's month (last day, 23:59:59.999999)
///
/// Transactions are stored at midnight, so every booking dated on the last
/// day of the month falls inside the window. `None` for the final month
/// chrono can represent, whose successor does not exist.
pub fn last_day_of_month(anchor: NaiveDate) -> Option<NaiveDateTime> {
    let next_month = month_start(anchor).checked_add_months(Months::new(1))?;
    Some(next_month.and_time(NaiveTime::MIN) - Duration::microseconds(1))
}

/// Full English month name of the anchor date (e.g. "June")
pub fn month_name(anchor: NaiveDate) -> String {
    anchor.format("%B").to_string()
}

fn month_start(anchor: NaiveDate) -> NaiveDate {
    anchor - Days::new(u64::from(anchor.day0()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_day_of_month() {
        let value = first_day_of_month(date(2020, 6, 15));
        assert_eq!(value, date(2020, 6, 1).and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_last_day_of_month() {
        let value = last_day_of_month(date(2020, 6, 15)).unwrap();
        assert_eq!(
            value,
            date(2020, 6, 30).and_hms_micro_opt(23, 59, 59, 999_999).unwrap()
        );
    }

    #[test]
    fn test_last_day_for_late_anchor_days() {
        // Anchors near the end of a 31-day month must stay in that month
        assert_eq!(last_day_of_month(date(2021, 1, 31)).unwrap().date(), date(2021, 1, 31));
        assert_eq!(last_day_of_month(date(2021, 1, 29)).unwrap().date(), date(2021, 1, 31));
        assert_eq!(last_day_of_month(date(2020, 12, 31)).unwrap().date(), date(2020, 12, 31));
    }

    #[test]
    fn test_last_day_of_february() {
        assert_eq!(last_day_of_month(date(2020, 2, 10)).unwrap().date(), date(2020, 2, 29));
        assert_eq!(last_day_of_month(date(2021, 2, 28)).unwrap().date(), date(2021, 2, 28));

        let end = last_day_of_month(date(2021, 2, 1)).unwrap();
        assert_eq!(end.hour(), 23);
        assert_eq!(end.nanosecond(), 999_999_000);
    }

    #[test]
    fn test_last_representable_month_has_no_end() {
        let final_month = first_day_of_month(NaiveDate::MAX).date();
        assert_eq!(final_month.day(), 1);
        assert_eq!(last_day_of_month(NaiveDate::MAX), None);
        assert_eq!(last_day_of_month(final_month), None);

        // The month before still closes on the eve of the final month
        let previous = final_month.pred_opt().unwrap();
        assert_eq!(
            last_day_of_month(previous),
            Some(final_month.and_time(NaiveTime::MIN) - Duration::microseconds(1))
        );
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(date(2020, 6, 1)), "June");
        assert_eq!(month_name(date(2019, 12, 31)), "December");
    }
}
