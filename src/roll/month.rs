use chrono::{Datelike, NaiveDate, Utc};

/// First day of the month containing `date`.
pub fn month_start_of(date: NaiveDate) -> NaiveDate {
    // with_day(1) cannot fail for day 1
    date.with_day(1).expect("day 1 is valid for every month")
}

/// The ledger key for "now": first day of the current month, UTC.
///
/// This is the only place the current month key is computed. It is derived
/// from the wall clock at call time, so callers cannot backdate a decision,
/// and on the 1st of a new month every staff member reverts to Pending until
/// re-decided - there is no background job.
pub fn current_month_start() -> NaiveDate {
    month_start_of(Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_start_truncates_day() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        assert_eq!(month_start_of(d), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn month_start_is_identity_on_first() {
        let d = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert_eq!(month_start_of(d), d);
    }

    #[test]
    fn current_month_start_is_first_of_month() {
        let key = current_month_start();
        assert_eq!(key.day(), 1);
        assert_eq!(key, month_start_of(Utc::now().date_naive()));
    }
}
