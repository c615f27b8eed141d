use chrono::{Datelike, NaiveDate};

/// Generates a vector of `NaiveDate`s, inclusive of the start and end dates.
/// If `start` is after `end`, the resulting vector will be empty.
///
/// # Examples
///
/// ```
/// # use chrono::NaiveDate;
/// # use worklog_core::dates::dates_in_range;
/// let start_date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let end_date = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
///
/// let dates = dates_in_range(start_date, end_date);
///
/// assert_eq!(dates.len(), 3);
/// assert_eq!(dates[0], NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
/// assert_eq!(dates[2], NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
/// ```
pub fn dates_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = Some(start);
    while let Some(date) = current.filter(|d| *d <= end) {
        dates.push(date);
        current = date.succ_opt();
    }
    dates
}

/// Last calendar day of `month` in `year`, or `None` for an invalid month.
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (y, m) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?;
    NaiveDate::from_ymd_opt(y, m, 1)?.pred_opt()
}

/// First day of the quarter (1..=4) in `year`.
pub fn quarter_start(year: i32, quarter: u32) -> Option<NaiveDate> {
    if !(1..=4).contains(&quarter) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, (quarter - 1) * 3 + 1, 1)
}

/// Last day of the quarter's third month.
pub fn quarter_end(year: i32, quarter: u32) -> Option<NaiveDate> {
    let start = quarter_start(year, quarter)?;
    last_day_of_month(start.year(), start.month() + 2)
}
