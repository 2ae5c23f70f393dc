use chrono::{Months, NaiveDate};

/// Add whole calendar months, clamping to the last day of the target month
/// (Jan 31 + 1 month = Feb 28, or Feb 29 in leap years).
///
/// Returns `None` only when the result leaves chrono's supported date range.
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// German display format: two-digit day and month, four-digit year.
pub fn format_german_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}
