use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Half-open date range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(Error::invalid_input(format!(
                "Date range end {} is before start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// The calendar month containing `date`. Fails for the last month chrono
    /// can represent, whose exclusive end does not exist.
    pub fn month_of(date: NaiveDate) -> Result<Self> {
        let start = month_start(date);
        let end = next_month_start(start).ok_or_else(|| out_of_range(date))?;
        Ok(Self { start, end })
    }
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month.
    date.with_day(1).unwrap_or(date)
}

/// First day of the month after the one containing `date`, or `None` past
/// chrono's last representable month.
pub fn next_month_start(date: NaiveDate) -> Option<NaiveDate> {
    month_start(date).checked_add_months(Months::new(1))
}

fn out_of_range(what: impl std::fmt::Display) -> Error {
    Error::invalid_input(format!("{} is outside the supported date range", what))
}

fn validate_start_month(start_month: u32) -> Result<()> {
    if !(1..=12).contains(&start_month) {
        return Err(Error::invalid_input(format!(
            "Fiscal year start month must be between 1 and 12, got {}",
            start_month
        )));
    }
    Ok(())
}

/// Returns the date range of fiscal year `year`.
///
/// Fiscal years are named after the calendar year they end in. With a start
/// month of January the fiscal year is the calendar year; with start month
/// `m > 1` fiscal year `Y` runs from `(Y-1)-m-01` to `Y-m-01`.
pub fn fiscal_year_range(year: i32, start_month: u32) -> Result<DateRange> {
    validate_start_month(start_month)?;
    let start_year = if start_month == 1 {
        Some(year)
    } else {
        year.checked_sub(1)
    };
    let start = start_year
        .and_then(|y| NaiveDate::from_ymd_opt(y, start_month, 1))
        .ok_or_else(|| out_of_range(format!("Fiscal year {}", year)))?;
    let end = start
        .checked_add_months(Months::new(12))
        .ok_or_else(|| out_of_range(format!("Fiscal year {}", year)))?;
    Ok(DateRange { start, end })
}

/// Returns the fiscal year that contains `date`.
pub fn fiscal_year_of(date: NaiveDate, start_month: u32) -> Result<i32> {
    validate_start_month(start_month)?;
    if start_month == 1 || date.month() < start_month {
        Ok(date.year())
    } else {
        Ok(date.year() + 1)
    }
}

/// `YYYY-MM` key used to bucket values per month.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_calendar_fiscal_year() {
        let range = fiscal_year_range(2024, 1).unwrap();
        assert_eq!(range.start, d(2024, 1, 1));
        assert_eq!(range.end, d(2025, 1, 1));
        assert_eq!(fiscal_year_of(d(2024, 12, 31), 1).unwrap(), 2024);
    }

    #[test]
    fn test_offset_fiscal_year() {
        let range = fiscal_year_range(2024, 10).unwrap();
        assert_eq!(range.start, d(2023, 10, 1));
        assert_eq!(range.end, d(2024, 10, 1));
        assert_eq!(fiscal_year_of(d(2023, 10, 1), 10).unwrap(), 2024);
        assert_eq!(fiscal_year_of(d(2024, 9, 30), 10).unwrap(), 2024);
        assert_eq!(fiscal_year_of(d(2024, 10, 1), 10).unwrap(), 2025);
    }

    #[test]
    fn test_fiscal_year_round_trips_through_range() {
        for start_month in 1..=12 {
            let range = fiscal_year_range(2030, start_month).unwrap();
            assert_eq!(fiscal_year_of(range.start, start_month).unwrap(), 2030);
            let last_day = range.end.pred_opt().unwrap();
            assert_eq!(fiscal_year_of(last_day, start_month).unwrap(), 2030);
        }
    }

    #[test]
    fn test_invalid_start_month() {
        assert!(fiscal_year_range(2024, 0).is_err());
        assert!(fiscal_year_of(d(2024, 1, 1), 13).is_err());
    }

    #[test]
    fn test_month_helpers() {
        let range = DateRange::month_of(d(2024, 12, 15)).unwrap();
        assert_eq!(range.start, d(2024, 12, 1));
        assert_eq!(range.end, d(2025, 1, 1));
        assert!(range.contains(d(2024, 12, 31)));
        assert!(!range.contains(d(2025, 1, 1)));
        assert_eq!(month_key(d(2024, 3, 9)), "2024-03");
    }

    #[test]
    fn test_last_representable_month_has_no_successor() {
        let last_month = month_start(NaiveDate::MAX);
        assert_eq!(next_month_start(last_month), None);
        assert!(DateRange::month_of(NaiveDate::MAX).is_err());
        assert_eq!(next_month_start(d(2024, 1, 31)), Some(d(2024, 2, 1)));
    }

    #[test]
    fn test_fiscal_year_beyond_calendar_limits_is_rejected() {
        assert!(fiscal_year_range(i32::MIN, 4).is_err());
        assert!(fiscal_year_range(NaiveDate::MAX.year(), 1).is_err());
        assert!(fiscal_year_range(NaiveDate::MAX.year() + 1, 7).is_err());
    }
}
