use chrono::{Days, NaiveDate, Utc};
use fintrack_core::utils::{fiscal_year_of, fiscal_year_range, DateRange};

use crate::error::{ApiError, ApiResult};

/// Reference date for "current" figures when the request does not pin one.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Resolves an optional inclusive `[start, end]` query window into a
/// half-open range. Missing bounds fall back to the fiscal year that
/// contains today.
pub fn resolve_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    fiscal_year_start_month: u32,
) -> ApiResult<DateRange> {
    let fiscal_year = fiscal_year_range(
        fiscal_year_of(today(), fiscal_year_start_month)?,
        fiscal_year_start_month,
    )?;
    let start = start.unwrap_or(fiscal_year.start);
    let end = match end {
        Some(end) => end
            .checked_add_days(Days::new(1))
            .ok_or_else(|| ApiError::BadRequest(format!("End date {} is out of range", end)))?,
        None => fiscal_year.end,
    };
    Ok(DateRange::new(start, end)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inclusive_end_becomes_exclusive() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let range = resolve_range(Some(start), Some(end), 1).unwrap();
        assert_eq!(range.start, start);
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        assert!(range.contains(end));
    }

    #[test]
    fn reversed_window_is_rejected() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(resolve_range(Some(start), Some(end), 1).is_err());
    }

    #[test]
    fn missing_bounds_use_current_fiscal_year() {
        let range = resolve_range(None, None, 1).unwrap();
        assert!(range.contains(today()));
    }
}
