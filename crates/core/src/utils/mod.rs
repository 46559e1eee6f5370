//! Shared helpers for dates and decimal values.

pub mod decimal_utils;
pub mod time_utils;

pub use decimal_utils::{decimal_to_f64, parse_decimal_or_zero, parse_optional_decimal};
pub use time_utils::{
    fiscal_year_of, fiscal_year_range, month_key, month_start, next_month_start, DateRange,
};
