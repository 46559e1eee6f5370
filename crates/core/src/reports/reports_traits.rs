use chrono::NaiveDate;

use super::chart_data::ChartOptions;
use super::reports_model::{CashFlowMonth, CategoryChart, Dashboard, TierProgress};
use crate::utils::DateRange;
use crate::Result;

pub trait ReportServiceTrait: Send + Sync {
    /// Income (above the axis) and expense (below) per top-level category
    /// over `range`, largest first.
    fn category_chart(&self, range: &DateRange, options: &ChartOptions) -> Result<CategoryChart>;

    /// Income, expense and net per calendar month touched by `range`.
    fn cash_flow(&self, range: &DateRange) -> Result<Vec<CashFlowMonth>>;

    fn tier_progress(&self, as_of: NaiveDate, width: f64) -> Result<TierProgress>;

    fn dashboard(&self, as_of: NaiveDate) -> Result<Dashboard>;
}
