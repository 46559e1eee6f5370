//! Reports module - chart-ready aggregates over transactions, accounts and
//! membership tiers.

mod chart_data;
mod reports_model;
mod reports_service;
mod reports_traits;
mod tier_position;


pub use chart_data::{
    build_processed_data, calculate_chart_domains, prepare_chart_data, ChartDomain, ChartItem,
    ChartOptions, ChartRow, ChartRowKind, DEFAULT_MAX_VISIBLE, OTHERS_ROW_ID, TOTAL_ROW_ID,
};
pub use reports_model::{CashFlowMonth, CategoryChart, Dashboard, TierProgress};
pub use reports_service::{ReportService, UNCATEGORIZED_ITEM_ID};
pub use reports_traits::ReportServiceTrait;
pub use tier_position::{tier_indicator_offset, TierBand};
