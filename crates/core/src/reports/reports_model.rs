use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::chart_data::{ChartDomain, ChartRow};
use super::tier_position::TierBand;
use crate::tiers::MembershipStatus;
use crate::utils::DateRange;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryChart {
    pub period: DateRange,
    pub rows: Vec<ChartRow>,
    pub domain: ChartDomain,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowMonth {
    /// `YYYY-MM`
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierProgress {
    pub status: MembershipStatus,
    /// Spend bands of every tier, lowest first.
    pub bands: Vec<TierBand>,
    pub width: f64,
    pub indicator_offset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub as_of: NaiveDate,
    pub total_balance: Decimal,
    pub month_income: Decimal,
    pub month_expense: Decimal,
    pub month_net: Decimal,
    pub active_accounts: usize,
    pub unread_notifications: i64,
}
