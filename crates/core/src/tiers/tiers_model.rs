//! Membership tier domain models and standing computation.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Benefit {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Partner providing the benefit, if any.
    pub partner_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBenefit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub partner_id: Option<String>,
}

impl NewBenefit {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_input("Benefit name cannot be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitUpdate {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub partner_id: Option<String>,
}

impl BenefitUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.id.as_deref().map_or(true, str::is_empty) {
            return Err(Error::invalid_input("Benefit ID is required for updates"));
        }
        if self.name.trim().is_empty() {
            return Err(Error::invalid_input("Benefit name cannot be empty"));
        }
        Ok(())
    }
}

/// A membership tier. Both ranges are half-open `[min, max)`; an absent
/// `max` leaves the range open ended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MembershipTier {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub min_spend: Decimal,
    pub max_spend: Option<Decimal>,
    pub min_balance: Decimal,
    pub max_balance: Option<Decimal>,
    pub benefits: Vec<Benefit>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Creates a tier (no `id`) or replaces one, together with the full set of
/// its benefits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierUpsert {
    pub id: Option<String>,
    pub name: String,
    pub color: Option<String>,
    pub min_spend: Decimal,
    pub max_spend: Option<Decimal>,
    pub min_balance: Decimal,
    pub max_balance: Option<Decimal>,
    #[serde(default)]
    pub benefit_ids: Vec<String>,
}

impl TierUpsert {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_input("Tier name cannot be empty"));
        }
        validate_range("spend", self.min_spend, self.max_spend)?;
        validate_range("balance", self.min_balance, self.max_balance)?;
        let mut seen = HashSet::new();
        if let Some(duplicate) = self.benefit_ids.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(Error::invalid_input(format!(
                "Benefit {} is listed more than once",
                duplicate
            )));
        }
        Ok(())
    }

    /// Returns the first other tier whose spend or balance range overlaps
    /// this one.
    pub fn find_overlap<'a>(
        &self,
        tiers: &'a [MembershipTier],
    ) -> Option<(&'a MembershipTier, &'static str)> {
        tiers
            .iter()
            .filter(|t| Some(&t.id) != self.id.as_ref())
            .find_map(|t| {
                if ranges_overlap(self.min_spend, self.max_spend, t.min_spend, t.max_spend) {
                    Some((t, "spend"))
                } else if ranges_overlap(
                    self.min_balance,
                    self.max_balance,
                    t.min_balance,
                    t.max_balance,
                ) {
                    Some((t, "balance"))
                } else {
                    None
                }
            })
    }
}

fn validate_range(label: &str, min: Decimal, max: Option<Decimal>) -> Result<()> {
    if min.is_sign_negative() {
        return Err(Error::invalid_input(format!(
            "Minimum {} cannot be negative",
            label
        )));
    }
    if let Some(max) = max {
        if max < min {
            return Err(Error::invalid_input(format!(
                "Maximum {} {} is below the minimum {}",
                label, max, min
            )));
        }
    }
    Ok(())
}

/// Whether the half-open ranges `[a_min, a_max)` and `[b_min, b_max)`
/// share a value. `None` is unbounded; empty ranges overlap nothing.
pub fn ranges_overlap(
    a_min: Decimal,
    a_max: Option<Decimal>,
    b_min: Decimal,
    b_max: Option<Decimal>,
) -> bool {
    let non_empty = |min: Decimal, max: Option<Decimal>| max.map_or(true, |max| min < max);
    non_empty(a_min, a_max)
        && non_empty(b_min, b_max)
        && b_max.map_or(true, |b_max| a_min < b_max)
        && a_max.map_or(true, |a_max| b_min < a_max)
}

/// Where the member stands on the tier ladder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MembershipStatus {
    pub as_of: NaiveDate,
    pub fiscal_year: i32,
    /// Expenses booked in the fiscal year so far.
    pub spend: Decimal,
    /// Sum of active account balances.
    pub balance: Decimal,
    pub current_tier: Option<MembershipTier>,
    pub next_tier: Option<MembershipTier>,
    pub spend_to_next: Option<Decimal>,
    pub balance_to_next: Option<Decimal>,
    /// Progress from the current tier towards the next, 0 to 100.
    pub progress_percent: Decimal,
}

/// Derives the membership standing from spend and balance.
///
/// `tiers` must be ordered by `min_spend`. The current tier is the highest
/// one whose spend or balance minimum is met.
pub fn compute_membership_status(
    tiers: &[MembershipTier],
    as_of: NaiveDate,
    fiscal_year: i32,
    spend: Decimal,
    balance: Decimal,
) -> MembershipStatus {
    let current_index = tiers
        .iter()
        .rposition(|t| spend >= t.min_spend || balance >= t.min_balance);
    let next_index = current_index.map_or(0, |i| i + 1);
    let current_tier = current_index.map(|i| tiers[i].clone());
    let next_tier = tiers.get(next_index).cloned();

    let (spend_to_next, balance_to_next, progress_percent) = match &next_tier {
        None => (None, None, Decimal::ONE_HUNDRED),
        Some(next) => {
            let (spend_floor, balance_floor) = current_tier
                .as_ref()
                .map_or((Decimal::ZERO, Decimal::ZERO), |c| (c.min_spend, c.min_balance));
            let progress = band_progress(spend, spend_floor, next.min_spend)
                .max(band_progress(balance, balance_floor, next.min_balance));
            (
                Some((next.min_spend - spend).max(Decimal::ZERO)),
                Some((next.min_balance - balance).max(Decimal::ZERO)),
                (progress * Decimal::ONE_HUNDRED).round_dp(DISPLAY_DECIMAL_PRECISION),
            )
        }
    };

    MembershipStatus {
        as_of,
        fiscal_year,
        spend,
        balance,
        current_tier,
        next_tier,
        spend_to_next,
        balance_to_next,
        progress_percent,
    }
}

/// Fraction of the way from `floor` to `target`, clamped to `[0, 1]`.
fn band_progress(value: Decimal, floor: Decimal, target: Decimal) -> Decimal {
    if target <= floor {
        return if value >= target {
            Decimal::ONE
        } else {
            Decimal::ZERO
        };
    }
    ((value - floor) / (target - floor)).clamp(Decimal::ZERO, Decimal::ONE)
}
