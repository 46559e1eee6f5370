//! Budget domain models.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CURRENCY, DISPLAY_DECIMAL_PRECISION};
use crate::notifications::{NewNotification, NotificationKind};
use crate::utils::DateRange;
use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub name: String,
    pub fiscal_year: i32,
    pub currency: String,
    pub notes: Option<String>,
    pub lines: Vec<BudgetLine>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Budget {
    pub fn total_budgeted(&self) -> Decimal {
        self.lines.iter().map(|l| l.amount).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLine {
    pub id: String,
    pub budget_id: String,
    pub category_id: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBudgetLine {
    pub category_id: String,
    pub amount: Decimal,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub fiscal_year: i32,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub lines: Vec<NewBudgetLine>,
}

impl NewBudget {
    pub fn validate(&self) -> Result<()> {
        validate_budget(&self.name, self.fiscal_year, &self.currency, &self.lines)
    }
}

/// Replaces every field of a budget, lines included.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUpdate {
    pub id: Option<String>,
    pub name: String,
    pub fiscal_year: i32,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub lines: Vec<NewBudgetLine>,
}

impl BudgetUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.id.as_deref().map_or(true, str::is_empty) {
            return Err(Error::invalid_input("Budget ID is required for updates"));
        }
        validate_budget(&self.name, self.fiscal_year, &self.currency, &self.lines)
    }
}

fn validate_budget(
    name: &str,
    fiscal_year: i32,
    currency: &str,
    lines: &[NewBudgetLine],
) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid_input("Budget name cannot be empty"));
    }
    if !(1900..=9999).contains(&fiscal_year) {
        return Err(Error::invalid_input(format!(
            "Fiscal year {} is out of range",
            fiscal_year
        )));
    }
    if currency.trim().is_empty() {
        return Err(Error::invalid_input("Currency cannot be empty"));
    }
    let mut seen = HashSet::new();
    for line in lines {
        if line.amount.is_sign_negative() {
            return Err(Error::invalid_input(format!(
                "Budget amount for category {} cannot be negative",
                line.category_id
            )));
        }
        if !seen.insert(line.category_id.as_str()) {
            return Err(Error::invalid_input(format!(
                "Category {} appears more than once in the budget",
                line.category_id
            )));
        }
    }
    Ok(())
}

/// Share of `budgeted` consumed by `actual`, in percent with two decimals.
/// A zero budget counts as fully used as soon as anything is spent.
pub(crate) fn percent_used(budgeted: Decimal, actual: Decimal) -> Decimal {
    if budgeted.is_zero() {
        return if actual > Decimal::ZERO {
            Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
    }
    (actual * Decimal::ONE_HUNDRED / budgeted).round_dp(DISPLAY_DECIMAL_PRECISION)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLineVsActual {
    pub category_id: String,
    pub category_name: String,
    pub budgeted: Decimal,
    /// Expenses booked to the category or its children.
    pub actual: Decimal,
    /// `budgeted - actual`; negative when over budget.
    pub difference: Decimal,
    pub percent_used: Decimal,
    pub over_budget: bool,
}

impl BudgetLineVsActual {
    pub fn new(
        category_id: String,
        category_name: String,
        budgeted: Decimal,
        actual: Decimal,
    ) -> Self {
        Self {
            category_id,
            category_name,
            budgeted,
            actual,
            difference: budgeted - actual,
            percent_used: percent_used(budgeted, actual),
            over_budget: actual > budgeted,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetVsActual {
    pub budget_id: String,
    pub name: String,
    pub fiscal_year: i32,
    pub period: DateRange,
    pub lines: Vec<BudgetLineVsActual>,
    pub total_budgeted: Decimal,
    pub total_actual: Decimal,
    pub total_difference: Decimal,
    pub percent_used: Decimal,
}

/// A budget usage threshold crossed by a newly recorded expense.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAlert {
    pub budget_id: String,
    pub budget_name: String,
    pub fiscal_year: i32,
    pub category_id: String,
    pub category_name: String,
    pub threshold_percent: u32,
    pub budgeted: Decimal,
    /// Fiscal-year spend including the new expense.
    pub spent: Decimal,
}

impl BudgetAlert {
    pub fn to_notification(&self) -> NewNotification {
        let title = if self.threshold_percent >= 100 {
            format!("Budget exceeded: {}", self.category_name)
        } else {
            format!(
                "{}% of budget used: {}",
                self.threshold_percent, self.category_name
            )
        };
        NewNotification {
            title,
            message: format!(
                "Spent {} of {} budgeted for '{}' in {} (FY {}).",
                self.spent.round_dp(DISPLAY_DECIMAL_PRECISION),
                self.budgeted.round_dp(DISPLAY_DECIMAL_PRECISION),
                self.category_name,
                self.budget_name,
                self.fiscal_year
            ),
            kind: NotificationKind::BudgetAlert,
            link: Some(format!("/budgets/{}", self.budget_id)),
        }
    }
}
