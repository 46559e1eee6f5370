//! Transaction domain models.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::categories::CategoryKind;
use crate::{Error, PageRequest, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "INCOME",
            TransactionKind::Expense => "EXPENSE",
            TransactionKind::Transfer => "TRANSFER",
        }
    }

    /// Category kind a transaction of this kind may be booked to. Transfers
    /// are never categorised.
    pub fn category_kind(&self) -> Option<CategoryKind> {
        match self {
            TransactionKind::Income => Some(CategoryKind::Income),
            TransactionKind::Expense => Some(CategoryKind::Expense),
            TransactionKind::Transfer => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "INCOME" => Ok(TransactionKind::Income),
            "EXPENSE" => Ok(TransactionKind::Expense),
            "TRANSFER" => Ok(TransactionKind::Transfer),
            other => Err(Error::invalid_input(format!(
                "Unknown transaction kind '{}'",
                other
            ))),
        }
    }
}

/// Domain model for a booked transaction. `amount` is always positive; the
/// kind decides the direction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    pub to_account_id: Option<String>,
    pub category_id: Option<String>,
    pub partner_id: Option<String>,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub description: Option<String>,
    pub transaction_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Transaction {
    pub fn balance_effects(&self) -> Vec<BalanceEffect> {
        balance_effects(
            self.kind,
            &self.account_id,
            self.to_account_id.as_deref(),
            self.amount,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub account_id: String,
    pub to_account_id: Option<String>,
    pub category_id: Option<String>,
    pub partner_id: Option<String>,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub description: Option<String>,
    pub transaction_date: NaiveDate,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        validate_shape(
            self.kind,
            &self.account_id,
            self.to_account_id.as_deref(),
            self.category_id.as_deref(),
            self.amount,
        )
    }

    pub fn balance_effects(&self) -> Vec<BalanceEffect> {
        balance_effects(
            self.kind,
            &self.account_id,
            self.to_account_id.as_deref(),
            self.amount,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    pub id: Option<String>,
    pub account_id: String,
    pub to_account_id: Option<String>,
    pub category_id: Option<String>,
    pub partner_id: Option<String>,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub description: Option<String>,
    pub transaction_date: NaiveDate,
}

impl TransactionUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.id.as_deref().map_or(true, str::is_empty) {
            return Err(Error::invalid_input(
                "Transaction ID is required for updates",
            ));
        }
        validate_shape(
            self.kind,
            &self.account_id,
            self.to_account_id.as_deref(),
            self.category_id.as_deref(),
            self.amount,
        )
    }

    pub fn balance_effects(&self) -> Vec<BalanceEffect> {
        balance_effects(
            self.kind,
            &self.account_id,
            self.to_account_id.as_deref(),
            self.amount,
        )
    }
}

fn validate_shape(
    kind: TransactionKind,
    account_id: &str,
    to_account_id: Option<&str>,
    category_id: Option<&str>,
    amount: Decimal,
) -> Result<()> {
    if account_id.trim().is_empty() {
        return Err(Error::invalid_input("Account is required"));
    }
    if amount <= Decimal::ZERO {
        return Err(Error::invalid_input(format!(
            "Amount must be greater than zero, got {}",
            amount
        )));
    }
    match kind {
        TransactionKind::Transfer => {
            let Some(to_account_id) = to_account_id else {
                return Err(Error::invalid_input("A transfer needs a destination account"));
            };
            if to_account_id == account_id {
                return Err(Error::invalid_input(
                    "A transfer needs two different accounts",
                ));
            }
            if category_id.is_some() {
                return Err(Error::invalid_input("Transfers cannot be categorised"));
            }
        }
        TransactionKind::Income | TransactionKind::Expense => {
            if to_account_id.is_some() {
                return Err(Error::invalid_input(format!(
                    "{} transactions cannot have a destination account",
                    kind
                )));
            }
        }
    }
    Ok(())
}

/// Change applied to one account's balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceEffect {
    pub account_id: String,
    pub delta: Decimal,
}

/// Balance changes caused by booking a transaction.
pub fn balance_effects(
    kind: TransactionKind,
    account_id: &str,
    to_account_id: Option<&str>,
    amount: Decimal,
) -> Vec<BalanceEffect> {
    let effect = |account_id: &str, delta: Decimal| BalanceEffect {
        account_id: account_id.to_string(),
        delta,
    };
    match (kind, to_account_id) {
        (TransactionKind::Income, _) => vec![effect(account_id, amount)],
        (TransactionKind::Expense, _) => vec![effect(account_id, -amount)],
        (TransactionKind::Transfer, Some(to)) => {
            vec![effect(account_id, -amount), effect(to, amount)]
        }
        (TransactionKind::Transfer, None) => vec![effect(account_id, -amount)],
    }
}

/// Combines the reversal of `previous` with `next` into one delta per
/// account, dropping accounts whose balance does not move. Sorted by
/// account id.
pub fn net_balance_effects(
    previous: &[BalanceEffect],
    next: &[BalanceEffect],
) -> Vec<BalanceEffect> {
    let mut deltas: BTreeMap<&str, Decimal> = BTreeMap::new();
    for e in previous {
        *deltas.entry(e.account_id.as_str()).or_default() -= e.delta;
    }
    for e in next {
        *deltas.entry(e.account_id.as_str()).or_default() += e.delta;
    }
    deltas
        .into_iter()
        .filter(|(_, delta)| !delta.is_zero())
        .map(|(account_id, delta)| BalanceEffect {
            account_id: account_id.to_string(),
            delta,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum TransactionSortField {
    #[default]
    TransactionDate,
    Amount,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Search criteria for the transaction listing. Date bounds are inclusive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    pub account_id: Option<String>,
    pub category_id: Option<String>,
    pub kind: Option<TransactionKind>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive match on the description.
    pub search: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    #[serde(default)]
    pub sort_by: TransactionSortField,
    #[serde(default)]
    pub sort_direction: SortDirection,
}

impl TransactionFilter {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_parts(self.page, self.page_size)
    }

    pub fn validate(&self) -> Result<()> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(Error::invalid_input(format!(
                    "End date {} is before start date {}",
                    end, start
                )));
            }
        }
        Ok(())
    }
}
