//! Account domain models.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// Kind of account. New accounts default to a checking account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    #[default]
    Checking,
    Savings,
    CreditCard,
    Cash,
    Investment,
    Loan,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "CHECKING",
            AccountType::Savings => "SAVINGS",
            AccountType::CreditCard => "CREDIT_CARD",
            AccountType::Cash => "CASH",
            AccountType::Investment => "INVESTMENT",
            AccountType::Loan => "LOAN",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CHECKING" => Ok(AccountType::Checking),
            "SAVINGS" => Ok(AccountType::Savings),
            "CREDIT_CARD" => Ok(AccountType::CreditCard),
            "CASH" => Ok(AccountType::Cash),
            "INVESTMENT" => Ok(AccountType::Investment),
            "LOAN" => Ok(AccountType::Loan),
            other => Err(Error::invalid_input(format!(
                "Unknown account type '{}'",
                other
            ))),
        }
    }
}

/// Domain model representing an account in the system.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub account_type: AccountType,
    pub parent_id: Option<String>,
    pub currency: String,
    pub balance: Decimal,
    /// Maximum negative balance the account may reach. `None` means zero.
    pub credit_limit: Option<Decimal>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Account {
    /// Lowest balance this account may hold.
    pub fn balance_floor(&self) -> Decimal {
        -self.credit_limit.unwrap_or(Decimal::ZERO)
    }

    /// Returns the balance after applying `delta`, or a constraint violation
    /// when the result would drop below the negated credit limit.
    pub fn balance_after(&self, delta: Decimal) -> Result<Decimal> {
        let next = self.balance + delta;
        ensure_within_credit_limit(&self.name, next, self.credit_limit)?;
        Ok(next)
    }
}

/// Checks the `balance >= -credit_limit` invariant.
pub fn ensure_within_credit_limit(
    account_name: &str,
    balance: Decimal,
    credit_limit: Option<Decimal>,
) -> Result<()> {
    let floor = -credit_limit.unwrap_or(Decimal::ZERO);
    if balance < floor {
        return Err(Error::ConstraintViolation(format!(
            "Balance {} of account '{}' would exceed its credit limit ({})",
            balance, account_name, floor
        )));
    }
    Ok(())
}

fn default_true() -> bool {
    true
}

/// Input model for creating a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub account_type: AccountType,
    pub parent_id: Option<String>,
    pub currency: String,
    /// Opening balance.
    #[serde(default)]
    pub balance: Decimal,
    pub credit_limit: Option<Decimal>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl NewAccount {
    /// Validates the new account data.
    pub fn validate(&self) -> Result<()> {
        validate_common(&self.name, self.credit_limit)?;
        if self.currency.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Currency cannot be empty".to_string(),
            )));
        }
        ensure_within_credit_limit(&self.name, self.balance, self.credit_limit)
    }
}

/// Input model for updating an existing account.
///
/// Currency and balance are not editable: the balance only moves through
/// transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    pub id: Option<String>,
    pub name: String,
    pub account_type: AccountType,
    pub parent_id: Option<String>,
    pub credit_limit: Option<Decimal>,
    pub is_active: bool,
}

impl AccountUpdate {
    /// Validates the account update data.
    pub fn validate(&self) -> Result<()> {
        let Some(id) = self.id.as_deref() else {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Account ID is required for updates".to_string(),
            )));
        };
        if self.parent_id.as_deref() == Some(id) {
            return Err(Error::invalid_input("An account cannot be its own parent"));
        }
        validate_common(&self.name, self.credit_limit)
    }
}

fn validate_common(name: &str, credit_limit: Option<Decimal>) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Account name cannot be empty".to_string(),
        )));
    }
    if let Some(limit) = credit_limit {
        if limit.is_sign_negative() {
            return Err(Error::invalid_input("Credit limit cannot be negative"));
        }
    }
    Ok(())
}

/// Filters accepted by the account listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountFilter {
    pub is_active: Option<bool>,
    pub parent_id: Option<String>,
}

/// Account with its sub-accounts, for hierarchical display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountNode {
    #[serde(flatten)]
    pub account: Account,
    /// Own balance plus the balances of all descendants.
    pub total_balance: Decimal,
    pub children: Vec<AccountNode>,
}

/// Arranges a flat account list into a forest.
///
/// Accounts whose parent is not part of the list become roots. Siblings keep
/// the order of the input.
pub fn build_account_tree(accounts: Vec<Account>) -> Vec<AccountNode> {
    let ids: HashSet<String> = accounts.iter().map(|a| a.id.clone()).collect();
    let mut children_of: HashMap<Option<String>, Vec<Account>> = HashMap::new();
    for account in accounts {
        let key = account
            .parent_id
            .clone()
            .filter(|parent| ids.contains(parent) && parent != &account.id);
        children_of.entry(key).or_default().push(account);
    }

    fn build(
        parent: Option<String>,
        children_of: &mut HashMap<Option<String>, Vec<Account>>,
    ) -> Vec<AccountNode> {
        let Some(accounts) = children_of.remove(&parent) else {
            return Vec::new();
        };
        accounts
            .into_iter()
            .map(|account| {
                let children = build(Some(account.id.clone()), children_of);
                let total_balance = account.balance
                    + children.iter().map(|c| c.total_balance).sum::<Decimal>();
                AccountNode {
                    account,
                    total_balance,
                    children,
                }
            })
            .collect()
    }

    build(None, &mut children_of)
}
