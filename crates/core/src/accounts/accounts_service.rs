use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use super::accounts_model::{
    build_account_tree, ensure_within_credit_limit, Account, AccountFilter, AccountNode,
    AccountUpdate, NewAccount,
};
use super::accounts_traits::{AccountRepositoryTrait, AccountServiceTrait};
use crate::errors::{Error, Result};

/// Service for managing accounts
pub struct AccountService {
    repository: Arc<dyn AccountRepositoryTrait>,
}

impl AccountService {
    /// Creates a new AccountService instance
    pub fn new(repository: Arc<dyn AccountRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn ensure_parent_exists(&self, parent_id: Option<&str>) -> Result<()> {
        if let Some(parent_id) = parent_id {
            self.repository.get_by_id(parent_id).map_err(|e| {
                if e.is_not_found() {
                    Error::invalid_input(format!("Parent account {} does not exist", parent_id))
                } else {
                    e
                }
            })?;
        }
        Ok(())
    }

    /// Rejects a parent assignment that would make `account_id` its own ancestor.
    fn ensure_no_cycle(&self, account_id: &str, parent_id: Option<&str>) -> Result<()> {
        let Some(mut current) = parent_id.map(str::to_string) else {
            return Ok(());
        };
        let parents: HashMap<String, Option<String>> = self
            .repository
            .list(&AccountFilter::default())?
            .into_iter()
            .map(|a| (a.id, a.parent_id))
            .collect();

        let mut steps = 0;
        loop {
            if current == account_id {
                return Err(Error::invalid_input(
                    "An account cannot be moved under one of its own sub-accounts",
                ));
            }
            steps += 1;
            match parents.get(&current).cloned().flatten() {
                Some(next) if steps <= parents.len() => current = next,
                _ => return Ok(()),
            }
        }
    }
}

#[async_trait::async_trait]
impl AccountServiceTrait for AccountService {
    async fn create_account(&self, new_account: NewAccount) -> Result<Account> {
        debug!(
            "Creating account '{}' ({})",
            new_account.name, new_account.account_type
        );
        new_account.validate()?;
        self.ensure_parent_exists(new_account.parent_id.as_deref())?;
        self.repository.create(new_account).await
    }

    async fn update_account(&self, account_update: AccountUpdate) -> Result<Account> {
        account_update.validate()?;
        let account_id = account_update.id.clone().unwrap_or_default();
        let existing = self.repository.get_by_id(&account_id)?;

        self.ensure_parent_exists(account_update.parent_id.as_deref())?;
        self.ensure_no_cycle(&account_id, account_update.parent_id.as_deref())?;

        // A lowered credit limit must still cover the current balance.
        ensure_within_credit_limit(
            &account_update.name,
            existing.balance,
            account_update.credit_limit,
        )?;

        self.repository.update(account_update).await
    }

    fn get_account(&self, account_id: &str) -> Result<Account> {
        self.repository.get_by_id(account_id)
    }

    fn list_accounts(&self, filter: &AccountFilter) -> Result<Vec<Account>> {
        self.repository.list(filter)
    }

    fn get_active_accounts(&self) -> Result<Vec<Account>> {
        self.repository.list(&AccountFilter {
            is_active: Some(true),
            ..AccountFilter::default()
        })
    }

    fn get_account_tree(&self) -> Result<Vec<AccountNode>> {
        let accounts = self.repository.list(&AccountFilter::default())?;
        Ok(build_account_tree(accounts))
    }

    fn total_active_balance(&self) -> Result<Decimal> {
        Ok(self
            .get_active_accounts()?
            .iter()
            .map(|a| a.balance)
            .sum())
    }

    async fn delete_account(&self, account_id: &str) -> Result<()> {
        self.repository.get_by_id(account_id)?;

        let children = self.repository.list(&AccountFilter {
            parent_id: Some(account_id.to_string()),
            ..AccountFilter::default()
        })?;
        if !children.is_empty() {
            warn!(
                "Refusing to delete account {}: {} sub-accounts",
                account_id,
                children.len()
            );
            return Err(Error::ConstraintViolation(format!(
                "Cannot delete account: {} sub-accounts are attached to it",
                children.len()
            )));
        }

        let transaction_count = self.repository.count_transactions(account_id)?;
        if transaction_count > 0 {
            warn!(
                "Refusing to delete account {}: {} transactions",
                account_id, transaction_count
            );
            return Err(Error::ConstraintViolation(format!(
                "Cannot delete account: {} transactions are booked on it",
                transaction_count
            )));
        }

        self.repository.delete(account_id).await?;
        Ok(())
    }
}
