use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::transactions_model::{
    net_balance_effects, BalanceEffect, NewTransaction, Transaction, TransactionFilter,
    TransactionKind, TransactionUpdate,
};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::accounts::{Account, AccountRepositoryTrait};
use crate::budgets::{BudgetAlert, BudgetServiceTrait};
use crate::categories::CategoryRepositoryTrait;
use crate::notifications::NotificationServiceTrait;
use crate::{Error, Page, Result};

pub struct TransactionService {
    repository: Arc<dyn TransactionRepositoryTrait>,
    account_repository: Arc<dyn AccountRepositoryTrait>,
    category_repository: Arc<dyn CategoryRepositoryTrait>,
    budget_service: Arc<dyn BudgetServiceTrait>,
    notification_service: Arc<dyn NotificationServiceTrait>,
}

impl TransactionService {
    pub fn new(
        repository: Arc<dyn TransactionRepositoryTrait>,
        account_repository: Arc<dyn AccountRepositoryTrait>,
        category_repository: Arc<dyn CategoryRepositoryTrait>,
        budget_service: Arc<dyn BudgetServiceTrait>,
        notification_service: Arc<dyn NotificationServiceTrait>,
    ) -> Self {
        Self {
            repository,
            account_repository,
            category_repository,
            budget_service,
            notification_service,
        }
    }

    fn get_account(&self, account_id: &str) -> Result<Account> {
        self.account_repository.get_by_id(account_id).map_err(|e| {
            if e.is_not_found() {
                Error::invalid_input(format!("Account {} does not exist", account_id))
            } else {
                e
            }
        })
    }

    fn ensure_category_matches(
        &self,
        kind: TransactionKind,
        category_id: Option<&str>,
    ) -> Result<()> {
        let (Some(category_id), Some(expected)) = (category_id, kind.category_kind()) else {
            return Ok(());
        };
        let category = self
            .category_repository
            .get_by_id(category_id)
            .map_err(|e| {
                if e.is_not_found() {
                    Error::invalid_input(format!("Category {} does not exist", category_id))
                } else {
                    e
                }
            })?;
        if category.kind != expected {
            return Err(Error::invalid_input(format!(
                "{} transactions cannot be booked to the {} category '{}'",
                kind, category.kind, category.name
            )));
        }
        Ok(())
    }

    /// Checks every affected account against its credit limit before the
    /// write. The repository repeats the check inside the transaction.
    fn ensure_effects_allowed(&self, effects: &[BalanceEffect]) -> Result<()> {
        for effect in effects {
            let account = self.get_account(&effect.account_id)?;
            account.balance_after(effect.delta)?;
        }
        Ok(())
    }

    fn pending_budget_alerts(
        &self,
        kind: TransactionKind,
        category_id: Option<&str>,
        date: NaiveDate,
        amount: Decimal,
    ) -> Vec<BudgetAlert> {
        let (TransactionKind::Expense, Some(category_id)) = (kind, category_id) else {
            return Vec::new();
        };
        self.budget_service
            .check_budget_thresholds(category_id, date, amount)
            .unwrap_or_else(|e| {
                warn!("Budget threshold check failed for {}: {}", category_id, e);
                Vec::new()
            })
    }

    async fn notify_budget_alerts(&self, alerts: Vec<BudgetAlert>) {
        for alert in alerts {
            if let Err(e) = self
                .notification_service
                .create_notification(alert.to_notification())
                .await
            {
                warn!(
                    "Failed to record budget alert for category {}: {}",
                    alert.category_id, e
                );
            }
        }
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    async fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        new_transaction.validate()?;
        for account_id in std::iter::once(&new_transaction.account_id)
            .chain(new_transaction.to_account_id.as_ref())
        {
            let account = self.get_account(account_id)?;
            if !account.is_active {
                return Err(Error::invalid_input(format!(
                    "Account '{}' is inactive",
                    account.name
                )));
            }
        }
        self.ensure_category_matches(
            new_transaction.kind,
            new_transaction.category_id.as_deref(),
        )?;
        self.ensure_effects_allowed(&new_transaction.balance_effects())?;

        let alerts = self.pending_budget_alerts(
            new_transaction.kind,
            new_transaction.category_id.as_deref(),
            new_transaction.transaction_date,
            new_transaction.amount,
        );

        debug!(
            "Recording {} of {} on account {}",
            new_transaction.kind, new_transaction.amount, new_transaction.account_id
        );
        let created = self.repository.create(new_transaction).await?;
        self.notify_budget_alerts(alerts).await;
        Ok(created)
    }

    async fn update_transaction(&self, update: TransactionUpdate) -> Result<Transaction> {
        update.validate()?;
        let id = update.id.clone().unwrap_or_default();
        let existing = self.repository.get_by_id(&id)?;

        self.get_account(&update.account_id)?;
        if let Some(to_account_id) = update.to_account_id.as_deref() {
            self.get_account(to_account_id)?;
        }
        self.ensure_category_matches(update.kind, update.category_id.as_deref())?;
        let effects = net_balance_effects(&existing.balance_effects(), &update.balance_effects());
        self.ensure_effects_allowed(&effects)?;

        self.repository.update(update).await
    }

    async fn delete_transaction(&self, id: &str) -> Result<()> {
        let existing = self.repository.get_by_id(id)?;
        let effects = net_balance_effects(&existing.balance_effects(), &[]);
        self.ensure_effects_allowed(&effects)?;
        self.repository.delete(id).await?;
        Ok(())
    }

    fn get_transaction(&self, id: &str) -> Result<Transaction> {
        self.repository.get_by_id(id)
    }

    fn search_transactions(&self, filter: &TransactionFilter) -> Result<Page<Transaction>> {
        filter.validate()?;
        self.repository.search(filter)
    }
}
