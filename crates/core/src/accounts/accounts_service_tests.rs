//! Unit tests for the account service.

use super::*;
use crate::errors::{Error, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock Implementations
// ============================================================================

#[derive(Default)]
struct MockAccountRepository {
    accounts: Mutex<Vec<Account>>,
    transaction_counts: HashMap<String, i64>,
}

impl MockAccountRepository {
    fn with_accounts(accounts: Vec<Account>) -> Self {
        Self {
            accounts: Mutex::new(accounts),
            transaction_counts: HashMap::new(),
        }
    }
}

#[async_trait]
impl AccountRepositoryTrait for MockAccountRepository {
    async fn create(&self, new_account: NewAccount) -> Result<Account> {
        let account = Account {
            id: new_account.id.unwrap_or_else(|| "generated".to_string()),
            name: new_account.name,
            account_type: new_account.account_type,
            parent_id: new_account.parent_id,
            currency: new_account.currency,
            balance: new_account.balance,
            credit_limit: new_account.credit_limit,
            is_active: new_account.is_active,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        };
        self.accounts.lock().unwrap().push(account.clone());
        Ok(account)
    }

    async fn update(&self, account_update: AccountUpdate) -> Result<Account> {
        let mut accounts = self.accounts.lock().unwrap();
        let id = account_update.id.clone().unwrap_or_default();
        let existing = accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::NotFound(format!("Account {}", id)))?;
        existing.name = account_update.name;
        existing.account_type = account_update.account_type;
        existing.parent_id = account_update.parent_id;
        existing.credit_limit = account_update.credit_limit;
        existing.is_active = account_update.is_active;
        Ok(existing.clone())
    }

    async fn delete(&self, account_id: &str) -> Result<usize> {
        let mut accounts = self.accounts.lock().unwrap();
        let before = accounts.len();
        accounts.retain(|a| a.id != account_id);
        Ok(before - accounts.len())
    }

    fn get_by_id(&self, account_id: &str) -> Result<Account> {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == account_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Account {}", account_id)))
    }

    fn list(&self, filter: &AccountFilter) -> Result<Vec<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| filter.is_active.map_or(true, |active| a.is_active == active))
            .filter(|a| {
                filter
                    .parent_id
                    .as_ref()
                    .map_or(true, |p| a.parent_id.as_ref() == Some(p))
            })
            .cloned()
            .collect())
    }

    fn count_transactions(&self, account_id: &str) -> Result<i64> {
        Ok(*self.transaction_counts.get(account_id).unwrap_or(&0))
    }
}

fn account(id: &str, parent: Option<&str>, balance: Decimal) -> Account {
    Account {
        id: id.to_string(),
        name: id.to_uppercase(),
        account_type: AccountType::Checking,
        parent_id: parent.map(str::to_string),
        currency: "USD".to_string(),
        balance,
        credit_limit: None,
        is_active: true,
        created_at: NaiveDateTime::default(),
        updated_at: NaiveDateTime::default(),
    }
}

fn update_for(acc: &Account) -> AccountUpdate {
    AccountUpdate {
        id: Some(acc.id.clone()),
        name: acc.name.clone(),
        account_type: acc.account_type,
        parent_id: acc.parent_id.clone(),
        credit_limit: acc.credit_limit,
        is_active: acc.is_active,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_create_account_with_missing_parent_is_rejected() {
    let service = AccountService::new(Arc::new(MockAccountRepository::default()));
    let result = service
        .create_account(NewAccount {
            id: None,
            name: "Sub".to_string(),
            account_type: AccountType::Savings,
            parent_id: Some("nope".to_string()),
            currency: "USD".to_string(),
            balance: Decimal::ZERO,
            credit_limit: None,
            is_active: true,
        })
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_update_rejects_cycle() {
    let root = account("root", None, dec!(0));
    let child = account("child", Some("root"), dec!(0));
    let repo = MockAccountRepository::with_accounts(vec![root.clone(), child.clone()]);
    let service = AccountService::new(Arc::new(repo));

    let mut update = update_for(&root);
    update.parent_id = Some("child".to_string());
    let result = service.update_account(update).await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_update_rejects_credit_limit_below_current_debt() {
    let mut card = account("card", None, dec!(-300));
    card.credit_limit = Some(dec!(1000));
    let repo = MockAccountRepository::with_accounts(vec![card.clone()]);
    let service = AccountService::new(Arc::new(repo));

    let mut update = update_for(&card);
    update.credit_limit = Some(dec!(200));
    let result = service.update_account(update).await;
    assert!(matches!(result, Err(Error::ConstraintViolation(_))));

    let mut update = update_for(&card);
    update.credit_limit = Some(dec!(300));
    assert!(service.update_account(update).await.is_ok());
}

#[tokio::test]
async fn test_delete_refused_with_children_or_transactions() {
    let repo = MockAccountRepository {
        accounts: Mutex::new(vec![
            account("root", None, dec!(0)),
            account("child", Some("root"), dec!(0)),
            account("busy", None, dec!(0)),
        ]),
        transaction_counts: HashMap::from([("busy".to_string(), 3)]),
    };
    let service = AccountService::new(Arc::new(repo));

    assert!(matches!(
        service.delete_account("root").await,
        Err(Error::ConstraintViolation(_))
    ));
    assert!(matches!(
        service.delete_account("busy").await,
        Err(Error::ConstraintViolation(_))
    ));
    assert!(service.delete_account("child").await.is_ok());
    assert!(service.delete_account("child").await.unwrap_err().is_not_found());
}

#[test]
fn test_total_active_balance_ignores_inactive() {
    let mut closed = account("closed", None, dec!(1000));
    closed.is_active = false;
    let repo = MockAccountRepository::with_accounts(vec![
        account("a", None, dec!(10.5)),
        account("b", None, dec!(-4)),
        closed,
    ]);
    let service = AccountService::new(Arc::new(repo));
    assert_eq!(service.total_active_balance().unwrap(), dec!(6.5));
}
