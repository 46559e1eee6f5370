//! Account repository and service traits.
//!
//! These traits define the contract for account operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::accounts_model::{Account, AccountFilter, AccountNode, AccountUpdate, NewAccount};
use crate::errors::Result;

/// Trait defining the contract for Account repository operations.
#[async_trait]
pub trait AccountRepositoryTrait: Send + Sync {
    /// Creates a new account.
    async fn create(&self, new_account: NewAccount) -> Result<Account>;

    /// Updates an existing account. Currency and balance are preserved.
    async fn update(&self, account_update: AccountUpdate) -> Result<Account>;

    /// Deletes an account by its ID.
    ///
    /// Returns the number of deleted records.
    async fn delete(&self, account_id: &str) -> Result<usize>;

    /// Retrieves an account by its ID.
    fn get_by_id(&self, account_id: &str) -> Result<Account>;

    /// Lists accounts matching the filter, active accounts first, then by name.
    fn list(&self, filter: &AccountFilter) -> Result<Vec<Account>>;

    /// Number of transactions booked on the account, as source or destination.
    fn count_transactions(&self, account_id: &str) -> Result<i64>;
}

/// Trait defining the contract for Account service operations.
#[async_trait]
pub trait AccountServiceTrait: Send + Sync {
    /// Creates a new account with business validation.
    async fn create_account(&self, new_account: NewAccount) -> Result<Account>;

    /// Updates an existing account with business validation.
    async fn update_account(&self, account_update: AccountUpdate) -> Result<Account>;

    /// Deletes an account that has no transactions and no sub-accounts.
    async fn delete_account(&self, account_id: &str) -> Result<()>;

    fn get_account(&self, account_id: &str) -> Result<Account>;

    fn list_accounts(&self, filter: &AccountFilter) -> Result<Vec<Account>>;

    fn get_active_accounts(&self) -> Result<Vec<Account>>;

    /// All accounts arranged by their parent linkage.
    fn get_account_tree(&self) -> Result<Vec<AccountNode>>;

    /// Sum of the balances of all active accounts.
    fn total_active_balance(&self) -> Result<Decimal>;
}
