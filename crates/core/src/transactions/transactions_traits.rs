use async_trait::async_trait;

use super::transactions_model::{
    NewTransaction, Transaction, TransactionFilter, TransactionKind, TransactionUpdate,
};
use crate::utils::DateRange;
use crate::{Page, Result};

/// Trait for transaction repository operations.
///
/// Writes apply the balance effects of the transaction to the affected
/// accounts in the same database transaction as the row change. If any
/// resulting balance falls below the account's negated credit limit the
/// whole write is rolled back with `Error::ConstraintViolation`.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    async fn create(&self, new_transaction: NewTransaction) -> Result<Transaction>;

    /// Reverts the stored transaction's effects and applies the new ones.
    async fn update(&self, update: TransactionUpdate) -> Result<Transaction>;

    /// Deletes the row and reverts its effects.
    async fn delete(&self, id: &str) -> Result<Transaction>;

    fn get_by_id(&self, id: &str) -> Result<Transaction>;

    fn search(&self, filter: &TransactionFilter) -> Result<Page<Transaction>>;

    /// All transactions dated within `range`, optionally of one kind.
    fn list_in_range(
        &self,
        range: &DateRange,
        kind: Option<TransactionKind>,
    ) -> Result<Vec<Transaction>>;
}

#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    /// Books a transaction. Recording an expense may raise budget alerts.
    async fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction>;

    async fn update_transaction(&self, update: TransactionUpdate) -> Result<Transaction>;

    async fn delete_transaction(&self, id: &str) -> Result<()>;

    fn get_transaction(&self, id: &str) -> Result<Transaction>;

    fn search_transactions(&self, filter: &TransactionFilter) -> Result<Page<Transaction>>;
}
