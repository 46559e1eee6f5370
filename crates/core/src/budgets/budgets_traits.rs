use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::budgets_model::{Budget, BudgetAlert, BudgetUpdate, BudgetVsActual, NewBudget};
use crate::errors::Result;

#[async_trait]
pub trait BudgetRepositoryTrait: Send + Sync {
    /// Inserts the budget and its lines in one transaction.
    async fn create(&self, new_budget: NewBudget) -> Result<Budget>;

    /// Updates the budget row and replaces all of its lines in one transaction.
    async fn update(&self, update: BudgetUpdate) -> Result<Budget>;

    async fn delete(&self, id: &str) -> Result<usize>;

    fn get_by_id(&self, id: &str) -> Result<Budget>;

    fn get_by_year(&self, fiscal_year: i32) -> Result<Option<Budget>>;

    /// Newest fiscal year first.
    fn list(&self) -> Result<Vec<Budget>>;
}

#[async_trait]
pub trait BudgetServiceTrait: Send + Sync {
    async fn create_budget(&self, new_budget: NewBudget) -> Result<Budget>;

    async fn update_budget(&self, update: BudgetUpdate) -> Result<Budget>;

    async fn delete_budget(&self, id: &str) -> Result<()>;

    fn get_budget(&self, id: &str) -> Result<Budget>;

    fn get_budget_by_year(&self, fiscal_year: i32) -> Result<Option<Budget>>;

    fn list_budgets(&self) -> Result<Vec<Budget>>;

    /// Budgeted amounts against the expenses booked in the budget's fiscal
    /// year.
    fn get_budget_vs_actual(&self, id: &str) -> Result<BudgetVsActual>;

    /// Alerts for the usage thresholds that adding an expense of `amount`
    /// on `date` to `category_id` would cross.
    fn check_budget_thresholds(
        &self,
        category_id: &str,
        date: NaiveDate,
        amount: Decimal,
    ) -> Result<Vec<BudgetAlert>>;
}
