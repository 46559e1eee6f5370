use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::budgets_model::{
    percent_used, Budget, BudgetAlert, BudgetLineVsActual, BudgetUpdate, BudgetVsActual,
    NewBudget, NewBudgetLine,
};
use super::budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
use crate::categories::{Category, CategoryRepositoryTrait};
use crate::constants::BUDGET_ALERT_THRESHOLDS;
use crate::transactions::{Transaction, TransactionKind, TransactionRepositoryTrait};
use crate::utils::{fiscal_year_of, fiscal_year_range, DateRange};
use crate::{Error, Result};

pub struct BudgetService {
    repository: Arc<dyn BudgetRepositoryTrait>,
    category_repository: Arc<dyn CategoryRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    fiscal_year_start_month: u32,
}

impl BudgetService {
    pub fn new(
        repository: Arc<dyn BudgetRepositoryTrait>,
        category_repository: Arc<dyn CategoryRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        fiscal_year_start_month: u32,
    ) -> Self {
        Self {
            repository,
            category_repository,
            transaction_repository,
            fiscal_year_start_month,
        }
    }

    /// Rejects a fiscal year that already belongs to another budget.
    fn ensure_year_available(&self, fiscal_year: i32, budget_id: Option<&str>) -> Result<()> {
        if let Some(existing) = self.repository.get_by_year(fiscal_year)? {
            if Some(existing.id.as_str()) != budget_id {
                warn!(
                    "Rejecting budget for fiscal year {}: already covered by {}",
                    fiscal_year, existing.id
                );
                return Err(Error::ConstraintViolation(format!(
                    "A budget for fiscal year {} already exists",
                    fiscal_year
                )));
            }
        }
        Ok(())
    }

    fn ensure_expense_categories(&self, lines: &[NewBudgetLine]) -> Result<()> {
        for line in lines {
            let category = self
                .category_repository
                .get_by_id(&line.category_id)
                .map_err(|e| {
                    if e.is_not_found() {
                        Error::invalid_input(format!(
                            "Category {} does not exist",
                            line.category_id
                        ))
                    } else {
                        e
                    }
                })?;
            if !category.is_expense() {
                return Err(Error::invalid_input(format!(
                    "Budget lines need expense categories, '{}' is {}",
                    category.name, category.kind
                )));
            }
        }
        Ok(())
    }

    fn fiscal_year_expenses(&self, fiscal_year: i32) -> Result<(DateRange, Vec<Transaction>)> {
        let period = fiscal_year_range(fiscal_year, self.fiscal_year_start_month)?;
        let expenses = self
            .transaction_repository
            .list_in_range(&period, Some(TransactionKind::Expense))?;
        Ok((period, expenses))
    }

    /// Expense total for a category and its children.
    fn spent_in(&self, category: &Category, expenses: &[Transaction]) -> Result<Decimal> {
        let mut ids: HashSet<String> = self
            .category_repository
            .get_children(&category.id)?
            .into_iter()
            .map(|c| c.id)
            .collect();
        ids.insert(category.id.clone());
        Ok(expenses
            .iter()
            .filter(|t| t.category_id.as_ref().is_some_and(|c| ids.contains(c)))
            .map(|t| t.amount)
            .sum())
    }
}

#[async_trait]
impl BudgetServiceTrait for BudgetService {
    async fn create_budget(&self, new_budget: NewBudget) -> Result<Budget> {
        new_budget.validate()?;
        self.ensure_year_available(new_budget.fiscal_year, None)?;
        self.ensure_expense_categories(&new_budget.lines)?;
        debug!(
            "Creating budget '{}' for fiscal year {} with {} lines",
            new_budget.name,
            new_budget.fiscal_year,
            new_budget.lines.len()
        );
        self.repository.create(new_budget).await
    }

    async fn update_budget(&self, update: BudgetUpdate) -> Result<Budget> {
        update.validate()?;
        let id = update.id.clone().unwrap_or_default();
        self.repository.get_by_id(&id)?;
        self.ensure_year_available(update.fiscal_year, Some(&id))?;
        self.ensure_expense_categories(&update.lines)?;
        self.repository.update(update).await
    }

    async fn delete_budget(&self, id: &str) -> Result<()> {
        match self.repository.delete(id).await? {
            0 => Err(Error::NotFound(format!("Budget {}", id))),
            _ => Ok(()),
        }
    }

    fn get_budget(&self, id: &str) -> Result<Budget> {
        self.repository.get_by_id(id)
    }

    fn get_budget_by_year(&self, fiscal_year: i32) -> Result<Option<Budget>> {
        self.repository.get_by_year(fiscal_year)
    }

    fn list_budgets(&self) -> Result<Vec<Budget>> {
        self.repository.list()
    }

    fn get_budget_vs_actual(&self, id: &str) -> Result<BudgetVsActual> {
        let budget = self.repository.get_by_id(id)?;
        let (period, expenses) = self.fiscal_year_expenses(budget.fiscal_year)?;

        let categories: HashMap<String, Category> = self
            .category_repository
            .list(None)?
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();

        let mut lines = Vec::with_capacity(budget.lines.len());
        for line in &budget.lines {
            let (name, actual) = match categories.get(&line.category_id) {
                Some(category) => (category.name.clone(), self.spent_in(category, &expenses)?),
                None => (line.category_id.clone(), Decimal::ZERO),
            };
            lines.push(BudgetLineVsActual::new(
                line.category_id.clone(),
                name,
                line.amount,
                actual,
            ));
        }

        let total_budgeted: Decimal = lines.iter().map(|l| l.budgeted).sum();
        let total_actual: Decimal = lines.iter().map(|l| l.actual).sum();
        Ok(BudgetVsActual {
            budget_id: budget.id,
            name: budget.name,
            fiscal_year: budget.fiscal_year,
            period,
            lines,
            total_budgeted,
            total_actual,
            total_difference: total_budgeted - total_actual,
            percent_used: percent_used(total_budgeted, total_actual),
        })
    }

    fn check_budget_thresholds(
        &self,
        category_id: &str,
        date: NaiveDate,
        amount: Decimal,
    ) -> Result<Vec<BudgetAlert>> {
        let fiscal_year = fiscal_year_of(date, self.fiscal_year_start_month)?;
        let Some(budget) = self.repository.get_by_year(fiscal_year)? else {
            return Ok(Vec::new());
        };

        // Spend on a sub-category also counts against its parent's line.
        let category = self.category_repository.get_by_id(category_id)?;
        let watched: Vec<&str> = std::iter::once(category.id.as_str())
            .chain(category.parent_id.as_deref())
            .collect();
        let lines: Vec<_> = budget
            .lines
            .iter()
            .filter(|l| watched.contains(&l.category_id.as_str()) && l.amount > Decimal::ZERO)
            .collect();
        if lines.is_empty() {
            return Ok(Vec::new());
        }

        let (_, expenses) = self.fiscal_year_expenses(fiscal_year)?;
        let mut alerts = Vec::new();
        for line in lines {
            let line_category = if line.category_id == category.id {
                category.clone()
            } else {
                self.category_repository.get_by_id(&line.category_id)?
            };
            let before = self.spent_in(&line_category, &expenses)?;
            let after = before + amount;
            for threshold in BUDGET_ALERT_THRESHOLDS {
                let limit = line.amount * Decimal::from(threshold) / Decimal::ONE_HUNDRED;
                if before < limit && after >= limit {
                    alerts.push(BudgetAlert {
                        budget_id: budget.id.clone(),
                        budget_name: budget.name.clone(),
                        fiscal_year,
                        category_id: line_category.id.clone(),
                        category_name: line_category.name.clone(),
                        threshold_percent: threshold,
                        budgeted: line.amount,
                        spent: after,
                    });
                }
            }
        }
        Ok(alerts)
    }
}
