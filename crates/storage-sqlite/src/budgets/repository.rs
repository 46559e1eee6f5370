use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use fintrack_core::budgets::{Budget, BudgetRepositoryTrait, BudgetUpdate, NewBudget, NewBudgetLine};
use fintrack_core::{Error, Result};

use super::model::{BudgetDB, BudgetLineDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found_as, IntoCore};
use crate::schema::{budget_lines, budgets};

pub struct BudgetRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl BudgetRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn with_lines(conn: &mut SqliteConnection, budget: BudgetDB) -> Result<Budget> {
    let lines = BudgetLineDB::belonging_to(&budget)
        .select(BudgetLineDB::as_select())
        .order(budget_lines::category_id.asc())
        .load::<BudgetLineDB>(conn)
        .into_core()?;
    Ok(budget.into_domain(lines))
}

fn load_budget(conn: &mut SqliteConnection, id: &str) -> Result<Budget> {
    let budget = not_found_as(
        budgets::table
            .select(BudgetDB::as_select())
            .find(id)
            .first::<BudgetDB>(conn),
        || format!("Budget {}", id),
    )?;
    with_lines(conn, budget)
}

fn insert_lines(
    conn: &mut SqliteConnection,
    budget_id: &str,
    lines: Vec<NewBudgetLine>,
) -> Result<()> {
    let rows: Vec<BudgetLineDB> = lines
        .into_iter()
        .map(|line| BudgetLineDB::new(budget_id, line))
        .collect();
    if !rows.is_empty() {
        diesel::insert_into(budget_lines::table)
            .values(&rows)
            .execute(conn)
            .into_core()?;
    }
    Ok(())
}

#[async_trait]
impl BudgetRepositoryTrait for BudgetRepository {
    async fn create(&self, new_budget: NewBudget) -> Result<Budget> {
        new_budget.validate()?;

        self.writer
            .exec(move |conn| {
                let now = chrono::Utc::now().naive_utc();
                let row = BudgetDB {
                    id: new_budget
                        .id
                        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                    name: new_budget.name.trim().to_string(),
                    fiscal_year: new_budget.fiscal_year,
                    currency: new_budget.currency,
                    notes: new_budget.notes,
                    created_at: now,
                    updated_at: now,
                };
                diesel::insert_into(budgets::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                insert_lines(conn, &row.id, new_budget.lines)?;
                load_budget(conn, &row.id)
            })
            .await
    }

    async fn update(&self, update: BudgetUpdate) -> Result<Budget> {
        update.validate()?;
        let id = update
            .id
            .clone()
            .ok_or_else(|| Error::invalid_input("Budget ID is required for updates"))?;

        self.writer
            .exec(move |conn| {
                let existing = load_budget(conn, &id)?;
                let row = BudgetDB {
                    id: id.clone(),
                    name: update.name.trim().to_string(),
                    fiscal_year: update.fiscal_year,
                    currency: update.currency,
                    notes: update.notes,
                    created_at: existing.created_at,
                    updated_at: chrono::Utc::now().naive_utc(),
                };
                diesel::update(budgets::table.find(&id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;

                diesel::delete(budget_lines::table.filter(budget_lines::budget_id.eq(&id)))
                    .execute(conn)
                    .into_core()?;
                insert_lines(conn, &id, update.lines)?;
                load_budget(conn, &id)
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let id = id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(budgets::table.find(&id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    fn get_by_id(&self, id: &str) -> Result<Budget> {
        let mut conn = get_connection(&self.pool)?;
        load_budget(&mut conn, id)
    }

    fn get_by_year(&self, fiscal_year: i32) -> Result<Option<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        let budget = budgets::table
            .filter(budgets::fiscal_year.eq(fiscal_year))
            .select(BudgetDB::as_select())
            .first::<BudgetDB>(&mut conn)
            .optional()
            .into_core()?;
        budget.map(|b| with_lines(&mut conn, b)).transpose()
    }

    fn list(&self) -> Result<Vec<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = budgets::table
            .select(BudgetDB::as_select())
            .order(budgets::fiscal_year.desc())
            .load::<BudgetDB>(&mut conn)
            .into_core()?;
        let lines = BudgetLineDB::belonging_to(&rows)
            .select(BudgetLineDB::as_select())
            .order(budget_lines::category_id.asc())
            .load::<BudgetLineDB>(&mut conn)
            .into_core()?
            .grouped_by(&rows);
        Ok(rows
            .into_iter()
            .zip(lines)
            .map(|(budget, lines)| budget.into_domain(lines))
            .collect())
    }
}
