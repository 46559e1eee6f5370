use async_trait::async_trait;
use diesel::prelude::*;
use log::{debug, info};
use std::sync::Arc;

use fintrack_core::categories::{
    Category, CategoryKind, CategoryRepositoryTrait, CategoryUpdate, CategoryUsage, NewCategory,
};
use fintrack_core::utils::parse_decimal_or_zero;
use fintrack_core::{Error, Result};

use super::model::CategoryDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found_as, IntoCore};
use crate::schema::{budget_lines, categories, transactions};

pub struct CategoryRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CategoryRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_category(conn: &mut SqliteConnection, id: &str) -> Result<CategoryDB> {
    not_found_as(
        categories::table
            .select(CategoryDB::as_select())
            .find(id)
            .first::<CategoryDB>(conn),
        || format!("Category {}", id),
    )
}

fn usage_of(conn: &mut SqliteConnection, category_id: &str) -> Result<CategoryUsage> {
    let transactions = transactions::table
        .filter(transactions::category_id.eq(category_id))
        .count()
        .get_result::<i64>(conn)
        .into_core()?;
    let budget_lines = budget_lines::table
        .filter(budget_lines::category_id.eq(category_id))
        .count()
        .get_result::<i64>(conn)
        .into_core()?;
    Ok(CategoryUsage {
        transactions,
        budget_lines,
    })
}

/// Moves the budget lines of `from` onto `to`. A budget that already has a
/// line for `to` gets the amounts summed into that line.
fn merge_budget_lines(conn: &mut SqliteConnection, from: &str, to: &str) -> Result<usize> {
    let moved: Vec<(String, String, String)> = budget_lines::table
        .filter(budget_lines::category_id.eq(from))
        .select((budget_lines::id, budget_lines::budget_id, budget_lines::amount))
        .load(conn)
        .into_core()?;

    for (line_id, budget_id, amount) in &moved {
        let target: Option<(String, String)> = budget_lines::table
            .filter(budget_lines::budget_id.eq(budget_id))
            .filter(budget_lines::category_id.eq(to))
            .select((budget_lines::id, budget_lines::amount))
            .first(conn)
            .optional()
            .into_core()?;

        match target {
            Some((target_id, target_amount)) => {
                let merged = parse_decimal_or_zero(&target_amount) + parse_decimal_or_zero(amount);
                diesel::update(budget_lines::table.find(&target_id))
                    .set(budget_lines::amount.eq(merged.to_string()))
                    .execute(conn)
                    .into_core()?;
                diesel::delete(budget_lines::table.find(line_id))
                    .execute(conn)
                    .into_core()?;
            }
            None => {
                diesel::update(budget_lines::table.find(line_id))
                    .set(budget_lines::category_id.eq(to))
                    .execute(conn)
                    .into_core()?;
            }
        }
    }
    Ok(moved.len())
}

#[async_trait]
impl CategoryRepositoryTrait for CategoryRepository {
    fn list(&self, kind: Option<CategoryKind>) -> Result<Vec<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = categories::table.into_boxed();
        if let Some(kind) = kind {
            query = query.filter(categories::kind.eq(kind.as_str()));
        }
        let rows = query
            .select(CategoryDB::as_select())
            .order((categories::sort_order.asc(), categories::name.asc()))
            .load::<CategoryDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    fn get_by_id(&self, id: &str) -> Result<Category> {
        let mut conn = get_connection(&self.pool)?;
        Ok(load_category(&mut conn, id)?.into())
    }

    fn get_children(&self, parent_id: &str) -> Result<Vec<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = categories::table
            .filter(categories::parent_id.eq(parent_id))
            .select(CategoryDB::as_select())
            .order((categories::sort_order.asc(), categories::name.asc()))
            .load::<CategoryDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    fn get_usage(&self, category_id: &str) -> Result<CategoryUsage> {
        let mut conn = get_connection(&self.pool)?;
        usage_of(&mut conn, category_id)
    }

    async fn create(&self, new_category: NewCategory) -> Result<Category> {
        self.writer
            .exec(move |conn| {
                let row: CategoryDB = new_category.into();
                diesel::insert_into(categories::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn update(&self, update: CategoryUpdate) -> Result<Category> {
        let id = update
            .id
            .clone()
            .ok_or_else(|| Error::invalid_input("Category ID is required for updates"))?;

        self.writer
            .exec(move |conn| {
                let mut row = load_category(conn, &id)?;
                row.name = update.name.trim().to_string();
                row.color = update.color;
                row.icon = update.icon;
                if let Some(sort_order) = update.sort_order {
                    row.sort_order = sort_order;
                }
                row.updated_at = chrono::Utc::now().naive_utc();

                diesel::update(categories::table.find(&id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, id: &str, replacement_id: Option<String>) -> Result<usize> {
        let id = id.to_string();

        self.writer
            .exec(move |conn| {
                let category = load_category(conn, &id)?;

                let reassigned = match replacement_id.as_deref() {
                    Some(replacement) => {
                        load_category(conn, replacement)?;
                        let reassigned = diesel::update(
                            transactions::table.filter(transactions::category_id.eq(&id)),
                        )
                        .set(transactions::category_id.eq(replacement))
                        .execute(conn)
                        .into_core()?;
                        let lines = merge_budget_lines(conn, &id, replacement)?;
                        debug!(
                            "Moved {} transactions and {} budget lines from category {} to {}",
                            reassigned, lines, id, replacement
                        );
                        reassigned
                    }
                    None => {
                        let usage = usage_of(conn, &id)?;
                        if !usage.is_unused() {
                            return Err(Error::ConstraintViolation(format!(
                                "Category '{}' is still referenced",
                                category.name
                            )));
                        }
                        0
                    }
                };

                diesel::update(categories::table.filter(categories::parent_id.eq(&id)))
                    .set(categories::parent_id.eq(category.parent_id.clone()))
                    .execute(conn)
                    .into_core()?;

                diesel::delete(categories::table.find(&id))
                    .execute(conn)
                    .into_core()?;

                info!("Deleted category '{}' ({})", category.name, id);
                Ok(reassigned)
            })
            .await
    }
}
