use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Double;
use diesel::sqlite::Sqlite;
use log::debug;
use std::sync::Arc;

use fintrack_core::transactions::{
    net_balance_effects, BalanceEffect, NewTransaction, SortDirection, Transaction,
    TransactionFilter, TransactionKind, TransactionRepositoryTrait, TransactionSortField,
    TransactionUpdate,
};
use fintrack_core::utils::DateRange;
use fintrack_core::{Error, Page, Result};

use super::model::TransactionDB;
use crate::accounts::apply_balance_effects;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found_as, IntoCore};
use crate::schema::transactions;
use crate::utils::{contains_pattern, LIKE_ESCAPE};

pub struct TransactionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TransactionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_transaction(conn: &mut SqliteConnection, id: &str) -> Result<Transaction> {
    not_found_as(
        transactions::table
            .select(TransactionDB::as_select())
            .find(id)
            .first::<TransactionDB>(conn),
        || format!("Transaction {}", id),
    )?
    .try_into()
}

fn to_domain(rows: Vec<TransactionDB>) -> Result<Vec<Transaction>> {
    rows.into_iter().map(Transaction::try_from).collect()
}

fn filtered<'a>(filter: &'a TransactionFilter) -> transactions::BoxedQuery<'a, Sqlite> {
    let mut query = transactions::table.into_boxed();

    if let Some(account) = filter.account_id.as_deref() {
        query = query.filter(
            transactions::account_id
                .eq(account)
                .or(transactions::to_account_id.eq(account)),
        );
    }
    if let Some(category) = filter.category_id.as_deref() {
        query = query.filter(transactions::category_id.eq(category));
    }
    if let Some(kind) = filter.kind {
        query = query.filter(transactions::kind.eq(kind.as_str()));
    }
    if let Some(start) = filter.start_date {
        query = query.filter(transactions::transaction_date.ge(start));
    }
    if let Some(end) = filter.end_date {
        query = query.filter(transactions::transaction_date.le(end));
    }
    if let Some(search) = filter.search.as_deref().map(str::trim) {
        if !search.is_empty() {
            query = query.filter(
                transactions::description
                    .like(contains_pattern(search))
                    .escape(LIKE_ESCAPE),
            );
        }
    }
    query
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    async fn create(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        new_transaction.validate()?;

        self.writer
            .exec(move |conn| {
                apply_balance_effects(conn, &new_transaction.balance_effects())?;

                let row: TransactionDB = new_transaction.into();
                diesel::insert_into(transactions::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Transaction::try_from(row)
            })
            .await
    }

    async fn update(&self, update: TransactionUpdate) -> Result<Transaction> {
        update.validate()?;
        let id = update
            .id
            .clone()
            .ok_or_else(|| Error::invalid_input("Transaction ID is required for updates"))?;

        self.writer
            .exec(move |conn| {
                let existing = load_transaction(conn, &id)?;
                let effects =
                    net_balance_effects(&existing.balance_effects(), &update.balance_effects());
                apply_balance_effects(conn, &effects)?;

                let mut row: TransactionDB = update.into();
                row.created_at = existing.created_at;
                diesel::update(transactions::table.find(&id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                Transaction::try_from(row)
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<Transaction> {
        let id = id.to_string();

        self.writer
            .exec(move |conn| {
                let existing = load_transaction(conn, &id)?;
                let reverted: Vec<BalanceEffect> = existing
                    .balance_effects()
                    .into_iter()
                    .map(|e| BalanceEffect {
                        account_id: e.account_id,
                        delta: -e.delta,
                    })
                    .collect();
                apply_balance_effects(conn, &reverted)?;

                diesel::delete(transactions::table.find(&id))
                    .execute(conn)
                    .into_core()?;
                Ok(existing)
            })
            .await
    }

    fn get_by_id(&self, id: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;
        load_transaction(&mut conn, id)
    }

    fn search(&self, filter: &TransactionFilter) -> Result<Page<Transaction>> {
        filter.validate()?;
        let request = filter.page_request();
        debug!("Searching transactions with {:?}", filter);
        let mut conn = get_connection(&self.pool)?;

        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .into_core()?;

        let query = filtered(filter);
        let query = match (filter.sort_by, filter.sort_direction) {
            (TransactionSortField::TransactionDate, SortDirection::Asc) => {
                query.order(transactions::transaction_date.asc())
            }
            (TransactionSortField::TransactionDate, SortDirection::Desc) => {
                query.order(transactions::transaction_date.desc())
            }
            (TransactionSortField::Amount, SortDirection::Asc) => {
                query.order(sql::<Double>("CAST(amount AS REAL)").asc())
            }
            (TransactionSortField::Amount, SortDirection::Desc) => {
                query.order(sql::<Double>("CAST(amount AS REAL)").desc())
            }
            (TransactionSortField::CreatedAt, SortDirection::Asc) => {
                query.order(transactions::created_at.asc())
            }
            (TransactionSortField::CreatedAt, SortDirection::Desc) => {
                query.order(transactions::created_at.desc())
            }
        };

        let rows = query
            .then_order_by(transactions::created_at.desc())
            .then_order_by(transactions::id.asc())
            .select(TransactionDB::as_select())
            .limit(request.limit())
            .offset(request.offset())
            .load::<TransactionDB>(&mut conn)
            .into_core()?;

        Ok(Page::new(to_domain(rows)?, total, request))
    }

    fn list_in_range(
        &self,
        range: &DateRange,
        kind: Option<TransactionKind>,
    ) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = transactions::table
            .filter(transactions::transaction_date.ge(range.start))
            .filter(transactions::transaction_date.lt(range.end))
            .into_boxed();
        if let Some(kind) = kind {
            query = query.filter(transactions::kind.eq(kind.as_str()));
        }
        let rows = query
            .select(TransactionDB::as_select())
            .order((transactions::transaction_date.asc(), transactions::id.asc()))
            .load::<TransactionDB>(&mut conn)
            .into_core()?;
        to_domain(rows)
    }
}
