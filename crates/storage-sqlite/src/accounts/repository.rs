use async_trait::async_trait;
use diesel::prelude::*;
use log::debug;
use std::sync::Arc;

use fintrack_core::accounts::{
    Account, AccountFilter, AccountRepositoryTrait, AccountUpdate, NewAccount,
};
use fintrack_core::transactions::BalanceEffect;
use fintrack_core::{Error, Result};

use super::model::AccountDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found_as, IntoCore};
use crate::schema::{accounts, transactions};

/// Repository for managing account data in the database
pub struct AccountRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AccountRepository {
    /// Creates a new AccountRepository instance
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_account(conn: &mut SqliteConnection, account_id: &str) -> Result<AccountDB> {
    not_found_as(
        accounts::table
            .select(AccountDB::as_select())
            .find(account_id)
            .first::<AccountDB>(conn),
        || format!("Account {}", account_id),
    )
}

/// Applies balance deltas inside the caller's write transaction.
///
/// Every resulting balance is checked against the account's credit limit; the
/// first violation aborts with `ConstraintViolation`, and the caller's
/// transaction rolls back the deltas already written.
pub(crate) fn apply_balance_effects(
    conn: &mut SqliteConnection,
    effects: &[BalanceEffect],
) -> Result<()> {
    let now = chrono::Utc::now().naive_utc();
    for effect in effects {
        let account: Account = load_account(conn, &effect.account_id)?.into();
        let next = account.balance_after(effect.delta)?;
        diesel::update(accounts::table.find(&account.id))
            .set((
                accounts::balance.eq(next.to_string()),
                accounts::updated_at.eq(now),
            ))
            .execute(conn)
            .into_core()?;
    }
    Ok(())
}

#[async_trait]
impl AccountRepositoryTrait for AccountRepository {
    async fn create(&self, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;

        self.writer
            .exec(move |conn| {
                let account_db: AccountDB = new_account.into();
                diesel::insert_into(accounts::table)
                    .values(&account_db)
                    .execute(conn)
                    .into_core()?;
                Ok(account_db.into())
            })
            .await
    }

    async fn update(&self, account_update: AccountUpdate) -> Result<Account> {
        account_update.validate()?;

        self.writer
            .exec(move |conn| {
                let mut account_db: AccountDB = account_update.into();
                let existing = load_account(conn, &account_db.id)?;

                account_db.currency = existing.currency;
                account_db.balance = existing.balance;
                account_db.created_at = existing.created_at;

                // The balance may have moved since the service looked at it.
                let account: Account = account_db.clone().into();
                fintrack_core::accounts::ensure_within_credit_limit(
                    &account.name,
                    account.balance,
                    account.credit_limit,
                )?;

                diesel::update(accounts::table.find(&account_db.id))
                    .set(&account_db)
                    .execute(conn)
                    .into_core()?;

                Ok(account)
            })
            .await
    }

    async fn delete(&self, account_id: &str) -> Result<usize> {
        let account_id = account_id.to_string();
        self.writer
            .exec(move |conn| {
                let referenced: i64 = transactions::table
                    .filter(
                        transactions::account_id
                            .eq(&account_id)
                            .or(transactions::to_account_id.eq(&account_id)),
                    )
                    .count()
                    .get_result(conn)
                    .into_core()?;
                if referenced > 0 {
                    return Err(Error::ConstraintViolation(format!(
                        "Cannot delete account: {} transactions are booked on it",
                        referenced
                    )));
                }
                diesel::delete(accounts::table.find(&account_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    fn get_by_id(&self, account_id: &str) -> Result<Account> {
        let mut conn = get_connection(&self.pool)?;
        Ok(load_account(&mut conn, account_id)?.into())
    }

    fn list(&self, filter: &AccountFilter) -> Result<Vec<Account>> {
        debug!("Listing accounts with {:?}", filter);
        let mut conn = get_connection(&self.pool)?;

        let mut query = accounts::table.into_boxed();

        if let Some(active) = filter.is_active {
            query = query.filter(accounts::is_active.eq(active));
        }
        if let Some(parent) = filter.parent_id.as_deref() {
            query = query.filter(accounts::parent_id.eq(parent.to_string()));
        }

        let results = query
            .select(AccountDB::as_select())
            .order((accounts::is_active.desc(), accounts::name.asc()))
            .load::<AccountDB>(&mut conn)
            .into_core()?;

        Ok(results.into_iter().map(Account::from).collect())
    }

    fn count_transactions(&self, account_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        transactions::table
            .filter(
                transactions::account_id
                    .eq(account_id)
                    .or(transactions::to_account_id.eq(account_id)),
            )
            .count()
            .get_result(&mut conn)
            .into_core()
    }
}
