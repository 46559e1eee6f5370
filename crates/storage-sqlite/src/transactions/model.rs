//! Database model for transactions.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use fintrack_core::transactions::{NewTransaction, Transaction, TransactionUpdate};
use fintrack_core::utils::parse_decimal_or_zero;
use fintrack_core::{Error, Result};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct TransactionDB {
    pub id: String,
    pub account_id: String,
    pub to_account_id: Option<String>,
    pub category_id: Option<String>,
    pub partner_id: Option<String>,
    pub kind: String,
    pub amount: String,
    pub description: Option<String>,
    pub transaction_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = Error;

    fn try_from(db: TransactionDB) -> Result<Self> {
        Ok(Self {
            id: db.id,
            account_id: db.account_id,
            to_account_id: db.to_account_id,
            category_id: db.category_id,
            partner_id: db.partner_id,
            kind: db.kind.parse()?,
            amount: parse_decimal_or_zero(&db.amount),
            description: db.description,
            transaction_date: db.transaction_date,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<NewTransaction> for TransactionDB {
    fn from(domain: NewTransaction) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            account_id: domain.account_id,
            to_account_id: domain.to_account_id,
            category_id: domain.category_id,
            partner_id: domain.partner_id,
            kind: domain.kind.as_str().to_string(),
            amount: domain.amount.to_string(),
            description: domain.description,
            transaction_date: domain.transaction_date,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<TransactionUpdate> for TransactionDB {
    fn from(domain: TransactionUpdate) -> Self {
        Self {
            id: domain.id.unwrap_or_default(),
            account_id: domain.account_id,
            to_account_id: domain.to_account_id,
            category_id: domain.category_id,
            partner_id: domain.partner_id,
            kind: domain.kind.as_str().to_string(),
            amount: domain.amount.to_string(),
            description: domain.description,
            transaction_date: domain.transaction_date,
            created_at: NaiveDateTime::default(), // kept from the existing record
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}
