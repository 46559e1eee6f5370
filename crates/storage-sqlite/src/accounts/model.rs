//! Database model for accounts.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use fintrack_core::accounts::{Account, AccountUpdate, NewAccount};
use fintrack_core::utils::{parse_decimal_or_zero, parse_optional_decimal};

/// Database model for accounts
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct AccountDB {
    pub id: String,
    pub name: String,
    pub account_type: String,
    pub parent_id: Option<String>,
    pub currency: String,
    pub balance: String,
    pub credit_limit: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<AccountDB> for Account {
    fn from(db: AccountDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            account_type: db.account_type.parse().unwrap_or_default(),
            parent_id: db.parent_id,
            currency: db.currency,
            balance: parse_decimal_or_zero(&db.balance),
            credit_limit: parse_optional_decimal(db.credit_limit.as_deref()),
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewAccount> for AccountDB {
    fn from(domain: NewAccount) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: domain.name.trim().to_string(),
            account_type: domain.account_type.as_str().to_string(),
            parent_id: domain.parent_id,
            currency: domain.currency,
            balance: domain.balance.to_string(),
            credit_limit: domain.credit_limit.map(|l| l.to_string()),
            is_active: domain.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<AccountUpdate> for AccountDB {
    fn from(domain: AccountUpdate) -> Self {
        Self {
            id: domain.id.unwrap_or_default(),
            name: domain.name.trim().to_string(),
            account_type: domain.account_type.as_str().to_string(),
            parent_id: domain.parent_id,
            currency: String::new(), // filled from the existing record
            balance: String::new(),  // filled from the existing record
            credit_limit: domain.credit_limit.map(|l| l.to_string()),
            is_active: domain.is_active,
            created_at: NaiveDateTime::default(),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}
