//! Database models for budgets.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use fintrack_core::budgets::{Budget, BudgetLine, NewBudgetLine};
use fintrack_core::utils::parse_decimal_or_zero;

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::budgets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct BudgetDB {
    pub id: String,
    pub name: String,
    pub fiscal_year: i32,
    pub currency: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(
    Queryable, Identifiable, Insertable, Selectable, Associations, PartialEq, Debug, Clone,
)]
#[diesel(belongs_to(BudgetDB, foreign_key = budget_id))]
#[diesel(table_name = crate::schema::budget_lines)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BudgetLineDB {
    pub id: String,
    pub budget_id: String,
    pub category_id: String,
    pub amount: String,
}

impl BudgetLineDB {
    pub fn new(budget_id: &str, line: NewBudgetLine) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            budget_id: budget_id.to_string(),
            category_id: line.category_id,
            amount: line.amount.to_string(),
        }
    }
}

impl From<BudgetLineDB> for BudgetLine {
    fn from(db: BudgetLineDB) -> Self {
        Self {
            id: db.id,
            budget_id: db.budget_id,
            category_id: db.category_id,
            amount: parse_decimal_or_zero(&db.amount),
        }
    }
}

impl BudgetDB {
    pub fn into_domain(self, lines: Vec<BudgetLineDB>) -> Budget {
        Budget {
            id: self.id,
            name: self.name,
            fiscal_year: self.fiscal_year,
            currency: self.currency,
            notes: self.notes,
            lines: lines.into_iter().map(BudgetLine::from).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
