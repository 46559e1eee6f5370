//! SQLite storage implementation for budgets and their lines.

mod model;
mod repository;

pub use model::{BudgetDB, BudgetLineDB};
pub use repository::BudgetRepository;
