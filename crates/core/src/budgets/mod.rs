//! Budgets module - one budget per fiscal year with per-category lines.

mod budgets_model;
mod budgets_service;
mod budgets_traits;


pub use budgets_model::{
    Budget, BudgetAlert, BudgetLine, BudgetLineVsActual, BudgetUpdate, BudgetVsActual,
    NewBudget, NewBudgetLine,
};
pub use budgets_service::BudgetService;
pub use budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
