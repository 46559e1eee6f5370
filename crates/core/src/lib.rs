//! Fintrack Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for Fintrack: accounts,
//! categories, transactions, budgets, membership tiers, partners,
//! notifications and the report/chart math. It is database-agnostic and
//! defines traits that are implemented by the `storage-sqlite` crate.

pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod constants;
pub mod errors;
pub mod notifications;
pub mod pagination;
pub mod partners;
pub mod reports;
pub mod tiers;
pub mod transactions;
pub mod utils;

pub use pagination::{Page, PageRequest};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
