//! SQLite storage implementation for Fintrack.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `fintrack-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for all domain entities
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! Every write goes through the single writer actor in [`db::write_actor`], which
//! runs each job in its own immediate transaction.
//!
//! ```text
//!   server (axum)
//!        │
//!        ▼
//!   core (services, traits)
//!        │
//!        ▼
//!   storage-sqlite (this crate)
//!        │
//!        ▼
//!     SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod notifications;
pub mod partners;
pub mod tiers;
pub mod transactions;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export repositories
pub use accounts::AccountRepository;
pub use budgets::BudgetRepository;
pub use categories::CategoryRepository;
pub use notifications::NotificationRepository;
pub use partners::PartnerRepository;
pub use tiers::TierRepository;
pub use transactions::TransactionRepository;

// Re-export from fintrack-core for convenience
pub use fintrack_core::errors::{DatabaseError, Error, Result};
