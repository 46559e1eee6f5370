//! Transactions module - income, expenses and transfers that move account
//! balances.

mod transactions_model;
mod transactions_service;
mod transactions_traits;

#[cfg(test)]
mod transactions_model_tests;

pub use transactions_model::{
    balance_effects, net_balance_effects, BalanceEffect, NewTransaction, SortDirection,
    Transaction, TransactionFilter, TransactionKind, TransactionSortField, TransactionUpdate,
};
pub use transactions_service::TransactionService;
pub use transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
