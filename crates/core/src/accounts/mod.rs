//! Accounts module - domain models, services, and traits.

mod accounts_model;
mod accounts_service;
mod accounts_traits;

#[cfg(test)]
mod accounts_model_tests;
#[cfg(test)]
mod accounts_service_tests;

// Re-export the public interface
pub use accounts_model::{
    build_account_tree, ensure_within_credit_limit, Account, AccountFilter, AccountNode,
    AccountType, AccountUpdate, NewAccount,
};
pub use accounts_service::AccountService;
pub use accounts_traits::{AccountRepositoryTrait, AccountServiceTrait};
