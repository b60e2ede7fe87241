//! Accounts module - domain models, services, and traits.

mod accounts_constants;
mod accounts_model;
mod accounts_service;
mod accounts_traits;

#[cfg(test)]
mod accounts_model_tests;


// Re-export the public interface
pub use accounts_constants::*;
pub use accounts_model::{
    Account, AccountType, Balances, CashMovement, CashTransaction, NewAccount, NewCashTransaction,
    TransactionType,
};
pub use accounts_service::{generate_account_number, generate_transaction_number, AccountService};
pub use accounts_traits::{AccountRepositoryTrait, AccountServiceTrait};
