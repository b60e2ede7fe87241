//! Account repository and service traits.
//!
//! These traits define the contract for account operations without any
//! database-specific types, allowing for different storage implementations.

use rust_decimal::Decimal;

use super::accounts_model::{Account, CashTransaction, NewAccount, NewCashTransaction};
use crate::errors::Result;

/// Trait defining the contract for Account repository operations.
pub trait AccountRepositoryTrait: Send + Sync {
    /// Creates a new account. `account_number` and `currency` are set.
    fn create(&self, new_account: NewAccount) -> Result<Account>;

    fn get_by_id(&self, account_id: i64) -> Result<Account>;

    fn list_by_client(&self, client_id: i64) -> Result<Vec<Account>>;

    /// Applies a deposit or withdrawal and records it in the cash ledger,
    /// both in one write transaction.
    ///
    /// The account is re-read inside the transaction, so the balance check
    /// cannot race with another writer.
    fn apply_cash_movement(&self, transaction: NewCashTransaction) -> Result<CashTransaction>;

    /// Ledger entries of one account, newest first.
    fn list_transactions(&self, account_id: i64) -> Result<Vec<CashTransaction>>;
}

/// Trait defining the contract for Account service operations.
pub trait AccountServiceTrait: Send + Sync {
    fn create_account(&self, new_account: NewAccount) -> Result<Account>;

    fn get_account(&self, account_id: i64) -> Result<Account>;

    fn list_client_accounts(&self, client_id: i64) -> Result<Vec<Account>>;

    fn deposit(
        &self,
        account_id: i64,
        amount: Decimal,
        description: Option<String>,
        acting_user: &str,
    ) -> Result<CashTransaction>;

    fn withdraw(
        &self,
        account_id: i64,
        amount: Decimal,
        description: Option<String>,
        acting_user: &str,
    ) -> Result<CashTransaction>;

    fn list_account_transactions(&self, account_id: i64) -> Result<Vec<CashTransaction>>;

    /// Sum of balances across the client's accounts.
    fn cash_balance(&self, client_id: i64) -> Result<Decimal>;
}
