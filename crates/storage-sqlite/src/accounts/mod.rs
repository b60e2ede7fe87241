//! SQLite storage implementation for cash accounts and their ledger.

mod model;
mod repository;

pub use model::{AccountDB, NewAccountDB, NewTransactionDB, TransactionDB};
pub use repository::{load_account, write_balances, AccountRepository};
