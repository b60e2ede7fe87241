use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use super::model::{AccountDB, NewAccountDB, NewTransactionDB, TransactionDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{is_unique_violation, IntoCore, StorageError};
use crate::schema::{accounts, transactions};
use crate::utils::decimal_to_text;
use backoffice_core::accounts::{
    Account, AccountRepositoryTrait, Balances, CashTransaction, NewAccount, NewCashTransaction,
};
use backoffice_core::errors::{Error, Result};

/// Repository for client cash accounts.
pub struct AccountRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl AccountRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

/// Reads one account on `conn`. Inside a write job this is the locked,
/// current row.
pub fn load_account(conn: &mut SqliteConnection, account_id: i64) -> Result<Account> {
    let row = accounts::table
        .find(account_id)
        .select(AccountDB::as_select())
        .first::<AccountDB>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| Error::not_found("account", account_id))?;
    Ok(Account::try_from(row)?)
}

/// Writes both balances of an account and returns the updated row.
pub fn write_balances(
    conn: &mut SqliteConnection,
    account_id: i64,
    balances: Balances,
) -> Result<Account> {
    let row = diesel::update(accounts::table.find(account_id))
        .set((
            accounts::balance.eq(decimal_to_text(balances.balance)),
            accounts::available_balance.eq(decimal_to_text(balances.available_balance)),
            accounts::updated_at.eq(chrono::Utc::now().naive_utc()),
        ))
        .returning(AccountDB::as_returning())
        .get_result::<AccountDB>(conn)
        .into_core()?;
    Ok(Account::try_from(row)?)
}

impl AccountRepositoryTrait for AccountRepository {
    fn create(&self, new_account: NewAccount) -> Result<Account> {
        self.writer.exec(move |conn| {
            let row = NewAccountDB::from_domain(new_account, chrono::Utc::now().naive_utc());
            let number = row.account_number.clone();
            let inserted = diesel::insert_into(accounts::table)
                .values(&row)
                .returning(AccountDB::as_returning())
                .get_result::<AccountDB>(conn)
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        Error::invalid(format!("Account number already in use: {}", number))
                    } else {
                        StorageError::from(e).into()
                    }
                })?;
            Ok(Account::try_from(inserted)?)
        })
    }

    fn get_by_id(&self, account_id: i64) -> Result<Account> {
        let mut conn = get_connection(&self.pool)?;
        load_account(&mut conn, account_id)
    }

    fn list_by_client(&self, client_id: i64) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = accounts::table
            .filter(accounts::client_id.eq(client_id))
            .select(AccountDB::as_select())
            .order(accounts::id.asc())
            .load::<AccountDB>(&mut conn)
            .into_core()?;
        rows.into_iter()
            .map(|r| Account::try_from(r).map_err(Error::from))
            .collect()
    }

    fn apply_cash_movement(&self, transaction: NewCashTransaction) -> Result<CashTransaction> {
        self.writer.exec(move |conn| {
            let account = load_account(conn, transaction.account_id)?;
            let balances = transaction.movement.apply_to(&account)?;
            let updated = write_balances(conn, account.id, balances)?;

            let row = NewTransactionDB::from_domain(
                transaction,
                account.balance,
                updated.balance,
                chrono::Utc::now().naive_utc(),
            );
            let number = row.transaction_number.clone();
            let inserted = diesel::insert_into(transactions::table)
                .values(&row)
                .returning(TransactionDB::as_returning())
                .get_result::<TransactionDB>(conn)
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        Error::invalid(format!("Transaction number already in use: {}", number))
                    } else {
                        StorageError::from(e).into()
                    }
                })?;
            Ok(CashTransaction::try_from(inserted)?)
        })
    }

    fn list_transactions(&self, account_id: i64) -> Result<Vec<CashTransaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = transactions::table
            .filter(transactions::account_id.eq(account_id))
            .select(TransactionDB::as_select())
            .order((transactions::executed_at.desc(), transactions::id.desc()))
            .load::<TransactionDB>(&mut conn)
            .into_core()?;
        rows.into_iter()
            .map(|r| CashTransaction::try_from(r).map_err(Error::from))
            .collect()
    }
}
