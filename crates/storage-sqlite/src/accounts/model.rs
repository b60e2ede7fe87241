//! Database models for accounts and their cash ledger.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;

use backoffice_core::accounts::{Account, CashTransaction, NewAccount, NewCashTransaction};
use backoffice_core::constants::DEFAULT_CURRENCY;

use crate::errors::StorageError;
use crate::utils::{decimal_to_text, parse_decimal, parse_enum};

#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountDB {
    pub id: i64,
    pub client_id: i64,
    pub account_number: String,
    pub balance: String,
    pub available_balance: String,
    pub currency: String,
    pub account_type: String,
    pub is_primary_settlement: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::accounts)]
pub struct NewAccountDB {
    pub client_id: i64,
    pub account_number: String,
    pub balance: String,
    pub available_balance: String,
    pub currency: String,
    pub account_type: String,
    pub is_primary_settlement: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<AccountDB> for Account {
    type Error = StorageError;

    fn try_from(db: AccountDB) -> Result<Self, Self::Error> {
        Ok(Account {
            id: db.id,
            client_id: db.client_id,
            account_number: db.account_number,
            balance: parse_decimal(&db.balance, "accounts.balance")?,
            available_balance: parse_decimal(&db.available_balance, "accounts.available_balance")?,
            currency: db.currency,
            account_type: parse_enum(&db.account_type, "accounts.account_type")?,
            is_primary_settlement: db.is_primary_settlement,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl NewAccountDB {
    /// Row for a new account; the service has already filled in the
    /// account number and currency.
    pub fn from_domain(domain: NewAccount, now: NaiveDateTime) -> Self {
        let opening = decimal_to_text(domain.opening_balance);
        Self {
            client_id: domain.client_id,
            account_number: domain.account_number.unwrap_or_default(),
            balance: opening.clone(),
            available_balance: opening,
            currency: domain.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            account_type: domain.account_type.as_str().to_string(),
            is_primary_settlement: domain.is_primary_settlement,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: i64,
    pub transaction_number: String,
    pub account_id: i64,
    pub transaction_type: String,
    pub amount: String,
    pub previous_balance: String,
    pub new_balance: String,
    pub description: Option<String>,
    pub executed_at: NaiveDateTime,
    pub created_by: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
pub struct NewTransactionDB {
    pub transaction_number: String,
    pub account_id: i64,
    pub transaction_type: String,
    pub amount: String,
    pub previous_balance: String,
    pub new_balance: String,
    pub description: Option<String>,
    pub executed_at: NaiveDateTime,
    pub created_by: String,
}

impl NewTransactionDB {
    pub fn from_domain(
        domain: NewCashTransaction,
        previous_balance: Decimal,
        new_balance: Decimal,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            transaction_number: domain.transaction_number,
            account_id: domain.account_id,
            transaction_type: domain.movement.transaction_type().as_str().to_string(),
            amount: decimal_to_text(domain.movement.amount()),
            previous_balance: decimal_to_text(previous_balance),
            new_balance: decimal_to_text(new_balance),
            description: domain.description,
            executed_at: now,
            created_by: domain.created_by,
        }
    }
}

impl TryFrom<TransactionDB> for CashTransaction {
    type Error = StorageError;

    fn try_from(db: TransactionDB) -> Result<Self, Self::Error> {
        Ok(CashTransaction {
            id: db.id,
            transaction_number: db.transaction_number,
            account_id: db.account_id,
            transaction_type: parse_enum(&db.transaction_type, "transactions.transaction_type")?,
            amount: parse_decimal(&db.amount, "transactions.amount")?,
            previous_balance: parse_decimal(&db.previous_balance, "transactions.previous_balance")?,
            new_balance: parse_decimal(&db.new_balance, "transactions.new_balance")?,
            description: db.description,
            executed_at: db.executed_at,
            created_by: db.created_by,
        })
    }
}
