//! Account domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{ConflictError, ValidationError};
use crate::utils::decimal_utils::round_money;
use crate::{Error, Result};

/// Purpose of a cash account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Funds used to settle trades
    #[default]
    Settlement,
    Deposit,
    /// Frozen funds; cannot be traded against
    Blocked,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Settlement => "SETTLEMENT",
            AccountType::Deposit => "DEPOSIT",
            AccountType::Blocked => "BLOCKED",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "SETTLEMENT" => Ok(AccountType::Settlement),
            "DEPOSIT" => Ok(AccountType::Deposit),
            "BLOCKED" => Ok(AccountType::Blocked),
            other => Err(Error::invalid(format!("Unknown account type: {}", other))),
        }
    }
}

/// Domain model representing a client's cash account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub client_id: i64,
    pub account_number: String,
    pub balance: Decimal,
    pub available_balance: Decimal,
    pub currency: String,
    pub account_type: AccountType,
    pub is_primary_settlement: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Account {
    /// Balances after taking `amount` out of the account.
    ///
    /// Fails with `InsufficientBalance` when the available balance does not
    /// cover the amount. Balance and available balance move together.
    pub fn debit(&self, amount: Decimal) -> Result<Balances> {
        let amount = round_money(amount);
        if amount < Decimal::ZERO {
            return Err(Error::invalid("Debit amount cannot be negative"));
        }
        if self.available_balance < amount || self.balance < amount {
            return Err(ConflictError::InsufficientBalance {
                required: amount,
                available: self.available_balance,
            }
            .into());
        }
        Ok(Balances {
            balance: self.balance - amount,
            available_balance: self.available_balance - amount,
        })
    }

    /// Balances after putting `amount` into the account.
    pub fn credit(&self, amount: Decimal) -> Result<Balances> {
        let amount = round_money(amount);
        if amount < Decimal::ZERO {
            return Err(Error::invalid("Credit amount cannot be negative"));
        }
        Ok(Balances {
            balance: self.balance + amount,
            available_balance: self.available_balance + amount,
        })
    }

    pub fn balances(&self) -> Balances {
        Balances {
            balance: self.balance,
            available_balance: self.available_balance,
        }
    }
}

/// Balance pair written back to an account row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balances {
    pub balance: Decimal,
    pub available_balance: Decimal,
}

/// Input model for opening a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub client_id: i64,
    /// Generated when absent
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub account_type: AccountType,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub is_primary_settlement: bool,
    #[serde(default)]
    pub opening_balance: Decimal,
}

impl NewAccount {
    pub fn validate(&self) -> Result<()> {
        if self.client_id <= 0 {
            return Err(Error::Validation(ValidationError::MissingField(
                "clientId".to_string(),
            )));
        }
        if self.opening_balance < Decimal::ZERO {
            return Err(Error::invalid("Opening balance cannot be negative"));
        }
        if let Some(currency) = &self.currency {
            if currency.trim().len() != 3 {
                return Err(Error::invalid(format!("Invalid currency code: {}", currency)));
            }
        }
        if self.is_primary_settlement && self.account_type != AccountType::Settlement {
            return Err(Error::invalid(
                "Only settlement accounts can be the primary settlement account",
            ));
        }
        Ok(())
    }
}

/// A deposit or a withdrawal against one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CashMovement {
    Deposit(Decimal),
    Withdrawal(Decimal),
}

impl CashMovement {
    pub fn amount(&self) -> Decimal {
        match self {
            CashMovement::Deposit(amount) | CashMovement::Withdrawal(amount) => *amount,
        }
    }

    pub fn transaction_type(&self) -> TransactionType {
        match self {
            CashMovement::Deposit(_) => TransactionType::Deposit,
            CashMovement::Withdrawal(_) => TransactionType::Withdrawal,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.amount() <= Decimal::ZERO {
            return Err(Error::invalid("Amount must be greater than zero"));
        }
        Ok(())
    }

    /// Balances after applying the movement to `account`.
    pub fn apply_to(&self, account: &Account) -> Result<Balances> {
        self.validate()?;
        if account.account_type == AccountType::Blocked {
            return Err(Error::invalid(format!(
                "Account {} is blocked",
                account.account_number
            )));
        }
        match self {
            CashMovement::Deposit(amount) => account.credit(*amount),
            CashMovement::Withdrawal(amount) => account.debit(*amount),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Withdrawal => "WITHDRAWAL",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "DEPOSIT" => Ok(TransactionType::Deposit),
            "WITHDRAWAL" => Ok(TransactionType::Withdrawal),
            other => Err(Error::invalid(format!("Unknown transaction type: {}", other))),
        }
    }
}

/// Ledger entry for one deposit or withdrawal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashTransaction {
    pub id: i64,
    pub transaction_number: String,
    pub account_id: i64,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub previous_balance: Decimal,
    pub new_balance: Decimal,
    pub description: Option<String>,
    pub executed_at: NaiveDateTime,
    pub created_by: String,
}

/// A cash movement to apply and record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCashTransaction {
    pub transaction_number: String,
    pub account_id: i64,
    pub movement: CashMovement,
    pub description: Option<String>,
    pub created_by: String,
}
