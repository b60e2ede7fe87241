//! Synchronous order checks.
//!
//! Structural checks run before any lookup. The state checks (stock
//! activity, holdings, funds) take already-loaded values so that the same
//! rules can run both at preview time and inside the execution transaction.

use chrono::NaiveTime;
use rust_decimal::Decimal;

use super::orders_model::{ExecutionType, OrderRequest};
use crate::accounts::{Account, AccountType};
use crate::constants::{MARKET_CLOSE_HOUR, MARKET_OPEN_HOUR};
use crate::errors::{ConflictError, ValidationError};
use crate::stocks::Stock;
use crate::utils::time_utils::Clock;
use crate::{Error, Result};

pub fn validate_request(request: &OrderRequest) -> Result<()> {
    if request.client_id <= 0 {
        return Err(missing("clientId"));
    }
    if request.account_id <= 0 {
        return Err(missing("accountId"));
    }
    if request.stock_id <= 0 {
        return Err(missing("stockId"));
    }
    if request.quantity <= 0 {
        return Err(Error::invalid("Quantity must be greater than zero"));
    }
    match (request.execution_type, request.price) {
        (None, _) => Err(missing("executionType")),
        (Some(ExecutionType::Limit), Some(price)) if price > Decimal::ZERO => Ok(()),
        (Some(ExecutionType::Limit), _) => Err(Error::invalid(
            "Limit orders require a price greater than zero",
        )),
        (Some(ExecutionType::Market), None) => Ok(()),
        (Some(ExecutionType::Market), Some(_)) => {
            Err(Error::invalid("Market orders must not carry a price"))
        }
    }
}

fn missing(field: &str) -> Error {
    Error::Validation(ValidationError::MissingField(field.to_string()))
}

fn market_window() -> (NaiveTime, NaiveTime) {
    (
        NaiveTime::from_hms_opt(MARKET_OPEN_HOUR, 0, 0).unwrap_or(NaiveTime::MIN),
        NaiveTime::from_hms_opt(MARKET_CLOSE_HOUR, 0, 0).unwrap_or(NaiveTime::MIN),
    )
}

/// Local time must fall within `[open, close)`.
pub fn check_market_hours(clock: &dyn Clock) -> Result<()> {
    let (open, close) = market_window();
    let now = clock.local_time();
    if now >= open && now < close {
        Ok(())
    } else {
        Err(ConflictError::MarketClosed {
            open: open.format("%H:%M").to_string(),
            close: close.format("%H:%M").to_string(),
        }
        .into())
    }
}

pub fn check_stock_active(stock: &Stock) -> Result<()> {
    if stock.is_active {
        Ok(())
    } else {
        Err(ConflictError::InactiveStock(stock.code.clone()).into())
    }
}

/// The account must belong to the client and be usable for trading.
pub fn check_account(account: &Account, client_id: i64) -> Result<()> {
    if account.client_id != client_id {
        return Err(Error::invalid(format!(
            "Account {} does not belong to client {}",
            account.id, client_id
        )));
    }
    if account.account_type == AccountType::Blocked {
        return Err(Error::invalid(format!(
            "Account {} is blocked",
            account.account_number
        )));
    }
    Ok(())
}

pub fn check_holdings(requested: i64, held: i64) -> Result<()> {
    if held >= requested {
        Ok(())
    } else {
        Err(ConflictError::InsufficientStock { requested, held }.into())
    }
}

pub fn check_funds(required: Decimal, available: Decimal) -> Result<()> {
    if available >= required {
        Ok(())
    } else {
        Err(ConflictError::InsufficientBalance {
            required,
            available,
        }
        .into())
    }
}
