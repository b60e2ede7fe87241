//! Cash and holding effects of executing or cancelling an order.
//!
//! The planners are pure: the storage layer loads the account and holding
//! inside its write transaction, asks for a plan, and writes the plan back.
//! A planner error aborts the transaction.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::orders_model::{OrderCalculation, OrderType, TradeOrder};
use super::order_validator::{check_funds, check_holdings};
use crate::accounts::{Account, Balances};
use crate::constants::PRICE_SCALE;
use crate::errors::{CalculatorError, ConflictError, Result};
use crate::portfolio::PortfolioItem;

/// What happens to the (portfolio, stock, account) holding row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "action")]
pub enum HoldingChange {
    Create { quantity: i64, avg_price: Decimal },
    Update { item_id: i64, quantity: i64, avg_price: Decimal },
    Delete { item_id: i64 },
}

impl HoldingChange {
    pub fn quantity_after(&self) -> i64 {
        match self {
            HoldingChange::Create { quantity, .. } | HoldingChange::Update { quantity, .. } => {
                *quantity
            }
            HoldingChange::Delete { .. } => 0,
        }
    }

    pub fn avg_price_after(&self) -> Option<Decimal> {
        match self {
            HoldingChange::Create { avg_price, .. } | HoldingChange::Update { avg_price, .. } => {
                Some(*avg_price)
            }
            HoldingChange::Delete { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerPlan {
    pub balances: Balances,
    pub holding: HoldingChange,
}

/// Plans the effects of committing a priced order.
///
/// Buys debit total amount plus tax and add to the holding at a
/// quantity-weighted average price. Sells credit the net amount and reduce
/// the holding, deleting it at zero; the average price is unchanged.
pub fn plan_execution(
    order_type: OrderType,
    calculation: &OrderCalculation,
    account: &Account,
    holding: Option<&PortfolioItem>,
) -> Result<LedgerPlan> {
    let quantity = calculation.quantity;
    match order_type {
        OrderType::Buy => {
            check_funds(calculation.total_debit, account.available_balance)?;
            let balances = account.debit(calculation.total_debit)?;
            Ok(LedgerPlan {
                balances,
                holding: add_to_holding(holding, quantity, calculation.price)?,
            })
        }
        OrderType::Sell => {
            let held = holding.map_or(0, |h| h.quantity);
            check_holdings(quantity, held)?;
            let balances = account.credit(calculation.net_amount)?;
            Ok(LedgerPlan {
                balances,
                holding: remove_from_holding(holding, quantity)?,
            })
        }
    }
}

/// Plans the reversal of an order that has not started settling.
///
/// A buy refunds total amount plus tax and takes the quantity back out of
/// the holding at the average price it had before the buy. A sell restores
/// the quantity at its pre-sale average and debits the net amount, failing
/// when those funds are no longer available.
pub fn plan_cancellation(
    order: &TradeOrder,
    account: &Account,
    holding: Option<&PortfolioItem>,
) -> Result<LedgerPlan> {
    if !order.is_cancellable() {
        return Err(ConflictError::IllegalTransition {
            order_id: order.id,
            from: order.settlement_status.to_string(),
            to: "CANCELLED".to_string(),
        }
        .into());
    }

    match order.order_type {
        OrderType::Buy => {
            let held = holding.map_or(0, |h| h.quantity);
            check_holdings(order.quantity, held)?;
            Ok(LedgerPlan {
                balances: account.credit(order.total_debit())?,
                holding: withdraw_bought(holding, order)?,
            })
        }
        OrderType::Sell => {
            check_funds(order.net_amount, account.available_balance)?;
            Ok(LedgerPlan {
                balances: account.debit(order.net_amount)?,
                holding: restore_sold(holding, order)?,
            })
        }
    }
}

fn add_to_holding(
    holding: Option<&PortfolioItem>,
    quantity: i64,
    price: Decimal,
) -> Result<HoldingChange> {
    match holding {
        None => Ok(HoldingChange::Create {
            quantity,
            avg_price: price,
        }),
        Some(item) => {
            let new_quantity = item
                .quantity
                .checked_add(quantity)
                .ok_or(CalculatorError::Overflow("holding quantity"))?;
            let existing_cost = item
                .avg_price
                .checked_mul(Decimal::from(item.quantity))
                .ok_or(CalculatorError::Overflow("holding cost"))?;
            let added_cost = price
                .checked_mul(Decimal::from(quantity))
                .ok_or(CalculatorError::Overflow("holding cost"))?;
            let avg_price = (existing_cost + added_cost)
                .checked_div(Decimal::from(new_quantity))
                .ok_or(CalculatorError::Overflow("average price"))?
                .round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
            Ok(HoldingChange::Update {
                item_id: item.id,
                quantity: new_quantity,
                avg_price,
            })
        }
    }
}

fn remove_from_holding(holding: Option<&PortfolioItem>, quantity: i64) -> Result<HoldingChange> {
    let item = holding.ok_or(ConflictError::InsufficientStock {
        requested: quantity,
        held: 0,
    })?;
    check_holdings(quantity, item.quantity)?;
    let remaining = item.quantity - quantity;
    if remaining == 0 {
        Ok(HoldingChange::Delete { item_id: item.id })
    } else {
        Ok(HoldingChange::Update {
            item_id: item.id,
            quantity: remaining,
            avg_price: item.avg_price,
        })
    }
}

/// Takes a cancelled buy back out of the holding.
///
/// When the row still carries the average the buy produced, the average from
/// before the buy is restored as is. Otherwise later trades moved it, and the
/// buy's cost is backed out of the remaining position.
fn withdraw_bought(holding: Option<&PortfolioItem>, order: &TradeOrder) -> Result<HoldingChange> {
    let item = holding.ok_or(ConflictError::InsufficientStock {
        requested: order.quantity,
        held: 0,
    })?;
    check_holdings(order.quantity, item.quantity)?;
    let remaining = item.quantity - order.quantity;
    if remaining == 0 {
        return Ok(HoldingChange::Delete { item_id: item.id });
    }

    let avg_price = match order.avg_price_before {
        Some(before) if order.avg_price_after == Some(item.avg_price) => before,
        _ => {
            let held_cost = item
                .avg_price
                .checked_mul(Decimal::from(item.quantity))
                .ok_or(CalculatorError::Overflow("holding cost"))?;
            let order_cost = order
                .price
                .checked_mul(Decimal::from(order.quantity))
                .ok_or(CalculatorError::Overflow("holding cost"))?;
            let remaining_cost = held_cost - order_cost;
            // Sells in between can leave less cost than the buy added.
            if remaining_cost <= Decimal::ZERO {
                item.avg_price
            } else {
                (remaining_cost / Decimal::from(remaining))
                    .round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
            }
        }
    };

    Ok(HoldingChange::Update {
        item_id: item.id,
        quantity: remaining,
        avg_price,
    })
}

/// Puts a cancelled sell's quantity back at the average it was sold from.
///
/// A row deleted by the sell is recreated at that average. Orders stored
/// without one fall back to the order price for a recreated row and keep
/// the row's average otherwise.
fn restore_sold(holding: Option<&PortfolioItem>, order: &TradeOrder) -> Result<HoldingChange> {
    match holding {
        Some(item) => {
            let quantity = item
                .quantity
                .checked_add(order.quantity)
                .ok_or(CalculatorError::Overflow("holding quantity"))?;
            let avg_price = match order.avg_price_before {
                Some(before) if before != item.avg_price => {
                    let cost = item
                        .avg_price
                        .checked_mul(Decimal::from(item.quantity))
                        .and_then(|c| {
                            before
                                .checked_mul(Decimal::from(order.quantity))
                                .and_then(|r| c.checked_add(r))
                        })
                        .ok_or(CalculatorError::Overflow("holding cost"))?;
                    (cost / Decimal::from(quantity))
                        .round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
                }
                _ => item.avg_price,
            };
            Ok(HoldingChange::Update {
                item_id: item.id,
                quantity,
                avg_price,
            })
        }
        None => Ok(HoldingChange::Create {
            quantity: order.quantity,
            avg_price: order.avg_price_before.unwrap_or(order.price),
        }),
    }
}
