use rust_decimal::Decimal;

use super::orders_model::{ExecutionType, OrderCalculation, OrderRequest};
use crate::clients::ClientType;
use crate::constants::BSMV_RATE;
use crate::errors::{CalculatorError, Result};
use crate::stocks::Stock;
use crate::utils::decimal_utils::round_money;
use crate::Error;

/// Prices an order for a client of `client_type`.
///
/// Market orders use the stock's current price, limit orders the request
/// price. Amounts are rounded half-up to cents at every boundary.
pub fn calculate_order(
    client_type: ClientType,
    stock: &Stock,
    request: &OrderRequest,
) -> Result<OrderCalculation> {
    if request.quantity <= 0 {
        return Err(Error::invalid("Quantity must be greater than zero"));
    }
    let execution_type = request.execution_type.unwrap_or(ExecutionType::Market);
    let price = resolve_price(execution_type, stock, request.price)?;

    let quantity = Decimal::from(request.quantity);
    let commission_rate = client_type.commission_rate();

    let gross = price
        .checked_mul(quantity)
        .ok_or(CalculatorError::Overflow("total amount"))?;
    let commission = round_money(
        gross
            .checked_mul(commission_rate)
            .ok_or(CalculatorError::Overflow("commission"))?,
    );
    let bsmv = round_money(
        commission
            .checked_mul(BSMV_RATE)
            .ok_or(CalculatorError::Overflow("bsmv"))?,
    );
    let total_tax_and_commission = commission + bsmv;
    let total_amount = round_money(gross);
    let net_amount = total_amount - total_tax_and_commission;
    let total_debit = total_amount
        .checked_add(total_tax_and_commission)
        .ok_or(CalculatorError::Overflow("total debit"))?;

    Ok(OrderCalculation {
        stock_id: stock.id,
        stock_code: stock.code.clone(),
        execution_type,
        price,
        quantity: request.quantity,
        commission_rate,
        total_amount,
        commission,
        bsmv,
        total_tax_and_commission,
        net_amount,
        total_debit,
    })
}

fn resolve_price(
    execution_type: ExecutionType,
    stock: &Stock,
    limit_price: Option<Decimal>,
) -> Result<Decimal> {
    match execution_type {
        ExecutionType::Market => {
            if stock.current_price <= Decimal::ZERO {
                return Err(Error::invalid(format!(
                    "No market price available for {}",
                    stock.code
                )));
            }
            Ok(stock.current_price)
        }
        ExecutionType::Limit => match limit_price {
            Some(price) if price > Decimal::ZERO => Ok(price),
            _ => Err(Error::invalid("Limit orders require a price greater than zero")),
        },
    }
}
