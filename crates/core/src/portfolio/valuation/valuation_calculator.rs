use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::valuation_model::{NewPortfolioDailyValuation, PositionValuation, PriceSource};
use crate::errors::{CalculatorError, Result};
use crate::portfolio::PortfolioItem;
use crate::stocks::Stock;
use crate::utils::decimal_utils::{percent_change, percentage_of, round_money};

/// Prices each item at the official close for the date.
///
/// Items whose stock has no close fall back to the stock's current price
/// and are flagged with [`PriceSource::CurrentPrice`].
pub fn value_positions(
    items: &[PortfolioItem],
    stocks: &HashMap<i64, Stock>,
    closes: &HashMap<i64, Decimal>,
) -> Result<Vec<PositionValuation>> {
    let mut positions = Vec::with_capacity(items.len());

    for item in items {
        let stock = stocks.get(&item.stock_id).ok_or_else(|| {
            CalculatorError::Calculation(format!(
                "stock {} of portfolio item {} is not loaded",
                item.stock_id, item.id
            ))
        })?;

        let (close_price, price_source) = match closes.get(&item.stock_id) {
            Some(close) => (*close, PriceSource::OfficialClose),
            None => {
                warn!(
                    "No closing price for {}; valuing at current price {}",
                    stock.code, stock.current_price
                );
                (stock.current_price, PriceSource::CurrentPrice)
            }
        };

        let quantity = Decimal::from(item.quantity);
        let market_value = close_price
            .checked_mul(quantity)
            .ok_or(CalculatorError::Overflow("position market value"))?;
        let cost = item
            .avg_price
            .checked_mul(quantity)
            .ok_or(CalculatorError::Overflow("position cost"))?;

        positions.push(PositionValuation {
            stock_id: item.stock_id,
            stock_code: stock.code.clone(),
            account_id: item.account_id,
            quantity: item.quantity,
            avg_price: item.avg_price,
            cost: round_money(cost),
            close_price,
            market_value: round_money(market_value),
            unrealized_profit_loss: round_money(market_value - cost),
            change_percentage: percent_change(item.avg_price, close_price),
            price_source,
        });
    }

    positions.sort_by(|a, b| a.stock_code.cmp(&b.stock_code));
    Ok(positions)
}

/// Builds the locked snapshot for one client from its priced positions.
pub fn compute_snapshot(
    client_id: i64,
    date: NaiveDate,
    positions: &[PositionValuation],
    previous_day_value: Decimal,
    created_by: &str,
) -> NewPortfolioDailyValuation {
    let total: Decimal = positions.iter().map(|p| p.market_value).sum();
    let initial_investment: Decimal = positions.iter().map(|p| p.cost).sum();
    let unrealized = total - initial_investment;

    NewPortfolioDailyValuation {
        client_id,
        valuation_date: date,
        total_portfolio_value: total,
        unrealized_profit_loss: unrealized,
        daily_change_percentage: percent_change(previous_day_value, total),
        total_return_percentage: percentage_of(unrealized, initial_investment),
        initial_investment,
        previous_day_value,
        locked: true,
        created_by: created_by.to_string(),
    }
}
