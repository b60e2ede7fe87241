use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::accounts::{Account, AccountType};
use crate::errors::{ConflictError, Error};
use crate::orders::{
    plan_cancellation, plan_execution, ExecutionType, HoldingChange, OrderCalculation,
    OrderStatus, OrderType, SettlementStatus, TradeOrder,
};
use crate::portfolio::PortfolioItem;

fn account(balance: Decimal) -> Account {
    Account {
        id: 1,
        client_id: 1,
        account_number: "ACC0000000001".to_string(),
        balance,
        available_balance: balance,
        currency: "TRY".to_string(),
        account_type: AccountType::Settlement,
        is_primary_settlement: true,
        created_at: NaiveDateTime::default(),
        updated_at: NaiveDateTime::default(),
    }
}

fn item(quantity: i64, avg_price: Decimal) -> PortfolioItem {
    PortfolioItem {
        id: 7,
        portfolio_id: 1,
        stock_id: 1,
        account_id: 1,
        quantity,
        avg_price,
        created_at: NaiveDateTime::default(),
        updated_at: NaiveDateTime::default(),
    }
}

/// 100 x 10.00 for an individual client.
fn calculation(quantity: i64, price: Decimal) -> OrderCalculation {
    OrderCalculation {
        stock_id: 1,
        stock_code: "THYAO".to_string(),
        execution_type: ExecutionType::Market,
        price,
        quantity,
        commission_rate: dec!(0.002),
        total_amount: dec!(1000.00),
        commission: dec!(2.00),
        bsmv: dec!(0.10),
        total_tax_and_commission: dec!(2.10),
        net_amount: dec!(997.90),
        total_debit: dec!(1002.10),
    }
}

fn order(order_type: OrderType, settlement_status: SettlementStatus) -> TradeOrder {
    let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
    TradeOrder {
        id: 42,
        order_number: "ORD20240304ABC123".to_string(),
        client_id: 1,
        account_id: 1,
        stock_id: 1,
        order_type,
        execution_type: ExecutionType::Market,
        price: dec!(10),
        quantity: 100,
        total_amount: dec!(1000.00),
        commission: dec!(2.00),
        bsmv: dec!(0.10),
        net_amount: dec!(997.90),
        status: OrderStatus::Executed,
        settlement_status,
        trade_date: date,
        settlement_date: date,
        submitted_at: NaiveDateTime::default(),
        executed_at: Some(NaiveDateTime::default()),
        settled_at: None,
        portfolio_updated: false,
        created_by: "dealer".to_string(),
        updated_by: None,
        avg_price_before: None,
        avg_price_after: None,
    }
}

/// Order that recorded the holding's average before and after it.
fn order_with_basis(
    order_type: OrderType,
    before: Option<Decimal>,
    after: Option<Decimal>,
) -> TradeOrder {
    TradeOrder {
        avg_price_before: before,
        avg_price_after: after,
        ..order(order_type, SettlementStatus::Pending)
    }
}

#[test]
fn test_buy_debits_total_and_creates_holding() {
    let plan = plan_execution(
        OrderType::Buy,
        &calculation(100, dec!(10)),
        &account(dec!(5000)),
        None,
    )
    .unwrap();

    assert_eq!(plan.balances.balance, dec!(3997.90));
    assert_eq!(plan.balances.available_balance, dec!(3997.90));
    assert_eq!(
        plan.holding,
        HoldingChange::Create {
            quantity: 100,
            avg_price: dec!(10)
        }
    );
}

#[test]
fn test_buy_into_existing_holding_averages_price() {
    // (100 * 10 + 50 * 13) / 150 = 11.00
    let plan = plan_execution(
        OrderType::Buy,
        &calculation(50, dec!(13)),
        &account(dec!(5000)),
        Some(&item(100, dec!(10))),
    )
    .unwrap();

    assert_eq!(
        plan.holding,
        HoldingChange::Update {
            item_id: 7,
            quantity: 150,
            avg_price: dec!(11.0000)
        }
    );
}

#[test]
fn test_average_price_rounds_to_four_places() {
    // (1 * 10 + 2 * 11) / 3 = 10.6666...
    let plan = plan_execution(
        OrderType::Buy,
        &calculation(2, dec!(11)),
        &account(dec!(5000)),
        Some(&item(1, dec!(10))),
    )
    .unwrap();
    match plan.holding {
        HoldingChange::Update { avg_price, .. } => assert_eq!(avg_price, dec!(10.6667)),
        other => panic!("unexpected change {:?}", other),
    }
}

#[test]
fn test_buy_without_funds_is_rejected() {
    let err = plan_execution(
        OrderType::Buy,
        &calculation(100, dec!(10)),
        &account(dec!(1002.09)),
        None,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::StateConflict(ConflictError::InsufficientBalance { .. })
    ));
}

#[test]
fn test_sell_credits_net_and_keeps_average() {
    let plan = plan_execution(
        OrderType::Sell,
        &calculation(40, dec!(12)),
        &account(dec!(100)),
        Some(&item(100, dec!(10))),
    )
    .unwrap();

    assert_eq!(plan.balances.balance, dec!(1097.90));
    assert_eq!(
        plan.holding,
        HoldingChange::Update {
            item_id: 7,
            quantity: 60,
            avg_price: dec!(10)
        }
    );
}

#[test]
fn test_sell_everything_deletes_holding() {
    let plan = plan_execution(
        OrderType::Sell,
        &calculation(100, dec!(12)),
        &account(dec!(0)),
        Some(&item(100, dec!(10))),
    )
    .unwrap();
    assert_eq!(plan.holding, HoldingChange::Delete { item_id: 7 });
    assert_eq!(plan.holding.quantity_after(), 0);
}

#[test]
fn test_sell_more_than_held_is_rejected() {
    let err = plan_execution(
        OrderType::Sell,
        &calculation(101, dec!(10)),
        &account(dec!(0)),
        Some(&item(100, dec!(10))),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::StateConflict(ConflictError::InsufficientStock {
            requested: 101,
            held: 100
        })
    ));

    let err = plan_execution(OrderType::Sell, &calculation(1, dec!(10)), &account(dec!(0)), None)
        .unwrap_err();
    assert_eq!(err.code(), "INSUFFICIENT_STOCK");
}

#[test]
fn test_cancel_buy_refunds_and_removes_quantity() {
    let plan = plan_cancellation(
        &order(OrderType::Buy, SettlementStatus::Pending),
        &account(dec!(3997.90)),
        Some(&item(100, dec!(10))),
    )
    .unwrap();
    assert_eq!(plan.balances.balance, dec!(5000.00));
    assert_eq!(plan.holding, HoldingChange::Delete { item_id: 7 });
}

#[test]
fn test_cancel_sell_restores_quantity_and_debits_net() {
    let plan = plan_cancellation(
        &order(OrderType::Sell, SettlementStatus::Pending),
        &account(dec!(1000)),
        Some(&item(20, dec!(9.5))),
    )
    .unwrap();
    assert_eq!(plan.balances.balance, dec!(2.10));
    assert_eq!(
        plan.holding,
        HoldingChange::Update {
            item_id: 7,
            quantity: 120,
            avg_price: dec!(9.5)
        }
    );
}

#[test]
fn test_cancel_sell_without_recorded_average_recreates_at_order_price() {
    let plan = plan_cancellation(
        &order(OrderType::Sell, SettlementStatus::Pending),
        &account(dec!(1000)),
        None,
    )
    .unwrap();
    assert_eq!(
        plan.holding,
        HoldingChange::Create {
            quantity: 100,
            avg_price: dec!(10)
        }
    );
}

#[test]
fn test_cancel_sell_when_proceeds_are_spent() {
    let err = plan_cancellation(
        &order(OrderType::Sell, SettlementStatus::Pending),
        &account(dec!(500)),
        None,
    )
    .unwrap_err();
    assert_eq!(err.code(), "INSUFFICIENT_BALANCE");
}

#[test]
fn test_cancel_after_settlement_started_is_illegal() {
    for status in [
        SettlementStatus::T1,
        SettlementStatus::T2,
        SettlementStatus::Completed,
        SettlementStatus::Cancelled,
    ] {
        let err = plan_cancellation(
            &order(OrderType::Buy, status),
            &account(dec!(0)),
            Some(&item(100, dec!(10))),
        )
        .unwrap_err();
        assert_eq!(err.code(), "ILLEGAL_STATE_TRANSITION", "from {}", status);
    }
}

#[test]
fn test_cancel_buy_restores_previous_average() {
    // 100 @ 20 held, then 100 @ 10 bought: 200 @ 15.
    let plan = plan_cancellation(
        &order_with_basis(OrderType::Buy, Some(dec!(20)), Some(dec!(15))),
        &account(dec!(0)),
        Some(&item(200, dec!(15))),
    )
    .unwrap();
    assert_eq!(
        plan.holding,
        HoldingChange::Update {
            item_id: 7,
            quantity: 100,
            avg_price: dec!(20)
        }
    );
}

#[test]
fn test_cancel_buy_restores_exact_average_despite_rounding() {
    // 1 @ 10 plus 2 @ 11 stored as 10.6667; backing out would give 10.0001.
    let cancelled = TradeOrder {
        price: dec!(11),
        quantity: 2,
        ..order_with_basis(OrderType::Buy, Some(dec!(10)), Some(dec!(10.6667)))
    };
    let plan =
        plan_cancellation(&cancelled, &account(dec!(0)), Some(&item(3, dec!(10.6667)))).unwrap();
    assert_eq!(
        plan.holding,
        HoldingChange::Update {
            item_id: 7,
            quantity: 1,
            avg_price: dec!(10)
        }
    );
}

#[test]
fn test_cancel_buy_backs_out_cost_after_later_buy() {
    // 100 @ 20, cancelled 100 @ 10 (avg 15), later 100 @ 30: 300 @ 20.
    // Remaining cost (6000 - 1000) / 200 = 25.
    let plan = plan_cancellation(
        &order_with_basis(OrderType::Buy, Some(dec!(20)), Some(dec!(15))),
        &account(dec!(0)),
        Some(&item(300, dec!(20))),
    )
    .unwrap();
    assert_eq!(
        plan.holding,
        HoldingChange::Update {
            item_id: 7,
            quantity: 200,
            avg_price: dec!(25)
        }
    );
}

#[test]
fn test_cancel_buy_without_recorded_average_backs_out_cost() {
    let plan = plan_cancellation(
        &order(OrderType::Buy, SettlementStatus::Pending),
        &account(dec!(0)),
        Some(&item(200, dec!(15))),
    )
    .unwrap();
    assert_eq!(
        plan.holding,
        HoldingChange::Update {
            item_id: 7,
            quantity: 100,
            avg_price: dec!(20)
        }
    );
}

#[test]
fn test_cancel_sell_recreates_deleted_holding_at_original_cost() {
    // Sold all 100 @ 10 out of a position bought at 8.
    let plan = plan_cancellation(
        &order_with_basis(OrderType::Sell, Some(dec!(8)), None),
        &account(dec!(1000)),
        None,
    )
    .unwrap();
    assert_eq!(
        plan.holding,
        HoldingChange::Create {
            quantity: 100,
            avg_price: dec!(8)
        }
    );
}

#[test]
fn test_cancel_sell_blends_with_position_bought_since() {
    // 100 @ 8 sold, then 100 @ 12 bought; restoring gives 200 @ 10.
    let plan = plan_cancellation(
        &order_with_basis(OrderType::Sell, Some(dec!(8)), None),
        &account(dec!(1000)),
        Some(&item(100, dec!(12))),
    )
    .unwrap();
    assert_eq!(
        plan.holding,
        HoldingChange::Update {
            item_id: 7,
            quantity: 200,
            avg_price: dec!(10)
        }
    );
}
