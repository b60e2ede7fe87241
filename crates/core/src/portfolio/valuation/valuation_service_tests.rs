#[cfg(test)]
mod tests {
    use crate::clients::ClientType;
    use crate::errors::{ConflictError, Error, ErrorKind};
    use crate::portfolio::valuation::{PriceSource, ValuationService, ValuationServiceTrait};
    use crate::test_mocks::InMemoryStore;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    struct Fixture {
        store: Arc<InMemoryStore>,
        service: ValuationService,
        client_id: i64,
        thyao: i64,
        asels: i64,
    }

    fn setup() -> Fixture {
        let store = InMemoryStore::new();
        let client = store.add_client("Ayse Yilmaz", ClientType::Individual);
        let account = store.add_account(client.id, dec!(10000));
        let thyao = store.add_stock("THYAO", dec!(250)).id;
        let asels = store.add_stock("ASELS", dec!(60)).id;
        store.set_holding(client.id, thyao, account.id, 100, dec!(250));
        store.set_holding(client.id, asels, account.id, 50, dec!(55));

        let service = ValuationService::new(store.clone(), store.clone(), store.clone(), store.clone());
        Fixture {
            store,
            service,
            client_id: client.id,
            thyao,
            asels,
        }
    }

    #[test]
    fn test_run_without_official_close_fails() {
        let f = setup();
        let err = f.service.run_end_of_day_valuation(day(4), "system").unwrap_err();
        assert!(matches!(
            err,
            Error::StateConflict(ConflictError::ClosingPricesMissing(d)) if d == day(4)
        ));
        assert!(!f.service.is_valuation_completed(day(4)).unwrap());
    }

    #[test]
    fn test_run_stores_locked_row_per_active_client() {
        let f = setup();
        let empty = f.store.add_client("Mehmet Kaya", ClientType::Individual);
        f.store.add_close(f.thyao, day(4), dec!(275));
        f.store.add_close(f.asels, day(4), dec!(60));

        let summary = f.service.run_end_of_day_valuation(day(4), "system").unwrap();
        assert_eq!(summary.valued, 2);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.total_value, dec!(30500));

        let row = f.service.get_client_valuation(f.client_id, day(4)).unwrap();
        assert!(row.valuation.locked);
        assert_eq!(row.valuation.total_portfolio_value, dec!(30500));
        assert_eq!(row.valuation.initial_investment, dec!(27750));
        assert_eq!(row.valuation.unrealized_profit_loss, dec!(2750));
        assert_eq!(row.positions.len(), 2);
        assert_eq!(row.positions[0].stock_code, "ASELS");

        let other = f.service.get_client_valuation(empty.id, day(4)).unwrap();
        assert_eq!(other.valuation.total_portfolio_value, dec!(0));
        assert!(f.service.is_valuation_completed(day(4)).unwrap());
    }

    #[test]
    fn test_stored_positions_survive_later_trades() {
        let f = setup();
        f.store.add_close(f.thyao, day(4), dec!(275));
        f.store.add_close(f.asels, day(4), dec!(60));
        f.service.run_end_of_day_valuation(day(4), "system").unwrap();

        // The THYAO position is sold off after the snapshot.
        let item = f
            .store
            .state()
            .items
            .values()
            .find(|i| i.stock_id == f.thyao)
            .map(|i| i.id)
            .unwrap();
        f.store.state().items.remove(&item);

        let row = f.service.get_client_valuation(f.client_id, day(4)).unwrap();
        assert_eq!(row.positions.len(), 2);
        let total: rust_decimal::Decimal = row.positions.iter().map(|p| p.market_value).sum();
        assert_eq!(total, row.valuation.total_portfolio_value);

        let current = f.service.value_client_positions(f.client_id, day(4)).unwrap();
        assert_eq!(current.len(), 1);
    }

    #[test]
    fn test_rerun_skips_locked_rows() {
        let f = setup();
        f.store.add_close(f.thyao, day(4), dec!(275));
        f.service.run_end_of_day_valuation(day(4), "system").unwrap();

        let again = f.service.run_end_of_day_valuation(day(4), "system").unwrap();
        assert_eq!(again.valued, 0);
        assert_eq!(again.skipped, 1);
        assert_eq!(f.service.get_all_client_valuations(day(4)).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_close_falls_back_to_current_price() {
        let f = setup();
        f.store.add_close(f.thyao, day(4), dec!(275));

        let positions = f.service.value_client_positions(f.client_id, day(4)).unwrap();
        let asels = positions.iter().find(|p| p.stock_id == f.asels).unwrap();
        assert_eq!(asels.price_source, PriceSource::CurrentPrice);
        assert_eq!(asels.market_value, dec!(3000));
        let thyao = positions.iter().find(|p| p.stock_id == f.thyao).unwrap();
        assert_eq!(thyao.price_source, PriceSource::OfficialClose);
    }

    #[test]
    fn test_daily_change_uses_previous_locked_value() {
        let f = setup();
        f.store.add_close(f.thyao, day(4), dec!(250));
        f.store.add_close(f.asels, day(4), dec!(60));
        f.service.run_end_of_day_valuation(day(4), "system").unwrap();

        f.store.add_close(f.thyao, day(5), dec!(275));
        f.store.add_close(f.asels, day(5), dec!(60));
        f.service.run_end_of_day_valuation(day(5), "system").unwrap();

        let row = f.service.get_client_valuation(f.client_id, day(5)).unwrap().valuation;
        assert_eq!(row.previous_day_value, dec!(28000));
        assert_eq!(row.total_portfolio_value, dec!(30500));
        // 2500 / 28000 = 0.0893
        assert_eq!(row.daily_change_percentage, dec!(8.93));

        let history = f
            .service
            .get_valuation_history(f.client_id, day(1), day(31))
            .unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].valuation_date, day(4));
    }

    #[test]
    fn test_history_rejects_inverted_range() {
        let f = setup();
        let err = f
            .service
            .get_valuation_history(f.client_id, day(10), day(1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_missing_valuation_is_not_found() {
        let f = setup();
        let err = f.service.get_client_valuation(f.client_id, day(4)).unwrap_err();
        assert_eq!(err.code(), "VALUATION_NOT_FOUND");
    }

    #[test]
    fn test_delete_valuations_allows_rerun() {
        let f = setup();
        f.store.add_close(f.thyao, day(4), dec!(275));
        f.service.run_end_of_day_valuation(day(4), "system").unwrap();

        assert_eq!(f.service.delete_valuations_for_date(day(4)).unwrap(), 1);
        let summary = f.service.run_end_of_day_valuation(day(4), "system").unwrap();
        assert_eq!(summary.valued, 1);
    }
}
