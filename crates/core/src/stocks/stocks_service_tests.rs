#[cfg(test)]
mod tests {
    use crate::errors::{Error, ErrorKind};
    use crate::stocks::{StockService, StockServiceTrait};
    use crate::test_mocks::InMemoryStore;
    use backoffice_market_data::{ClosingPrice, StaticPriceFeed, StockDefinition};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn definition(code: &str, active: bool) -> StockDefinition {
        StockDefinition {
            code: code.to_string(),
            name: format!("{} Holding", code),
            exchange_code: Some("BIST".to_string()),
            sector: Some("Banking".to_string()),
            is_active: active,
        }
    }

    fn setup() -> (Arc<InMemoryStore>, Arc<StaticPriceFeed>, StockService) {
        let store = InMemoryStore::new();
        let feed = Arc::new(StaticPriceFeed::new(vec![
            definition("akbnk", true),
            definition("GARAN", false),
            StockDefinition {
                name: "  ".to_string(),
                ..definition("BROKEN", true)
            },
        ]));
        let service = StockService::new(store.clone(), feed.clone());
        (store, feed, service)
    }

    #[test]
    fn test_sync_definitions_skips_invalid_and_normalizes_codes() {
        let (store, _feed, service) = setup();

        assert_eq!(service.sync_stock_definitions().unwrap(), 2);
        let stock = service.get_stock_by_code(" akbnk ").unwrap();
        assert_eq!(stock.code, "AKBNK");
        assert_eq!(service.list_stocks(true).unwrap().len(), 1);
        assert_eq!(store.state().stocks.len(), 2);
    }

    #[test]
    fn test_sync_definitions_keeps_existing_price() {
        let (store, _feed, service) = setup();
        let existing = store.add_stock("AKBNK", dec!(41.20));

        service.sync_stock_definitions().unwrap();
        let refreshed = service.get_stock(existing.id).unwrap();
        assert_eq!(refreshed.current_price, dec!(41.20));
        assert_eq!(refreshed.name, "akbnk Holding");
    }

    #[test]
    fn test_fetch_closing_prices_saves_known_codes() {
        let (store, feed, service) = setup();
        let akbnk = store.add_stock("AKBNK", dec!(40));
        feed.set_prices(
            date(),
            vec![
                ClosingPrice {
                    code: "akbnk".to_string(),
                    open: dec!(40),
                    high: dec!(43),
                    low: dec!(39.5),
                    close: dec!(42),
                    volume: dec!(1250000),
                },
                ClosingPrice::close_only("UNKNOWN", dec!(10)),
            ],
        );

        let outcome = service.fetch_closing_prices(date()).unwrap();
        assert_eq!(outcome.provider, "STATIC");
        assert_eq!(outcome.fetched, 2);
        assert_eq!(outcome.saved, 1);
        assert_eq!(outcome.unknown_codes, vec!["UNKNOWN".to_string()]);

        let rows = service.get_daily_prices(date()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].change_percentage, dec!(5.00));
        assert!(rows[0].official_close);

        assert_eq!(service.get_stock(akbnk.id).unwrap().current_price, dec!(42));
        assert!(service.has_official_close(date()).unwrap());
        assert_eq!(
            service.closing_prices_by_stock(date()).unwrap().get(&akbnk.id),
            Some(&dec!(42))
        );
    }

    #[test]
    fn test_refetch_same_date_keeps_first_rows() {
        let (store, feed, service) = setup();
        store.add_stock("AKBNK", dec!(40));
        feed.set_prices(date(), vec![ClosingPrice::close_only("AKBNK", dec!(42))]);
        service.fetch_closing_prices(date()).unwrap();

        feed.set_prices(date(), vec![ClosingPrice::close_only("AKBNK", dec!(50))]);
        let outcome = service.fetch_closing_prices(date()).unwrap();
        assert_eq!(outcome.saved, 0);
        assert_eq!(service.get_daily_prices(date()).unwrap()[0].close, dec!(42));
    }

    #[test]
    fn test_empty_feed_is_an_external_error_and_writes_nothing() {
        let (store, _feed, service) = setup();
        store.add_stock("AKBNK", dec!(40));

        let err = service.fetch_closing_prices(date()).unwrap_err();
        assert!(matches!(err, Error::ExternalFeed(_)));
        assert_eq!(err.kind(), ErrorKind::ExternalFeed);
        assert!(!service.has_official_close(date()).unwrap());
    }

    #[test]
    fn test_delete_prices_for_date() {
        let (store, feed, service) = setup();
        store.add_stock("AKBNK", dec!(40));
        feed.set_prices(date(), vec![ClosingPrice::close_only("AKBNK", dec!(42))]);
        service.fetch_closing_prices(date()).unwrap();

        assert_eq!(service.delete_prices_for_date(date()).unwrap(), 1);
        assert!(!service.has_official_close(date()).unwrap());
    }
}
