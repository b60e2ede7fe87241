#[cfg(test)]
mod tests {
    use crate::accounts::AccountService;
    use crate::clients::{ClientService, ClientType};
    use crate::portfolio::valuation::ValuationService;
    use crate::reports::{ReportService, ReportServiceTrait};
    use crate::test_mocks::InMemoryStore;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn service(store: &Arc<InMemoryStore>) -> ReportService {
        ReportService::new(
            Arc::new(ClientService::new(store.clone())),
            Arc::new(AccountService::new(store.clone(), store.clone())),
            Arc::new(ValuationService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
            )),
        )
    }

    #[test]
    fn test_portfolio_report_weights_and_totals() {
        let store = InMemoryStore::new();
        let client = store.add_client("Ayse Yilmaz", ClientType::Individual);
        let account = store.add_account(client.id, dec!(2500));
        let thyao = store.add_stock("THYAO", dec!(10));
        let asels = store.add_stock("ASELS", dec!(10));
        store.set_holding(client.id, thyao.id, account.id, 100, dec!(8));
        store.set_holding(client.id, asels.id, account.id, 50, dec!(12));
        store.add_close(thyao.id, date(), dec!(15));
        store.add_close(asels.id, date(), dec!(10));

        let report = service(&store).portfolio_report(client.id, date()).unwrap();

        assert_eq!(report.client_name, "Ayse Yilmaz");
        assert_eq!(report.positions.len(), 2);
        assert_eq!(report.portfolio_value, dec!(2000));
        assert_eq!(report.cost_basis, dec!(1400));
        assert_eq!(report.unrealized_profit_loss, dec!(600));
        assert_eq!(report.cash_balance, dec!(2500));
        assert_eq!(report.total_assets, dec!(4500));

        let asels_line = &report.positions[0];
        assert_eq!(asels_line.position.stock_code, "ASELS");
        assert_eq!(asels_line.weight, dec!(25.00));
        assert_eq!(report.positions[1].weight, dec!(75.00));
    }

    #[test]
    fn test_empty_portfolio_has_zero_weights() {
        let store = InMemoryStore::new();
        let client = store.add_client("Mehmet Kaya", ClientType::Corporate);
        store.add_account(client.id, dec!(100));

        let report = service(&store).portfolio_report(client.id, date()).unwrap();
        assert!(report.positions.is_empty());
        assert_eq!(report.portfolio_value, Decimal::ZERO);
        assert_eq!(report.total_assets, dec!(100));
    }

    #[test]
    fn test_unknown_client_is_not_found() {
        let store = InMemoryStore::new();
        let err = service(&store).portfolio_report(404, date()).unwrap_err();
        assert_eq!(err.code(), "CLIENT_NOT_FOUND");
    }

    #[test]
    fn test_summary_ranks_top_clients_by_value() {
        let store = InMemoryStore::new();
        let stock = store.add_stock("THYAO", dec!(10));
        store.add_close(stock.id, date(), dec!(10));

        let mut ids = Vec::new();
        for (i, quantity) in [10, 70, 30, 50, 20, 60, 40].iter().enumerate() {
            let client = store.add_client(&format!("Client {}", i), ClientType::Individual);
            let account = store.add_account(client.id, dec!(1));
            store.set_holding(client.id, stock.id, account.id, *quantity, dec!(9));
            ids.push(client.id);
        }
        if let Some(client) = store.state().clients.get_mut(&ids[1]) {
            client.is_active = false;
        }

        let summary = service(&store).summary_report(date()).unwrap();
        assert_eq!(summary.client_count, 6);
        // 10 + 30 + 50 + 20 + 60 + 40 = 210 shares at 10, plus 1 cash each
        assert_eq!(summary.total_assets_under_management, dec!(2106));
        assert_eq!(summary.total_unrealized_profit_loss, dec!(210));

        let values: Vec<Decimal> = summary
            .top_clients
            .iter()
            .map(|l| l.portfolio_value)
            .collect();
        assert_eq!(
            values,
            vec![dec!(600), dec!(500), dec!(400), dec!(300), dec!(200)]
        );
        assert!(summary.top_clients.iter().all(|l| l.client_id != ids[1]));
    }
}
