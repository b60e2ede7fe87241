use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::reports_model::{ClientValueLine, PortfolioReport, PositionLine, SummaryReport};
use crate::accounts::AccountServiceTrait;
use crate::clients::ClientServiceTrait;
use crate::constants::SUMMARY_TOP_CLIENTS;
use crate::errors::Result;
use crate::portfolio::valuation::ValuationServiceTrait;
use crate::utils::decimal_utils::{percentage_of, round_money};

pub trait ReportServiceTrait: Send + Sync {
    fn portfolio_report(&self, client_id: i64, date: NaiveDate) -> Result<PortfolioReport>;

    fn summary_report(&self, date: NaiveDate) -> Result<SummaryReport>;
}

/// Internal reports built from live holdings priced on a date.
pub struct ReportService {
    clients: Arc<dyn ClientServiceTrait>,
    accounts: Arc<dyn AccountServiceTrait>,
    valuation: Arc<dyn ValuationServiceTrait>,
}

impl ReportService {
    pub fn new(
        clients: Arc<dyn ClientServiceTrait>,
        accounts: Arc<dyn AccountServiceTrait>,
        valuation: Arc<dyn ValuationServiceTrait>,
    ) -> Self {
        Self {
            clients,
            accounts,
            valuation,
        }
    }
}

impl ReportServiceTrait for ReportService {
    fn portfolio_report(&self, client_id: i64, date: NaiveDate) -> Result<PortfolioReport> {
        let client = self.clients.get_client(client_id)?;
        let positions = self.valuation.value_client_positions(client_id, date)?;

        let portfolio_value: Decimal = positions.iter().map(|p| p.market_value).sum();
        let cost_basis: Decimal = positions.iter().map(|p| p.cost).sum();
        let cash_balance = self.accounts.cash_balance(client_id)?;

        let lines = positions
            .into_iter()
            .map(|position| PositionLine {
                weight: round_money(percentage_of(position.market_value, portfolio_value)),
                position,
            })
            .collect();

        Ok(PortfolioReport {
            client_id,
            client_name: client.full_name,
            client_type: client.client_type,
            date,
            positions: lines,
            portfolio_value,
            cost_basis,
            unrealized_profit_loss: portfolio_value - cost_basis,
            cash_balance,
            total_assets: portfolio_value + cash_balance,
        })
    }

    fn summary_report(&self, date: NaiveDate) -> Result<SummaryReport> {
        let clients = self.clients.list_clients(true)?;
        let mut lines = Vec::with_capacity(clients.len());
        let mut total_assets = Decimal::ZERO;

        for client in &clients {
            let positions = self.valuation.value_client_positions(client.id, date)?;
            let value: Decimal = positions.iter().map(|p| p.market_value).sum();
            let unrealized: Decimal = positions.iter().map(|p| p.unrealized_profit_loss).sum();
            total_assets += value + self.accounts.cash_balance(client.id)?;
            lines.push(ClientValueLine {
                client_id: client.id,
                client_name: client.full_name.clone(),
                portfolio_value: value,
                unrealized_profit_loss: unrealized,
            });
        }

        let total_unrealized: Decimal = lines.iter().map(|l| l.unrealized_profit_loss).sum();
        lines.sort_by(|a, b| {
            b.portfolio_value
                .cmp(&a.portfolio_value)
                .then(a.client_id.cmp(&b.client_id))
        });
        lines.truncate(SUMMARY_TOP_CLIENTS);
        debug!("Summary report for {} over {} clients", date, clients.len());

        Ok(SummaryReport {
            date,
            client_count: clients.len(),
            total_assets_under_management: total_assets,
            total_unrealized_profit_loss: total_unrealized,
            top_clients: lines,
        })
    }
}
