use std::sync::Arc;

use crate::config::Config;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use backoffice_core::{
    accounts::{AccountService, AccountServiceTrait},
    clients::{ClientService, ClientServiceTrait},
    end_of_day::{EndOfDayService, EndOfDayServiceTrait},
    orders::{
        OrderService, OrderServiceConfig, OrderServiceTrait, PreviewCache, PreviewCacheConfig,
    },
    portfolio::{
        valuation::{ValuationService, ValuationServiceTrait},
        PortfolioService, PortfolioServiceTrait,
    },
    reports::{ReportService, ReportServiceTrait},
    settlement::SettlementService,
    simulation::{SimulationService, SimulationServiceTrait},
    stocks::{StockService, StockServiceTrait},
    utils::time_utils::{Clock, SystemClock},
};
use backoffice_market_data::{InfinaProvider, PriceFeed, StaticPriceFeed};
use backoffice_storage_sqlite::Repositories;

pub struct AppState {
    pub client_service: Arc<dyn ClientServiceTrait>,
    pub account_service: Arc<dyn AccountServiceTrait>,
    pub stock_service: Arc<dyn StockServiceTrait>,
    pub portfolio_service: Arc<dyn PortfolioServiceTrait>,
    pub order_service: Arc<dyn OrderServiceTrait>,
    pub valuation_service: Arc<dyn ValuationServiceTrait>,
    pub simulation_service: Arc<dyn SimulationServiceTrait>,
    pub end_of_day_service: Arc<dyn EndOfDayServiceTrait>,
    pub report_service: Arc<dyn ReportServiceTrait>,
    pub data_dir: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("BO_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

fn build_price_feed(config: &Config) -> Arc<dyn PriceFeed> {
    match &config.price_feed_url {
        Some(url) => {
            tracing::info!("Using price feed at {}", url);
            Arc::new(InfinaProvider::new(
                url.clone(),
                config.price_feed_api_key.clone(),
            ))
        }
        None => {
            tracing::warn!("BO_PRICE_FEED_URL is not set; closing prices must be loaded manually");
            Arc::new(StaticPriceFeed::new(Vec::new()))
        }
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    build_state_with(config, build_price_feed(config), Arc::new(SystemClock)).await
}

/// Wires every service over one database, with the feed and clock supplied.
pub async fn build_state_with(
    config: &Config,
    feed: Arc<dyn PriceFeed>,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<Arc<AppState>> {
    let data_dir = config.data_dir.clone();
    let repos = tokio::task::spawn_blocking(move || Repositories::open(&data_dir)).await??;
    tracing::info!("Database ready under {}", config.data_dir);

    let client_service = Arc::new(ClientService::new(repos.clients.clone()));
    let account_service = Arc::new(AccountService::new(
        repos.accounts.clone(),
        repos.clients.clone(),
    ));
    let stock_service = Arc::new(StockService::new(repos.stocks.clone(), feed));
    let portfolio_service = Arc::new(PortfolioService::new(
        repos.portfolios.clone(),
        repos.stocks.clone(),
    ));
    let simulation_service = Arc::new(SimulationService::new(
        repos.simulation.clone(),
        clock.clone(),
    ));
    let previews = Arc::new(PreviewCache::new(
        PreviewCacheConfig {
            ttl_secs: config.preview_ttl_secs,
        },
        clock.clone(),
    ));
    let order_service = Arc::new(OrderService::new(
        repos.orders.clone(),
        repos.clients.clone(),
        repos.accounts.clone(),
        repos.stocks.clone(),
        repos.portfolios.clone(),
        simulation_service.clone(),
        previews,
        clock.clone(),
        OrderServiceConfig {
            enforce_market_hours: config.enforce_market_hours,
        },
    ));
    let valuation_service = Arc::new(ValuationService::new(
        repos.valuations.clone(),
        repos.clients.clone(),
        repos.portfolios.clone(),
        repos.stocks.clone(),
    ));
    let settlement_service = Arc::new(SettlementService::new(
        repos.orders.clone(),
        stock_service.clone(),
        clock,
    ));
    let end_of_day_service = Arc::new(EndOfDayService::new(
        simulation_service.clone(),
        settlement_service,
        valuation_service.clone(),
        stock_service.clone(),
    ));
    let report_service = Arc::new(ReportService::new(
        client_service.clone(),
        account_service.clone(),
        valuation_service.clone(),
    ));

    Ok(Arc::new(AppState {
        client_service,
        account_service,
        stock_service,
        portfolio_service,
        order_service,
        valuation_service,
        simulation_service,
        end_of_day_service,
        report_service,
        data_dir: config.data_dir.clone(),
    }))
}
