use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Commission rate for individual clients (0.2%)
pub const INDIVIDUAL_COMMISSION_RATE: Decimal = dec!(0.002);

/// Commission rate for corporate clients (0.1%)
pub const CORPORATE_COMMISSION_RATE: Decimal = dec!(0.001);

/// BSMV transaction tax, applied on the commission
pub const BSMV_RATE: Decimal = dec!(0.05);

/// Scale for amounts, commission and tax
pub const MONEY_SCALE: u32 = 2;

/// Scale for percentage divisions
pub const PERCENT_SCALE: u32 = 4;

/// Scale for weighted average prices
pub const PRICE_SCALE: u32 = 4;

/// Default lifetime of an order preview
pub const DEFAULT_PREVIEW_TTL_SECS: i64 = 10 * 60;

/// Trading window, [open, close)
pub const MARKET_OPEN_HOUR: u32 = 10;
pub const MARKET_CLOSE_HOUR: u32 = 18;

/// Settlement cycle length. An order's settlement date is the trade date
/// plus this many business days, the day it reaches T2.
pub const SETTLEMENT_CYCLE_DAYS: i64 = 2;

/// Business days after trade date for each settlement transition
pub const T1_MIN_BUSINESS_DAYS: i64 = 1;
pub const T2_MIN_BUSINESS_DAYS: i64 = SETTLEMENT_CYCLE_DAYS;
/// Completion runs in the first batch after the settlement date, once the
/// T2 day itself has closed.
pub const COMPLETION_MIN_BUSINESS_DAYS: i64 = SETTLEMENT_CYCLE_DAYS + 1;

/// Default user recorded on batch-initiated changes
pub const SYSTEM_USER: &str = "SYSTEM";

/// Default account currency
pub const DEFAULT_CURRENCY: &str = "TRY";

/// Number of clients listed in the summary report
pub const SUMMARY_TOP_CLIENTS: usize = 5;
