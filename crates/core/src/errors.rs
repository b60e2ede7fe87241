//! Core error types for the back office.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.
//!
//! Every error maps to a machine-readable [`ErrorKind`] and a stable
//! [`Error::code`] string, kept separate from the human-readable message.

use backoffice_market_data::MarketDataError;
use chrono::{NaiveDate, ParseError as ChronoParseError};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the back office.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    StateConflict(#[from] ConflictError),

    #[error("Order calculation failed: {0}")]
    Calculation(#[from] CalculatorError),

    #[error("Price feed failed: {0}")]
    ExternalFeed(#[from] MarketDataError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Machine-readable error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Validation,
    NotFound,
    StateConflict,
    Calculation,
    Persistence,
    ExternalFeed,
    Internal,
}

impl Error {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Error::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Error::Validation(ValidationError::InvalidInput(message.into()))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Database(DatabaseError::NotFound(_)) => ErrorKind::NotFound,
            Error::Database(_) => ErrorKind::Persistence,
            Error::StateConflict(_) => ErrorKind::StateConflict,
            Error::Calculation(_) => ErrorKind::Calculation,
            Error::ExternalFeed(_) => ErrorKind::ExternalFeed,
            Error::Unexpected(_) => ErrorKind::Internal,
        }
    }

    /// Stable code for callers, e.g. `INSUFFICIENT_BALANCE`.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::NotFound { entity, .. } => match *entity {
                "client" => "CLIENT_NOT_FOUND",
                "account" => "ACCOUNT_NOT_FOUND",
                "stock" => "STOCK_NOT_FOUND",
                "order" => "ORDER_NOT_FOUND",
                "preview" => "PREVIEW_NOT_FOUND",
                "portfolio" => "PORTFOLIO_NOT_FOUND",
                "valuation" => "VALUATION_NOT_FOUND",
                _ => "NOT_FOUND",
            },
            Error::Database(DatabaseError::NotFound(_)) => "NOT_FOUND",
            Error::Database(_) => "DATABASE_ERROR",
            Error::StateConflict(c) => c.code(),
            Error::Calculation(_) => "CALCULATION_ERROR",
            Error::ExternalFeed(_) => "PRICE_FEED_ERROR",
            Error::Unexpected(_) => "INTERNAL_ERROR",
        }
    }

    /// True for errors whose message is safe to hand back to the caller.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Validation | ErrorKind::NotFound | ErrorKind::StateConflict
        )
    }
}

/// Business preconditions that the current state does not satisfy.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConflictError {
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: Decimal, available: Decimal },

    #[error("Insufficient stock: requested {requested}, held {held}")]
    InsufficientStock { requested: i64, held: i64 },

    #[error("Market is closed. Trading hours are {open} - {close}")]
    MarketClosed { open: String, close: String },

    #[error("Stock is not active: {0}")]
    InactiveStock(String),

    #[error("Preview has expired: {0}")]
    PreviewExpired(String),

    #[error("Preview {preview_id} is a {actual} preview, expected {expected}")]
    PreviewTypeMismatch {
        preview_id: String,
        expected: String,
        actual: String,
    },

    #[error("Order {order_id} cannot move from {from} to {to}")]
    IllegalTransition {
        order_id: i64,
        from: String,
        to: String,
    },

    #[error("Closing prices are not loaded for {0}")]
    ClosingPricesMissing(NaiveDate),

    #[error("Valuation for client {client_id} on {date} is locked")]
    ValuationLocked { client_id: i64, date: NaiveDate },

    #[error("Simulation date was modified concurrently (expected version {expected})")]
    StaleSimulationDate { expected: i64 },
}

impl ConflictError {
    pub fn code(&self) -> &'static str {
        match self {
            ConflictError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            ConflictError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            ConflictError::MarketClosed { .. } => "MARKET_CLOSED",
            ConflictError::InactiveStock(_) => "INACTIVE_STOCK",
            ConflictError::PreviewExpired(_) => "PREVIEW_EXPIRED",
            ConflictError::PreviewTypeMismatch { .. } => "PREVIEW_TYPE_MISMATCH",
            ConflictError::IllegalTransition { .. } => "ILLEGAL_STATE_TRANSITION",
            ConflictError::ClosingPricesMissing(_) => "CLOSING_PRICES_MISSING",
            ConflictError::ValuationLocked { .. } => "VALUATION_LOCKED",
            ConflictError::StaleSimulationDate { .. } => "STALE_SIMULATION_DATE",
        }
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    #[error("Database query failed: {0}")]
    QueryFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Errors that occur while pricing an order.
#[derive(Error, Debug)]
pub enum CalculatorError {
    #[error("Arithmetic overflow while computing {0}")]
    Overflow(&'static str),

    #[error("Calculation failed: {0}")]
    Calculation(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}
