//! Errors raised while normalizing, rendering and storing records.
//!
//! The ledger-specific ones are:
//!
//! - [`MalformedMarket`] thrown when a market is not a `BASE_QUOTE` pair.
//! - [`MarketMismatch`] thrown when two tickers do not share a currency.
//! - [`NegativeAmountInvariantViolation`] thrown when a debit has no
//!   positive amount to render.
//!
//! All of them signal a badly built record and are never retried.
//!
//!  [`MalformedMarket`]: EngineError::MalformedMarket
//!  [`MarketMismatch`]: EngineError::MarketMismatch
//!  [`NegativeAmountInvariantViolation`]: EngineError::NegativeAmountInvariantViolation
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Malformed market: {0}")]
    MalformedMarket(String),
    #[error("Market mismatch: {0}")]
    MarketMismatch(String),
    #[error("Negative amount: {0}")]
    NegativeAmountInvariantViolation(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid commodity: {0}")]
    InvalidCommodity(String),
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::MalformedMarket(a), Self::MalformedMarket(b)) => a == b,
            (Self::MarketMismatch(a), Self::MarketMismatch(b)) => a == b,
            (
                Self::NegativeAmountInvariantViolation(a),
                Self::NegativeAmountInvariantViolation(b),
            ) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidCommodity(a), Self::InvalidCommodity(b)) => a == b,
            (Self::InvalidRecord(a), Self::InvalidRecord(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
