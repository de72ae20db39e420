use rust_decimal::Decimal;
use thiserror::Error;

/// Error type for the boundaries around the billing engine.
///
/// The cycle calculator, normalizer, and aggregator are total and never
/// return these; they surface while parsing input, validating subscription
/// rows, or reading snapshots and configuration from disk.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid exchange rate {from} → {to}: {rate}")]
    InvalidRate {
        from: String,
        to: String,
        rate: Decimal,
    },
    #[error("Invalid payer count: {0}")]
    InvalidPayerCount(u32),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),
}
