//! Error handling for the application

use thiserror::Error;

use super::types::ItemId;

/// Price feed transport errors
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Errors surfaced by a price lookup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error("Item not found! Select a valid item.")]
    ItemNotFound(String),

    #[error("Price data unavailable.")]
    PriceUnavailable(ItemId),
}

/// Monitor control errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MonitorError {
    #[error("Enter at least a Low or High price.")]
    NoThresholdProvided,

    #[error("Invalid price values! {0:?} is not a non-negative integer")]
    InvalidThreshold(String),

    #[error("Item not found! Select a valid item.")]
    ItemNotFound(String),

    #[error("Monitoring already running for {0}")]
    AlreadyRunning(String),

    #[error("Monitoring is not running")]
    NotRunning,
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::ConfigError(format!("Failed to parse config file: {}", err))
    }
}

