//! Threshold checks against a quote

use serde::{Deserialize, Serialize};

use super::PriceQuote;
use crate::shared::errors::MonitorError;
use crate::shared::types::Coins;
use crate::shared::utils::format_coins;

/// Low/high alert bounds for one monitoring session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertThresholds {
    pub low: Option<Coins>,
    pub high: Option<Coins>,
}

impl AlertThresholds {
    pub fn new(low: Option<Coins>, high: Option<Coins>) -> Result<Self, MonitorError> {
        if low.is_none() && high.is_none() {
            return Err(MonitorError::NoThresholdProvided);
        }
        Ok(Self { low, high })
    }

    /// Parse user input. Blank means unset; anything else must be a non-negative integer.
    pub fn parse(low: &str, high: &str) -> Result<Self, MonitorError> {
        let (low, high) = (low.trim(), high.trim());
        if low.is_empty() && high.is_empty() {
            return Err(MonitorError::NoThresholdProvided);
        }
        Self::new(parse_bound(low)?, parse_bound(high)?)
    }

    pub fn evaluate(&self, quote: &PriceQuote) -> Vec<PriceAlert> {
        let mut alerts = Vec::new();

        if let Some(threshold) = self.low {
            if quote.low <= threshold {
                alerts.push(PriceAlert::Low { price: quote.low, threshold });
            }
        }
        if let Some(threshold) = self.high {
            if quote.high >= threshold {
                alerts.push(PriceAlert::High { price: quote.high, threshold });
            }
        }

        alerts
    }
}

fn parse_bound(value: &str) -> Result<Option<Coins>, MonitorError> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<Coins>()
        .map(Some)
        .map_err(|_| MonitorError::InvalidThreshold(value.to_string()))
}

/// A threshold crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceAlert {
    Low { price: Coins, threshold: Coins },
    High { price: Coins, threshold: Coins },
}

impl PriceAlert {
    pub fn message(&self) -> String {
        match self {
            Self::Low { price, .. } => format!("Low Price Alert: {} coins", format_coins(*price)),
            Self::High { price, .. } => format!("High Price Alert: {} coins", format_coins(*price)),
        }
    }
}
