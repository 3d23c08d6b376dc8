//! Monitoring session state and the events a session emits

use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::price::{AlertThresholds, PriceAlert, PriceQuote};
use crate::shared::types::{Coins, ItemId};
use crate::shared::utils::format_coins;

/// Monitor lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Running,
    /// Disarmed, background task still winding down
    Stopping,
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Stopping => write!(f, "stopping"),
        }
    }
}

/// Snapshot of a monitoring session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub id: String,
    pub item_id: ItemId,
    pub item_name: String,
    pub thresholds: AlertThresholds,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEventKind {
    Started { thresholds: AlertThresholds },
    PriceUpdate(PriceQuote),
    LowPriceAlert { price: Coins, threshold: Coins },
    HighPriceAlert { price: Coins, threshold: Coins },
    /// Fetch failed or the item has no price; the session has ended
    DataUnavailable,
    Stopped,
}

impl From<PriceAlert> for MonitorEventKind {
    fn from(alert: PriceAlert) -> Self {
        match alert {
            PriceAlert::Low { price, threshold } => Self::LowPriceAlert { price, threshold },
            PriceAlert::High { price, threshold } => Self::HighPriceAlert { price, threshold },
        }
    }
}

/// Event delivered to the display sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorEvent {
    pub session_id: String,
    pub item_id: ItemId,
    pub item_name: String,
    pub at: DateTime<Utc>,
    pub kind: MonitorEventKind,
}

impl MonitorEvent {
    pub fn new(session: &SessionInfo, kind: MonitorEventKind) -> Self {
        Self {
            session_id: session.id.clone(),
            item_id: session.item_id,
            item_name: session.item_name.clone(),
            at: Utc::now(),
            kind,
        }
    }
}

impl fmt::Display for MonitorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time = self.at.with_timezone(&chrono::Local).format("%H:%M:%S");
        match &self.kind {
            MonitorEventKind::Started { thresholds } => {
                write!(f, "[{}] Monitoring started for {}", time, self.item_name)?;
                if let Some(low) = thresholds.low {
                    write!(f, " (low <= {})", format_coins(low))?;
                }
                if let Some(high) = thresholds.high {
                    write!(f, " (high >= {})", format_coins(high))?;
                }
                Ok(())
            }
            MonitorEventKind::PriceUpdate(quote) => write!(
                f,
                "[{}] {} Low: {} coins High: {} coins",
                time,
                self.item_name,
                format_coins(quote.low),
                format_coins(quote.high)
            ),
            MonitorEventKind::LowPriceAlert { price, .. } => write!(
                f,
                "[{}] {} Low Price Alert: {} coins",
                time,
                self.item_name,
                format_coins(*price)
            ),
            MonitorEventKind::HighPriceAlert { price, .. } => write!(
                f,
                "[{}] {} High Price Alert: {} coins",
                time,
                self.item_name,
                format_coins(*price)
            ),
            MonitorEventKind::DataUnavailable => {
                write!(f, "[{}] Price data unavailable. Monitoring of {} ended.", time, self.item_name)
            }
            MonitorEventKind::Stopped => write!(f, "[{}] Monitoring stopped.", time),
        }
    }
}
