//! Price domain - quotes, the latest-price table and threshold analysis

mod price_analyzer;
mod price_feed;

pub use price_analyzer::{AlertThresholds, PriceAlert};
pub use price_feed::PriceFeed;

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::shared::types::{Coins, ItemId};

/// A single low/high reading for one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuote {
    pub item_id: ItemId,
    pub low: Coins,
    pub high: Coins,
    pub low_time: Option<DateTime<Utc>>,
    pub high_time: Option<DateTime<Utc>>,
}

impl PriceQuote {
    pub fn new(item_id: ItemId, low: Coins, high: Coins) -> Self {
        Self {
            item_id,
            low,
            high,
            low_time: None,
            high_time: None,
        }
    }
}

/// One entry of the latest-price endpoint. Either side is null until the item has traded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LatestPrice {
    pub high: Option<Coins>,
    #[serde(rename = "highTime")]
    pub high_time: Option<i64>,
    pub low: Option<Coins>,
    #[serde(rename = "lowTime")]
    pub low_time: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    data: HashMap<String, LatestPrice>,
}

/// The full latest-price table. There is no single-item endpoint upstream.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    entries: HashMap<ItemId, LatestPrice>,
}

impl PriceTable {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (ItemId, LatestPrice)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Decode a `{"data": {"<id>": {...}}}` body
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let response: LatestResponse = serde_json::from_str(body)?;
        let entries = response
            .data
            .into_iter()
            .filter_map(|(key, price)| match key.parse::<ItemId>() {
                Ok(id) => Some((id, price)),
                Err(_) => {
                    debug!("Skipping non-numeric price key {:?}", key);
                    None
                }
            });
        Ok(Self::from_entries(entries))
    }

    /// Quote for `item_id`, or None when absent or not yet traded on both sides
    pub fn quote(&self, item_id: ItemId) -> Option<PriceQuote> {
        let entry = self.entries.get(&item_id)?;
        Some(PriceQuote {
            item_id,
            low: entry.low?,
            high: entry.high?,
            low_time: entry.low_time.and_then(timestamp),
            high_time: entry.high_time.and_then(timestamp),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn timestamp(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}
