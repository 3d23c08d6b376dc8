//! In-memory price feed for tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::catalog::MappingEntry;
use crate::domain::price::{LatestPrice, PriceFeed, PriceTable};
use crate::infrastructure::Notifier;
use crate::shared::errors::FeedError;
use crate::shared::types::{Coins, ItemId};

pub const WHIP: ItemId = ItemId(4151);

/// Replays a script of latest-price tables; fails once the script runs out
pub struct ScriptedFeed {
    mapping: Option<Vec<MappingEntry>>,
    tables: Mutex<VecDeque<PriceTable>>,
    repeat_last: Option<PriceTable>,
    latency: Option<Duration>,
    pub mapping_calls: AtomicUsize,
    pub latest_calls: AtomicUsize,
}

impl ScriptedFeed {
    pub fn new() -> Self {
        Self {
            mapping: Some(vec![
                MappingEntry { id: WHIP, name: "Abyssal whip".to_string() },
                MappingEntry { id: ItemId(2), name: "Cannonball".to_string() },
            ]),
            tables: Mutex::new(VecDeque::new()),
            repeat_last: None,
            latency: None,
            mapping_calls: AtomicUsize::new(0),
            latest_calls: AtomicUsize::new(0),
        }
    }

    /// Mapping endpoint returns 500
    pub fn without_mapping(mut self) -> Self {
        self.mapping = None;
        self
    }

    pub fn then_quote(self, item_id: ItemId, low: Coins, high: Coins) -> Self {
        self.push(table(item_id, low, high));
        self
    }

    pub fn then_table(self, table: PriceTable) -> Self {
        self.push(table);
        self
    }

    /// Serve this quote forever once the script is exhausted
    pub fn forever(mut self, item_id: ItemId, low: Coins, high: Coins) -> Self {
        self.repeat_last = Some(table(item_id, low, high));
        self
    }

    /// Delay every latest-price fetch by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn latest_calls(&self) -> usize {
        self.latest_calls.load(Ordering::SeqCst)
    }

    fn push(&self, table: PriceTable) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.push_back(table);
        }
    }
}

pub fn table(item_id: ItemId, low: Coins, high: Coins) -> PriceTable {
    PriceTable::from_entries([(
        item_id,
        LatestPrice { high: Some(high), high_time: None, low: Some(low), low_time: None },
    )])
}

#[async_trait]
impl PriceFeed for ScriptedFeed {
    async fn fetch_mapping(&self) -> Result<Vec<MappingEntry>, FeedError> {
        self.mapping_calls.fetch_add(1, Ordering::SeqCst);
        self.mapping.clone().ok_or(FeedError::Status {
            url: "test://mapping".to_string(),
            status: 500,
        })
    }

    async fn fetch_latest(&self) -> Result<PriceTable, FeedError> {
        self.latest_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let next = self.tables.lock().ok().and_then(|mut tables| tables.pop_front());
        next.or_else(|| self.repeat_last.clone()).ok_or(FeedError::Status {
            url: "test://latest".to_string(),
            status: 503,
        })
    }
}

/// Records every notification it receives
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, String, Duration)>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(String, String, Duration)> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str, timeout: Duration) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((title.to_string(), message.to_string(), timeout));
        }
    }
}
