//! Name resolution and quote lookup over a price feed

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::catalog::ItemCatalog;
use crate::domain::price::{PriceFeed, PriceQuote};
use crate::shared::errors::QuoteError;
use crate::shared::types::ItemId;

/// Price feed plus the item catalog loaded at startup
pub struct PriceSource {
    feed: Arc<dyn PriceFeed>,
    catalog: ItemCatalog,
}

impl PriceSource {
    /// Load the catalog from `feed`. A failed load leaves the catalog empty.
    pub async fn initialize(feed: Arc<dyn PriceFeed>) -> Self {
        let catalog = Self::load_catalog(feed.as_ref()).await;
        Self { feed, catalog }
    }

    /// Fetch the name -> id mapping. Never fails: errors degrade to an empty catalog.
    pub async fn load_catalog(feed: &dyn PriceFeed) -> ItemCatalog {
        match feed.fetch_mapping().await {
            Ok(entries) => {
                let catalog = ItemCatalog::from_entries(entries);
                info!("📚 Loaded catalog with {} items", catalog.len());
                catalog
            }
            Err(e) => {
                warn!("⚠️ Failed to load item catalog, continuing with an empty one: {}", e);
                ItemCatalog::empty()
            }
        }
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn resolve(&self, name: &str) -> Result<ItemId, QuoteError> {
        self.catalog.resolve(name)
    }

    /// Fetch the whole latest-price table and pick out `item_id`
    pub async fn fetch_quote(&self, item_id: ItemId) -> Result<PriceQuote, QuoteError> {
        let table = self.feed.fetch_latest().await.map_err(|e| {
            warn!("⚠️ Latest price fetch failed: {}", e);
            QuoteError::PriceUnavailable(item_id)
        })?;

        table.quote(item_id).ok_or_else(|| {
            warn!("No usable price entry for item {}", item_id);
            QuoteError::PriceUnavailable(item_id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{ScriptedFeed, WHIP};
    use crate::domain::price::{LatestPrice, PriceTable};
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_catalog_round_trip() {
        let feed = Arc::new(ScriptedFeed::new().then_quote(WHIP, 1_498_000, 1_520_000));
        let source = PriceSource::initialize(feed.clone()).await;

        let item_id = source.resolve("Abyssal whip").unwrap();
        let quote = source.fetch_quote(item_id).await.unwrap();

        assert_eq!(quote.item_id, item_id);
        assert_eq!((quote.low, quote.high), (1_498_000, 1_520_000));
        assert_eq!(feed.mapping_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_mapping_degrades_to_empty() {
        let feed = Arc::new(ScriptedFeed::new().without_mapping());
        let source = PriceSource::initialize(feed).await;

        assert!(source.catalog().is_empty());
        assert_eq!(
            source.resolve("Abyssal whip"),
            Err(QuoteError::ItemNotFound("Abyssal whip".to_string()))
        );
    }

    #[tokio::test]
    async fn test_absent_id_unavailable() {
        let feed = Arc::new(ScriptedFeed::new().then_quote(ItemId(2), 180, 185));
        let source = PriceSource::initialize(feed).await;

        assert_eq!(source.fetch_quote(WHIP).await, Err(QuoteError::PriceUnavailable(WHIP)));
    }

    #[tokio::test]
    async fn test_failed_fetch_unavailable() {
        let feed = Arc::new(ScriptedFeed::new());
        let source = PriceSource::initialize(feed).await;

        assert_eq!(source.fetch_quote(WHIP).await, Err(QuoteError::PriceUnavailable(WHIP)));
    }

    #[tokio::test]
    async fn test_untraded_entry_unavailable() {
        let untraded = PriceTable::from_entries([(
            WHIP,
            LatestPrice { low: Some(1_400_000), ..LatestPrice::default() },
        )]);
        let feed = Arc::new(ScriptedFeed::new().then_table(untraded));
        let source = PriceSource::initialize(feed).await;

        assert_eq!(source.fetch_quote(WHIP).await, Err(QuoteError::PriceUnavailable(WHIP)));
    }

    #[tokio::test]
    async fn test_each_quote_fetches_the_full_table() {
        let feed = Arc::new(ScriptedFeed::new().forever(WHIP, 10, 20));
        let source = PriceSource::initialize(feed.clone()).await;

        source.fetch_quote(WHIP).await.unwrap();
        source.fetch_quote(WHIP).await.unwrap();
        assert_eq!(feed.latest_calls(), 2);
    }
}
