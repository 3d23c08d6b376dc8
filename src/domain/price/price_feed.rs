//! Price feed interface

use async_trait::async_trait;

use super::PriceTable;
use crate::domain::catalog::MappingEntry;
use crate::shared::errors::FeedError;

/// Upstream price API: the item mapping and the full latest-price table
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Fetch every tradable item's name and id
    async fn fetch_mapping(&self) -> Result<Vec<MappingEntry>, FeedError>;

    /// Fetch the latest low/high prices for all items
    async fn fetch_latest(&self) -> Result<PriceTable, FeedError>;
}
