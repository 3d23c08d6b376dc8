//! Application services and use cases

use std::fmt;
use std::sync::Arc;

use tracing::info;

use super::price_source::PriceSource;
use crate::domain::price::PriceQuote;
use crate::shared::errors::QuoteError;
use crate::shared::utils::format_coins;

/// Result of a one-shot price lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceReport {
    pub item_name: String,
    pub quote: PriceQuote,
}

impl fmt::Display for PriceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\nLow: {} coins\nHigh: {} coins",
            self.item_name,
            format_coins(self.quote.low),
            format_coins(self.quote.high)
        )
    }
}

/// On-demand price lookups. Independent of any running monitor session.
pub struct PriceService {
    source: Arc<PriceSource>,
}

impl PriceService {
    pub fn new(source: Arc<PriceSource>) -> Self {
        Self { source }
    }

    pub async fn get_price(&self, name: &str) -> Result<PriceReport, QuoteError> {
        let item_id = self.source.resolve(name)?;
        let quote = self.source.fetch_quote(item_id).await?;

        info!("💰 {} ({}): low={} high={}", name, item_id, quote.low, quote.high);
        Ok(PriceReport {
            item_name: name.to_string(),
            quote,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{ScriptedFeed, WHIP};

    async fn service(feed: ScriptedFeed) -> (PriceService, Arc<ScriptedFeed>) {
        let feed = Arc::new(feed);
        let source = PriceSource::initialize(feed.clone()).await;
        (PriceService::new(Arc::new(source)), feed)
    }

    #[tokio::test]
    async fn test_get_price_formats_report() {
        let (service, _) = service(ScriptedFeed::new().then_quote(WHIP, 1_498_000, 1_520_000)).await;

        let report = service.get_price("Abyssal whip").await.unwrap();
        assert_eq!(
            report.to_string(),
            "Abyssal whip\nLow: 1,498,000 coins\nHigh: 1,520,000 coins"
        );
    }

    #[tokio::test]
    async fn test_unknown_item_skips_network() {
        let (service, feed) = service(ScriptedFeed::new().forever(WHIP, 1, 2)).await;

        let result = service.get_price("Abyssal Whip").await;
        assert_eq!(result, Err(QuoteError::ItemNotFound("Abyssal Whip".to_string())));
        assert_eq!(feed.latest_calls(), 0);
    }

    #[tokio::test]
    async fn test_price_unavailable() {
        let (service, _) = service(ScriptedFeed::new()).await;

        let result = service.get_price("Abyssal whip").await;
        assert_eq!(result, Err(QuoteError::PriceUnavailable(WHIP)));
        assert_eq!(result.unwrap_err().to_string(), "Price data unavailable.");
    }
}
