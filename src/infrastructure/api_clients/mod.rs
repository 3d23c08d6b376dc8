mod wiki_price_client;

pub use wiki_price_client::WikiPriceClient;
