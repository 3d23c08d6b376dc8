//! GE Pricewatch - OSRS Grand Exchange price lookup and threshold alerts

pub mod domain;
pub mod infrastructure;
pub mod application;
pub mod shared;

// Re-export main types for convenience
pub use application::{PriceMonitor, PriceService, PriceSource};
pub use domain::catalog::ItemCatalog;
pub use domain::monitor::{MonitorEvent, MonitorEventKind, MonitorState};
pub use domain::price::{AlertThresholds, PriceFeed, PriceQuote};
