//! Infrastructure layer - HTTP price client and desktop notifications

pub mod api_clients;
pub mod notifier;

pub use api_clients::WikiPriceClient;
pub use notifier::{DesktopNotifier, LogNotifier, Notifier};
