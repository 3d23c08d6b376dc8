//! Application layer - use cases and services

pub mod commands;
pub mod price_monitor;
pub mod price_source;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use commands::{Cli, Commands, CommandExecutor};
pub use price_monitor::{PriceMonitor, PriceMonitorConfig};
pub use price_source::PriceSource;
pub use services::{PriceReport, PriceService};
