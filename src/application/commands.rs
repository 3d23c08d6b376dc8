//! CLI commands and handlers
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::price_monitor::{PriceMonitor, PriceMonitorConfig};
use super::price_source::PriceSource;
use super::services::PriceService;
use crate::domain::monitor::{MonitorEvent, MonitorState};
use crate::infrastructure::{DesktopNotifier, LogNotifier, Notifier, WikiPriceClient};
use crate::shared::types::AppConfig;
use crate::shared::utils::format_coins;

#[derive(Parser, Debug)]
#[command(name = "ge-pricewatch")]
#[command(version, about = "OSRS Grand Exchange price lookup and threshold alerts")]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Poll interval in seconds (overrides config)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Log alerts instead of showing desktop notifications
    #[arg(long, global = true)]
    pub no_notify: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Look up the current low/high price of an item
    Price {
        /// Exact item name, e.g. "Abyssal whip"
        name: String,
    },

    /// Poll an item's price and alert when a threshold is crossed
    Watch {
        /// Exact item name
        name: String,

        /// Alert when the low price drops to or below this value
        #[arg(long)]
        low: Option<String>,

        /// Alert when the high price rises to or above this value
        #[arg(long)]
        high: Option<String>,

        /// Stop after this many seconds
        #[arg(long)]
        duration: Option<u64>,
    },

    /// Interactive shell (default)
    Shell,
}

impl Cli {
    /// Apply CLI overrides on top of the file/default configuration
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(interval) = self.interval {
            config.monitor.poll_interval_secs = interval;
        }
        if self.no_notify {
            config.notifications.enabled = false;
        }
    }
}

/// One line of shell input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Price(String),
    Start { name: String, low: String, high: String },
    Stop,
    Status,
    Help,
    Quit,
    Empty,
}

impl ShellCommand {
    /// Parse `price <name>`, `start <name> | <low> | <high>`, `stop`, `status`, `help`, `quit`.
    /// `start` also accepts `low=N` / `high=N` tokens after the name.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "" => Ok(Self::Empty),
            "price" | "get" if !rest.is_empty() => Ok(Self::Price(rest.to_string())),
            "price" | "get" => Err("usage: price <item name>".to_string()),
            "start" | "watch" => Self::parse_start(rest),
            "stop" => Ok(Self::Stop),
            "status" => Ok(Self::Status),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(format!("unknown command {:?}, try `help`", other)),
        }
    }

    fn parse_start(rest: &str) -> Result<Self, String> {
        if rest.contains('|') {
            return Self::parse_start_fields(rest);
        }

        let mut name_parts = Vec::new();
        let mut low = String::new();
        let mut high = String::new();

        for token in rest.split_whitespace() {
            if let Some(value) = token.strip_prefix("low=") {
                low = value.to_string();
            } else if let Some(value) = token.strip_prefix("high=") {
                high = value.to_string();
            } else {
                name_parts.push(token);
            }
        }

        if name_parts.is_empty() {
            return Err(START_USAGE.to_string());
        }
        Ok(Self::Start {
            name: name_parts.join(" "),
            low,
            high,
        })
    }

    /// `<name> | <low> | <high>`, blank fields leave that threshold unset
    fn parse_start_fields(rest: &str) -> Result<Self, String> {
        let fields: Vec<&str> = rest.split('|').map(str::trim).collect();
        if fields.len() > 3 || fields[0].is_empty() {
            return Err(START_USAGE.to_string());
        }

        let field = |index: usize| fields.get(index).copied().unwrap_or_default().to_string();
        Ok(Self::Start {
            name: fields[0].to_string(),
            low: field(1),
            high: field(2),
        })
    }
}

const START_USAGE: &str = "usage: start <item name> | <low> | <high>";

const SHELL_HELP: &str = "\
Commands:
  price <item name>                    show the current low/high price
  start <item name> | <low> | <high>   poll the price and alert on thresholds
                                       (leave a field blank to skip it)
  stop                                 stop monitoring
  status                               show monitoring state
  quit                                 exit";

/// Runs CLI commands against the live price API
pub struct CommandExecutor {
    config: AppConfig,
}

impl CommandExecutor {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub async fn execute(&self, command: Commands) -> Result<()> {
        let source = self.connect().await?;

        match command {
            Commands::Price { name } => Self::execute_price_command(source, &name).await,
            Commands::Watch { name, low, high, duration } => {
                self.execute_watch_command(source, &name, low, high, duration).await
            }
            Commands::Shell => self.execute_shell_command(source).await,
        }
    }

    async fn connect(&self) -> Result<Arc<PriceSource>> {
        let client = WikiPriceClient::new(&self.config.api).context("build HTTP client")?;
        let source = PriceSource::initialize(Arc::new(client)).await;
        if source.catalog().is_empty() {
            warn!("⚠️ Item catalog is empty, every lookup will report the item as not found");
        }
        Ok(Arc::new(source))
    }

    fn notifier(&self) -> Arc<dyn Notifier> {
        if self.config.notifications.enabled {
            Arc::new(DesktopNotifier)
        } else {
            Arc::new(LogNotifier)
        }
    }

    fn monitor(&self, source: Arc<PriceSource>) -> (PriceMonitor, mpsc::UnboundedReceiver<MonitorEvent>) {
        PriceMonitor::new(source, self.notifier(), PriceMonitorConfig::from(&self.config))
    }

    async fn execute_price_command(source: Arc<PriceSource>, name: &str) -> Result<()> {
        let report = PriceService::new(source).get_price(name).await?;
        println!("{}", report);
        Ok(())
    }

    async fn execute_watch_command(
        &self,
        source: Arc<PriceSource>,
        name: &str,
        low: Option<String>,
        high: Option<String>,
        duration: Option<u64>,
    ) -> Result<()> {
        let (monitor, events) = self.monitor(source);
        let printer = tokio::spawn(print_events(events));

        monitor.start(name, low.as_deref().unwrap_or(""), high.as_deref().unwrap_or(""))?;

        let deadline = async {
            match duration {
                Some(secs) => {
                    info!("⏱️ Monitoring will run for {} seconds", secs);
                    tokio::time::sleep(Duration::from_secs(secs)).await
                }
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            _ = monitor.wait() => {}
            _ = deadline => {}
            _ = tokio::signal::ctrl_c() => info!("Interrupted"),
        }

        if monitor.state() == MonitorState::Running {
            monitor.stop()?;
        }
        monitor.wait().await;
        drop(monitor);
        printer.await.ok();
        Ok(())
    }

    async fn execute_shell_command(&self, source: Arc<PriceSource>) -> Result<()> {
        let service = PriceService::new(source.clone());
        let (monitor, events) = self.monitor(source);
        let printer = tokio::spawn(print_events(events));

        println!("OSRS GE Price Monitor. Type `help` for commands.");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines.next_line().await? {
            let command = match ShellCommand::parse(&line) {
                Ok(command) => command,
                Err(message) => {
                    println!("{}", message);
                    continue;
                }
            };

            match command {
                ShellCommand::Empty => {}
                ShellCommand::Help => println!("{}", SHELL_HELP),
                ShellCommand::Quit => break,
                ShellCommand::Price(name) => match service.get_price(&name).await {
                    Ok(report) => println!("{}", report),
                    Err(e) => println!("{}", e),
                },
                ShellCommand::Start { name, low, high } => {
                    if let Err(e) = monitor.start(&name, &low, &high) {
                        println!("{}", e);
                    }
                }
                ShellCommand::Stop => {
                    if let Err(e) = monitor.stop() {
                        println!("{}", e);
                    }
                }
                ShellCommand::Status => match monitor.session() {
                    Some(session) => println!(
                        "{}: {} since {} (low: {}, high: {})",
                        monitor.state(),
                        session.item_name,
                        session.started_at.with_timezone(&chrono::Local).format("%H:%M:%S"),
                        session.thresholds.low.map(format_coins).unwrap_or_else(|| "-".to_string()),
                        session.thresholds.high.map(format_coins).unwrap_or_else(|| "-".to_string()),
                    ),
                    None => println!("{}", monitor.state()),
                },
            }
        }

        if monitor.state() == MonitorState::Running {
            monitor.stop()?;
        }
        drop(monitor);
        printer.await.ok();
        Ok(())
    }
}

/// Display sink: render monitor events until every sender is gone
async fn print_events(mut events: mpsc::UnboundedReceiver<MonitorEvent>) {
    while let Some(event) = events.recv().await {
        println!("{}", event);
    }
}
