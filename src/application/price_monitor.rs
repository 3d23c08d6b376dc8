//! Background price polling with threshold alerts

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::price_source::PriceSource;
use crate::domain::monitor::{MonitorEvent, MonitorEventKind, MonitorState, SessionInfo};
use crate::domain::price::AlertThresholds;
use crate::infrastructure::Notifier;
use crate::shared::errors::MonitorError;
use crate::shared::types::{AppConfig, ItemId};
use crate::shared::utils::generate_id;

/// Monitor settings
#[derive(Debug, Clone)]
pub struct PriceMonitorConfig {
    pub poll_interval: Duration,
    pub notification_timeout: Duration,
}

impl Default for PriceMonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
            notification_timeout: Duration::from_secs(5),
        }
    }
}

impl From<&AppConfig> for PriceMonitorConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            poll_interval: Duration::from_secs(config.monitor.poll_interval_secs),
            notification_timeout: Duration::from_secs(config.notifications.timeout_secs),
        }
    }
}

/// State shared between the foreground and one session's polling task
struct SessionControl {
    armed: AtomicBool,
    wake: Notify,
    /// Held while checking `armed` and emitting, so nothing is emitted after `Stopped`
    emit_lock: Mutex<()>,
    events: mpsc::UnboundedSender<MonitorEvent>,
}

impl SessionControl {
    fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    fn gate(&self) -> MutexGuard<'_, ()> {
        self.emit_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn send(&self, session: &SessionInfo, kind: MonitorEventKind) {
        if self.events.send(MonitorEvent::new(session, kind)).is_err() {
            debug!("Event receiver dropped");
        }
    }

    /// Emit only while armed. Returns whether the event went out.
    fn emit(&self, session: &SessionInfo, kind: MonitorEventKind) -> bool {
        self.emit_and(session, kind, || {})
    }

    /// Emit only while armed, running `then` under the same gate
    fn emit_and(&self, session: &SessionInfo, kind: MonitorEventKind, then: impl FnOnce()) -> bool {
        let _gate = self.gate();
        if !self.is_armed() {
            return false;
        }
        self.send(session, kind);
        then();
        true
    }

    /// Disarm and emit `kind` if this call did the disarming
    fn disarm_with(&self, session: &SessionInfo, kind: MonitorEventKind) -> bool {
        let _gate = self.gate();
        let was_armed = self.armed.swap(false, Ordering::SeqCst);
        if was_armed {
            self.send(session, kind);
        }
        self.wake.notify_one();
        was_armed
    }

    /// Wait for the poll interval or until woken by stop
    async fn wait(&self, interval: Duration) {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = self.wake.notified() => {}
        }
    }
}

struct Session {
    info: SessionInfo,
    control: Arc<SessionControl>,
    task: Option<JoinHandle<()>>,
}

/// Polls the price of one item at a fixed interval and raises alerts
pub struct PriceMonitor {
    source: Arc<PriceSource>,
    notifier: Arc<dyn Notifier>,
    events: mpsc::UnboundedSender<MonitorEvent>,
    config: PriceMonitorConfig,
    session: Mutex<Option<Session>>,
}

impl PriceMonitor {
    /// Create a monitor. Events of every session go to the returned receiver.
    pub fn new(
        source: Arc<PriceSource>,
        notifier: Arc<dyn Notifier>,
        config: PriceMonitorConfig,
    ) -> (Self, mpsc::UnboundedReceiver<MonitorEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let monitor = Self {
            source,
            notifier,
            events,
            config,
            session: Mutex::new(None),
        };
        (monitor, receiver)
    }

    /// Validate user input and start monitoring `name`.
    /// Thresholds are checked before the name so bad input never reaches the network.
    pub fn start(&self, name: &str, low: &str, high: &str) -> Result<SessionInfo, MonitorError> {
        let thresholds = AlertThresholds::parse(low, high)?;
        let item_id = self
            .source
            .resolve(name)
            .map_err(|_| MonitorError::ItemNotFound(name.to_string()))?;

        self.start_with(name, item_id, thresholds)
    }

    /// Start monitoring an already resolved item
    pub fn start_with(
        &self,
        name: &str,
        item_id: ItemId,
        thresholds: AlertThresholds,
    ) -> Result<SessionInfo, MonitorError> {
        let mut slot = self.lock_session();
        if let Some(active) = slot.as_ref() {
            if active.control.is_armed() {
                return Err(MonitorError::AlreadyRunning(active.info.item_name.clone()));
            }
        }

        let info = SessionInfo {
            id: generate_id(),
            item_id,
            item_name: name.to_string(),
            thresholds,
            started_at: Utc::now(),
        };
        let control = Arc::new(SessionControl {
            armed: AtomicBool::new(true),
            wake: Notify::new(),
            emit_lock: Mutex::new(()),
            events: self.events.clone(),
        });

        info!(
            "▶️ Monitoring {} ({}) every {:?}, low={:?} high={:?}",
            name, item_id, self.config.poll_interval, thresholds.low, thresholds.high
        );
        control.emit(&info, MonitorEventKind::Started { thresholds });

        let task = tokio::spawn(run_session(
            self.source.clone(),
            self.notifier.clone(),
            self.config.clone(),
            info.clone(),
            control.clone(),
        ));

        *slot = Some(Session {
            info: info.clone(),
            control,
            task: Some(task),
        });
        Ok(info)
    }

    /// Disarm the active session. The wait is interrupted; an in-flight fetch finishes
    /// but its result is discarded.
    pub fn stop(&self) -> Result<SessionInfo, MonitorError> {
        let slot = self.lock_session();
        let session = slot
            .as_ref()
            .filter(|session| session.control.is_armed())
            .ok_or(MonitorError::NotRunning)?;

        if session.control.disarm_with(&session.info, MonitorEventKind::Stopped) {
            info!("🛑 Monitoring of {} stopped", session.info.item_name);
        }
        Ok(session.info.clone())
    }

    pub fn state(&self) -> MonitorState {
        match self.lock_session().as_ref() {
            None => MonitorState::Idle,
            Some(session) if session.control.is_armed() => MonitorState::Running,
            Some(session) => match &session.task {
                Some(task) if !task.is_finished() => MonitorState::Stopping,
                _ => MonitorState::Idle,
            },
        }
    }

    /// The armed session, if any
    pub fn session(&self) -> Option<SessionInfo> {
        self.lock_session()
            .as_ref()
            .filter(|session| session.control.is_armed())
            .map(|session| session.info.clone())
    }

    /// Wait for the current session's task to finish
    pub async fn wait(&self) {
        let task = self.lock_session().as_mut().and_then(|session| session.task.take());
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!("Monitor task ended abnormally: {}", e);
            }
        }
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for PriceMonitor {
    fn drop(&mut self) {
        if let Some(session) = self.lock_session().as_ref() {
            session.control.armed.store(false, Ordering::SeqCst);
            session.control.wake.notify_one();
        }
    }
}

async fn run_session(
    source: Arc<PriceSource>,
    notifier: Arc<dyn Notifier>,
    config: PriceMonitorConfig,
    session: SessionInfo,
    control: Arc<SessionControl>,
) {
    let mut tick: u64 = 0;

    while control.is_armed() {
        tick += 1;
        let quote = match source.fetch_quote(session.item_id).await {
            Ok(quote) => quote,
            Err(e) => {
                if control.disarm_with(&session, MonitorEventKind::DataUnavailable) {
                    warn!("❌ {} for {}, monitoring ended", e, session.item_name);
                }
                break;
            }
        };

        debug!("Tick {} for {}: low={} high={}", tick, session.item_name, quote.low, quote.high);
        let alerts = session.thresholds.evaluate(&quote);
        if !control.emit(&session, MonitorEventKind::PriceUpdate(quote)) {
            break;
        }

        for alert in alerts {
            let delivered = control.emit_and(&session, alert.into(), || {
                notifier.notify(
                    &format!("{} Price Alert", session.item_name),
                    &alert.message(),
                    config.notification_timeout,
                );
            });
            if !delivered {
                break;
            }
        }

        control.wait(config.poll_interval).await;
    }

    debug!("Session {} for {} finished after {} ticks", session.id, session.item_name, tick);
}
