//! Desktop notification sinks

use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

/// Fire-and-forget notification sink
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str, timeout: Duration);
}

/// Writes notifications to the log only
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, message: &str, _timeout: Duration) {
        warn!("🔔 {}: {}", title, message);
    }
}

/// Logs the notification, then shows it through the platform's notifier binary
/// (`notify-send` on Linux, `osascript` on macOS) when one exists and a runtime is running.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, message: &str, timeout: Duration) {
        LogNotifier.notify(title, message, timeout);

        let Some(mut command) = notification_command(title, message, timeout) else {
            return;
        };
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("No runtime available, desktop notification skipped");
            return;
        };

        handle.spawn(async move {
            match command.status().await {
                Ok(status) if status.success() => {}
                Ok(status) => debug!("Notifier exited with {}", status),
                Err(e) => debug!("Failed to run desktop notifier: {}", e),
            }
        });
    }
}

#[cfg(target_os = "linux")]
fn notification_command(title: &str, message: &str, timeout: Duration) -> Option<Command> {
    let mut command = Command::new("notify-send");
    command
        .arg("--app-name=ge-pricewatch")
        .arg(format!("--expire-time={}", timeout.as_millis()))
        .arg(title)
        .arg(message);
    Some(command)
}

#[cfg(target_os = "macos")]
fn notification_command(title: &str, message: &str, _timeout: Duration) -> Option<Command> {
    let script = format!(
        "display notification {} with title {}",
        applescript_string(message),
        applescript_string(title)
    );
    let mut command = Command::new("osascript");
    command.arg("-e").arg(script);
    Some(command)
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn notification_command(_title: &str, _message: &str, _timeout: Duration) -> Option<Command> {
    None
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn applescript_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
