//! Desktop notifications
//!
//! Notifications are fire and forget: a delivery failure is shown as a
//! warning and never fails the flow that sent it.

use std::io;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::boundary::BoundaryWarning;
use crate::config::NotificationsConfig;
use crate::error::{FlowError, Result};
use crate::ui;

pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str) -> Result<()>;
}

/// Send a notification, downgrading any failure to a warning
pub fn send(notifier: &dyn Notifier, title: &str, message: &str) {
    if let Err(e) = notifier.notify(title, message) {
        tracing::debug!(error = %e, "notification failed");
        ui::display_boundary_warning(&BoundaryWarning::NotificationFailed {
            reason: e.to_string(),
        });
    }
}

/// Desktop notifications when enabled with a command, terminal output otherwise
pub fn from_config(config: &NotificationsConfig) -> Arc<dyn Notifier> {
    if config.enabled && !config.command.is_empty() {
        Arc::new(CommandNotifier::new(config.command.clone()))
    } else {
        Arc::new(ConsoleNotifier)
    }
}

/// Prints `title: message` to the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, title: &str, message: &str) -> Result<()> {
        ui::display_info(&format!("{}: {}", title, message));
        Ok(())
    }
}

/// Prints to the terminal and launches a desktop notification command
///
/// The title and message are appended to the configured argument vector,
/// e.g. `["notify-send"]` runs `notify-send <title> <message>`.
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    command: Vec<String>,
}

impl CommandNotifier {
    pub fn new(command: Vec<String>) -> Self {
        CommandNotifier { command }
    }

    /// Start the notification command. The child is waited on by a
    /// background thread whose handle is returned.
    fn launch(&self, title: &str, message: &str) -> Result<JoinHandle<io::Result<ExitStatus>>> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| FlowError::config("notification command is empty"))?;

        let mut child = Command::new(program)
            .args(args)
            .arg(title)
            .arg(message)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        Ok(thread::spawn(move || child.wait()))
    }
}

impl Notifier for CommandNotifier {
    fn notify(&self, title: &str, message: &str) -> Result<()> {
        ConsoleNotifier.notify(title, message)?;
        self.launch(title, message)?;
        Ok(())
    }
}

/// Keeps every notification in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((title.to_string(), message.to_string()));
        Ok(())
    }
}
