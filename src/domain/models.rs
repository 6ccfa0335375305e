use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEntry {
    pub title: String,
    pub command: String,
}

impl CommandEntry {
    pub fn new(title: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            command: command.into(),
        }
    }
}

// Ordered, duplicates allowed. The backend registry owns the real copy.
pub type CommandList = Vec<CommandEntry>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub width: f64,
    pub height: f64,
}

impl WindowGeometry {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowRole {
    List,
    AddCommand,
    Confirmation,
}

impl WindowRole {
    /// Window label, also used as the opaque readiness tag.
    pub fn label(self) -> &'static str {
        match self {
            WindowRole::List => "main",
            WindowRole::AddCommand => "add-command",
            WindowRole::Confirmation => "confirmation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowLabel(pub String);

impl WindowLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }
}

impl From<WindowRole> for WindowLabel {
    fn from(role: WindowRole) -> Self {
        Self(role.label().to_string())
    }
}

impl fmt::Display for WindowLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Command selected for confirmation, handed over exactly once.
#[derive(Debug, Default)]
pub struct PendingCommand(Option<String>);

impl PendingCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self(Some(command.into()))
    }

    pub fn take(&mut self) -> Option<String> {
        self.0.take()
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self) -> bool {
        self.0.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

pub const NOTIFICATION_TITLE: &str = "Command-Launcher Notification";

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub timestamp: DateTime<Local>,
}

impl Notification {
    pub fn from_outcome(outcome: &RunOutcome) -> Self {
        let body = if outcome.success {
            format!("Success: {}", outcome.stdout)
        } else {
            format!("Failure: {}", outcome.stderr)
        };
        Self {
            title: NOTIFICATION_TITLE.to_string(),
            body,
            timestamp: Local::now(),
        }
    }
}
