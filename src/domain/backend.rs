use crate::domain::models::{CommandEntry, CommandList, Notification, RunOutcome};
use anyhow::Result;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRegistry: Send + Sync {
    // Current list, in saved order
    async fn load(&self) -> Result<CommandList>;

    async fn append(&self, entry: CommandEntry) -> Result<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    // Runs one command line to completion. A non-zero exit is an `Ok` outcome.
    async fn run(&self, command: &str) -> Result<RunOutcome>;
}

#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
