use crate::app::channel::{Invocation, MessageChannel};
use crate::app::desktop::Desktop;
use crate::domain::backend::{CommandRegistry, CommandRunner, Notifier};
use crate::domain::events::Event;
use crate::domain::models::{CommandEntry, Notification, WindowGeometry};
use crate::domain::request::Request;
use crate::error::InvokeError;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Serves the request queue: registry and process work on spawned tasks, window
/// work inline and in queue order.
#[derive(Clone)]
pub struct Backend {
    registry: Arc<dyn CommandRegistry>,
    runner: Arc<dyn CommandRunner>,
    notifier: Arc<dyn Notifier>,
    desktop: Desktop,
    channel: MessageChannel,
}

impl Backend {
    pub fn new(
        registry: Arc<dyn CommandRegistry>,
        runner: Arc<dyn CommandRunner>,
        notifier: Arc<dyn Notifier>,
        desktop: Desktop,
        channel: MessageChannel,
    ) -> Self {
        Self {
            registry,
            runner,
            notifier,
            desktop,
            channel,
        }
    }

    pub async fn serve(self, mut requests: mpsc::UnboundedReceiver<Invocation>) {
        while let Some(invocation) = requests.recv().await {
            self.handle(invocation);
        }
        tracing::debug!("request queue closed");
    }

    pub fn handle(&self, invocation: Invocation) {
        tracing::debug!(
            window = %invocation.origin,
            request = invocation.request.name(),
            "handling request"
        );
        match invocation.request.clone() {
            Request::ReadCommands => {
                let registry = self.registry.clone();
                let channel = self.channel.clone();
                tokio::spawn(async move {
                    let result = match registry.load().await {
                        Ok(list) => {
                            channel.publish(Event::Commands(list));
                            Ok(())
                        }
                        Err(e) => Err(InvokeError::failed("read_commands", &e)),
                    };
                    invocation.respond(result);
                });
            }
            Request::WriteCommands { title, command } => {
                let registry = self.registry.clone();
                tokio::spawn(async move {
                    let result = registry
                        .append(CommandEntry { title, command })
                        .await
                        .map_err(|e| InvokeError::failed("write_commands", &e));
                    invocation.respond(result);
                });
            }
            Request::RunCommand { args } => {
                let runner = self.runner.clone();
                let notifier = self.notifier.clone();
                tokio::spawn(async move {
                    tracing::info!(command = %args, "running command");
                    let result = match runner.run(&args).await {
                        Ok(outcome) => {
                            notifier.notify(Notification::from_outcome(&outcome));
                            Ok(())
                        }
                        Err(e) => Err(InvokeError::failed("run_command", &e)),
                    };
                    invocation.respond(result);
                });
            }
            Request::OpenConfirmationWindow { command } => {
                let result = self.desktop.open_confirmation_window(command);
                invocation.respond(result);
            }
            Request::OpenAddCommandWindow => {
                let result = self.desktop.open_add_command_window();
                invocation.respond(result);
            }
            Request::ResizeWindow { width, height } => {
                let result = self
                    .desktop
                    .resize(&invocation.origin, WindowGeometry::new(width, height));
                invocation.respond(result);
            }
            Request::MoveWindowToBottomRight => {
                let result = self.desktop.move_to_bottom_right(&invocation.origin);
                invocation.respond(result);
            }
            Request::CloseWindow => {
                let result = self.desktop.close(&invocation.origin);
                invocation.respond(result);
            }
        }
    }
}
