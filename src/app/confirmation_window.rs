use crate::app::channel::{report_unhandled, WindowContext};
use crate::domain::events::{self, Event};
use crate::domain::models::WindowRole;
use crate::domain::request::Request;
use crate::domain::view::ConfirmationView;
use crate::error::{InvokeError, InvokeResult};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationPhase {
    Loading,
    AwaitingDecision,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationInput {
    Yes,
    No,
}

/// Dialog that runs one command after approval. Only one may be open at a time:
/// `update-command` carries no window identity.
pub struct ConfirmationWindow<V: ConfirmationView> {
    ctx: WindowContext,
    view: V,
    phase: ConfirmationPhase,
}

impl<V: ConfirmationView> ConfirmationWindow<V> {
    pub fn new(ctx: WindowContext, view: V) -> Self {
        Self {
            ctx,
            view,
            phase: ConfirmationPhase::Loading,
        }
    }

    pub fn phase(&self) -> ConfirmationPhase {
        self.phase
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Announces readiness so the pending command can be pushed in.
    pub fn load(&mut self) {
        if self.phase != ConfirmationPhase::Loading {
            return;
        }
        self.ctx.publish(Event::ConfirmationWindowLoaded(
            WindowRole::Confirmation.label().to_string(),
        ));
        self.phase = ConfirmationPhase::AwaitingDecision;
    }

    pub fn handle_event(&mut self, event: Event) {
        if let Event::UpdateCommand(command) = event {
            if !self.view.set_command_text(&command) {
                tracing::debug!("command element missing, update dropped");
            }
        }
    }

    pub fn decline(&mut self) {
        if self.phase == ConfirmationPhase::Closed {
            return;
        }
        self.ctx.dispatch(Request::CloseWindow);
        self.phase = ConfirmationPhase::Closed;
    }

    /// Runs whatever the view currently shows, then closes whatever the outcome.
    pub async fn approve(&mut self) -> InvokeResult {
        if self.phase == ConfirmationPhase::Closed {
            return Ok(());
        }
        let result = match self.view.command_text() {
            Some(args) => self.ctx.invoke(Request::RunCommand { args }).await,
            None => Err(InvokeError::MissingArgument("args")),
        };
        if let Err(e) = &result {
            report_unhandled(self.ctx.label(), "run_command", e);
        }

        self.ctx.dispatch(Request::CloseWindow);
        self.phase = ConfirmationPhase::Closed;
        result
    }

    pub async fn run(mut self, mut input: mpsc::Receiver<ConfirmationInput>) {
        let mut updates = self.ctx.subscribe(events::UPDATE_COMMAND);
        self.load();

        while self.phase != ConfirmationPhase::Closed {
            tokio::select! {
                biased;

                Some(event) = updates.recv() => self.handle_event(event),
                input = input.recv() => match input {
                    Some(ConfirmationInput::Yes) => {
                        let _ = self.approve().await;
                    }
                    Some(ConfirmationInput::No) => self.decline(),
                    None => break,
                },
            }
        }
        tracing::debug!(window = %self.ctx.label(), phase = ?self.phase, "confirmation window loop finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::channel::{Invocation, MessageChannel};
    use crate::infrastructure::headless::HeadlessConfirmation;

    fn setup(
        view: HeadlessConfirmation,
    ) -> (
        ConfirmationWindow<HeadlessConfirmation>,
        MessageChannel,
        mpsc::UnboundedReceiver<Invocation>,
    ) {
        let (channel, requests) = MessageChannel::new();
        let window = ConfirmationWindow::new(channel.for_window(WindowRole::Confirmation), view);
        (window, channel, requests)
    }

    #[tokio::test]
    async fn test_load_publishes_readiness_tag() {
        let (mut window, channel, _requests) = setup(HeadlessConfirmation::mounted());
        let mut ready = channel.subscribe(events::CONFIRMATION_WINDOW_LOADED);

        assert_eq!(window.phase(), ConfirmationPhase::Loading);
        window.load();
        assert_eq!(window.phase(), ConfirmationPhase::AwaitingDecision);
        assert_eq!(
            ready.recv().await,
            Some(Event::ConfirmationWindowLoaded("confirmation".to_string()))
        );

        // Readiness is announced once
        window.load();
        channel.publish(Event::ConfirmationWindowLoaded("other".to_string()));
        assert_eq!(
            ready.recv().await,
            Some(Event::ConfirmationWindowLoaded("other".to_string()))
        );
    }

    #[test]
    fn test_update_before_element_exists_is_dropped() {
        let view = HeadlessConfirmation::unmounted();
        let (mut window, _channel, _requests) = setup(view.clone());

        window.handle_event(Event::UpdateCommand("echo early".to_string()));
        assert_eq!(view.command_text(), None);

        view.mount();
        window.load();
        window.handle_event(Event::UpdateCommand("echo hi".to_string()));
        assert_eq!(view.command_text().as_deref(), Some("echo hi"));
    }

    #[test]
    fn test_decline_closes_without_running() {
        let (mut window, _channel, mut requests) = setup(HeadlessConfirmation::mounted());
        window.load();
        window.decline();
        window.decline();

        assert_eq!(requests.try_recv().unwrap().request, Request::CloseWindow);
        assert!(requests.try_recv().is_err());
        assert_eq!(window.phase(), ConfirmationPhase::Closed);
    }

    #[tokio::test]
    async fn test_approve_runs_displayed_text_then_closes_on_failure() {
        let view = HeadlessConfirmation::mounted();
        let (mut window, _channel, mut requests) = setup(view.clone());
        window.load();
        window.handle_event(Event::UpdateCommand("echo hi".to_string()));

        let backend = tokio::spawn(async move {
            let run = requests.recv().await.unwrap();
            assert_eq!(
                run.request,
                Request::RunCommand {
                    args: "echo hi".to_string()
                }
            );
            assert!(run.is_awaited());
            // Nothing else is issued while the run is pending
            assert!(requests.try_recv().is_err());
            run.respond(Err(InvokeError::Failed {
                operation: "run_command",
                message: "exit 1".to_string(),
            }));

            let close = requests.recv().await.unwrap();
            assert_eq!(close.request, Request::CloseWindow);
            assert!(requests.try_recv().is_err());
        });

        let result = window.approve().await;
        assert!(result.is_err());
        assert_eq!(window.phase(), ConfirmationPhase::Closed);
        backend.await.unwrap();
    }

    #[tokio::test]
    async fn test_approve_reads_view_not_cached_value() {
        let mut view = HeadlessConfirmation::mounted();
        let (mut window, _channel, mut requests) = setup(view.clone());
        window.load();
        window.handle_event(Event::UpdateCommand("echo one".to_string()));
        view.set_command_text("echo two");

        let backend = tokio::spawn(async move {
            let run = requests.recv().await.unwrap();
            let args = match &run.request {
                Request::RunCommand { args } => args.clone(),
                other => panic!("expected RunCommand, got {other:?}"),
            };
            run.respond(Ok(()));
            args
        });

        assert_eq!(window.approve().await, Ok(()));
        assert_eq!(backend.await.unwrap(), "echo two");
    }

    #[tokio::test]
    async fn test_approve_without_element_still_closes() {
        let (mut window, _channel, mut requests) = setup(HeadlessConfirmation::unmounted());
        window.load();
        assert_eq!(
            window.approve().await,
            Err(InvokeError::MissingArgument("args"))
        );
        assert_eq!(requests.try_recv().unwrap().request, Request::CloseWindow);
    }

    #[tokio::test]
    async fn test_run_loop_ends_after_decision() {
        let view = HeadlessConfirmation::mounted();
        let (window, channel, mut requests) = setup(view.clone());
        let mut ready = channel.subscribe(events::CONFIRMATION_WINDOW_LOADED);
        let (tx, rx) = mpsc::channel(2);
        let handle = tokio::spawn(window.run(rx));

        ready.recv().await.unwrap();
        channel.publish(Event::UpdateCommand("uptime".to_string()));
        tx.send(ConfirmationInput::No).await.unwrap();
        handle.await.unwrap();

        assert_eq!(view.command_text().as_deref(), Some("uptime"));
        assert_eq!(requests.recv().await.unwrap().request, Request::CloseWindow);
    }
}
