//! Process-wide message channel shared by every window: a publish/subscribe
//! bus for events and an ordered queue of requests to the backend.

use crate::domain::events::Event;
use crate::domain::models::WindowLabel;
use crate::domain::request::Request;
use crate::error::{InvokeError, InvokeResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, oneshot};

#[derive(Default)]
pub struct EventBus {
    subscribers: Mutex<HashMap<String, Vec<mpsc::UnboundedSender<Value>>>>,
}

impl EventBus {
    pub fn subscribe(&self, name: &'static str) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_default()
            .push(tx);
        Subscription { name, rx }
    }

    /// Delivers the payload to every live subscriber of `name` and returns how
    /// many received it. Nothing is kept for subscribers that attach later.
    fn publish_raw(&self, name: &str, payload: Value) -> usize {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(senders) = subscribers.get_mut(name) else {
            return 0;
        };
        senders.retain(|tx| tx.send(payload.clone()).is_ok());
        senders.len()
    }

    pub fn publish(&self, event: &Event) -> usize {
        self.publish_raw(event.name(), event.payload())
    }
}

pub struct Subscription {
    name: &'static str,
    rx: mpsc::UnboundedReceiver<Value>,
}

impl Subscription {
    /// Next event that passes the shape check. Cancel safe.
    pub async fn recv(&mut self) -> Option<Event> {
        loop {
            let payload = self.rx.recv().await?;
            match Event::decode(self.name, &payload) {
                Some(event) => return Some(event),
                None => tracing::debug!(event = self.name, %payload, "dropping undecodable payload"),
            }
        }
    }
}

pub struct Invocation {
    pub origin: WindowLabel,
    pub request: Request,
    reply: Option<oneshot::Sender<InvokeResult>>,
}

impl Invocation {
    pub fn new(origin: WindowLabel, request: Request) -> (Self, oneshot::Receiver<InvokeResult>) {
        let (tx, rx) = oneshot::channel();
        let invocation = Self {
            origin,
            request,
            reply: Some(tx),
        };
        (invocation, rx)
    }

    pub fn fire_and_forget(origin: WindowLabel, request: Request) -> Self {
        Self {
            origin,
            request,
            reply: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_awaited(&self) -> bool {
        self.reply.is_some()
    }

    /// Completes the invocation. Failures nobody waits for go to the log.
    pub fn respond(self, result: InvokeResult) {
        match self.reply {
            Some(tx) => {
                let _ = tx.send(result);
            }
            None => {
                if let Err(e) = result {
                    report_unhandled(&self.origin, self.request.name(), &e);
                }
            }
        }
    }
}

pub fn report_unhandled(origin: &WindowLabel, request: &str, error: &InvokeError) {
    tracing::warn!(window = %origin, request, error = %error, "unhandled invocation failure");
}

#[derive(Clone)]
pub struct MessageChannel {
    bus: Arc<EventBus>,
    requests: mpsc::UnboundedSender<Invocation>,
}

impl MessageChannel {
    /// The receiver is the backend's end of the request queue.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Invocation>) {
        let (requests, rx) = mpsc::unbounded_channel();
        let channel = Self {
            bus: Arc::new(EventBus::default()),
            requests,
        };
        (channel, rx)
    }

    pub fn publish(&self, event: Event) -> usize {
        self.bus.publish(&event)
    }

    #[cfg(test)]
    pub(crate) fn publish_raw(&self, name: &str, payload: Value) -> usize {
        self.bus.publish_raw(name, payload)
    }

    pub fn subscribe(&self, name: &'static str) -> Subscription {
        self.bus.subscribe(name)
    }

    pub fn for_window(&self, label: impl Into<WindowLabel>) -> WindowContext {
        WindowContext {
            label: label.into(),
            channel: self.clone(),
        }
    }
}

/// A window's view of the channel: every request it sends is stamped with its
/// label.
#[derive(Clone)]
pub struct WindowContext {
    label: WindowLabel,
    channel: MessageChannel,
}

impl WindowContext {
    pub fn label(&self) -> &WindowLabel {
        &self.label
    }

    /// Queues the request and returns immediately.
    pub fn dispatch(&self, request: Request) {
        tracing::debug!(window = %self.label, request = request.name(), "dispatch");
        let invocation = Invocation::fire_and_forget(self.label.clone(), request);
        if let Err(mpsc::error::SendError(invocation)) = self.channel.requests.send(invocation) {
            report_unhandled(
                &self.label,
                invocation.request.name(),
                &InvokeError::Unreachable,
            );
        }
    }

    pub async fn invoke(&self, request: Request) -> InvokeResult {
        tracing::debug!(window = %self.label, request = request.name(), "invoke");
        let (invocation, reply) = Invocation::new(self.label.clone(), request);
        self.channel
            .requests
            .send(invocation)
            .map_err(|_| InvokeError::Unreachable)?;
        reply.await.map_err(|_| InvokeError::Unreachable)?
    }

    pub fn publish(&self, event: Event) -> usize {
        self.channel.publish(event)
    }

    pub fn subscribe(&self, name: &'static str) -> Subscription {
        self.channel.subscribe(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::{COMMANDS, UPDATE_COMMAND};
    use crate::domain::models::{CommandEntry, WindowRole};
    use serde_json::json;

    #[tokio::test]
    async fn test_same_event_is_fifo_per_subscriber() {
        let (channel, _requests) = MessageChannel::new();
        let mut first = channel.subscribe(UPDATE_COMMAND);
        let mut second = channel.subscribe(UPDATE_COMMAND);

        for text in ["a", "b", "c"] {
            assert_eq!(channel.publish(Event::UpdateCommand(text.to_string())), 2);
        }

        for sub in [&mut first, &mut second] {
            for text in ["a", "b", "c"] {
                assert_eq!(sub.recv().await, Some(Event::UpdateCommand(text.to_string())));
            }
        }
    }

    #[tokio::test]
    async fn test_publish_before_subscribe_is_lost() {
        let (channel, _requests) = MessageChannel::new();
        assert_eq!(channel.publish(Event::UpdateCommand("early".to_string())), 0);

        let mut sub = channel.subscribe(UPDATE_COMMAND);
        channel.publish(Event::UpdateCommand("late".to_string()));
        assert_eq!(sub.recv().await, Some(Event::UpdateCommand("late".to_string())));
    }

    #[tokio::test]
    async fn test_dropped_subscribers_are_pruned() {
        let (channel, _requests) = MessageChannel::new();
        let sub = channel.subscribe(UPDATE_COMMAND);
        let _kept = channel.subscribe(UPDATE_COMMAND);
        drop(sub);
        assert_eq!(channel.publish(Event::UpdateCommand("x".to_string())), 1);
    }

    #[tokio::test]
    async fn test_undecodable_payload_is_skipped() {
        let (channel, _requests) = MessageChannel::new();
        let mut sub = channel.subscribe(UPDATE_COMMAND);
        channel.publish_raw(UPDATE_COMMAND, json!({"not": "a string"}));
        channel.publish_raw(UPDATE_COMMAND, json!("pwd"));
        assert_eq!(sub.recv().await, Some(Event::UpdateCommand("pwd".to_string())));
    }

    #[tokio::test]
    async fn test_commands_payload_is_decoded_at_the_boundary() {
        let (channel, _requests) = MessageChannel::new();
        let mut sub = channel.subscribe(COMMANDS);
        channel.publish_raw(COMMANDS, json!(null));
        channel.publish_raw(COMMANDS, json!([{"title": "A", "command": "ls"}]));
        assert_eq!(sub.recv().await, Some(Event::Commands(vec![])));
        assert_eq!(
            sub.recv().await,
            Some(Event::Commands(vec![CommandEntry::new("A", "ls")]))
        );
    }

    #[tokio::test]
    async fn test_dispatch_preserves_issue_order_and_origin() {
        let (channel, mut requests) = MessageChannel::new();
        let ctx = channel.for_window(WindowRole::List);
        ctx.dispatch(Request::ReadCommands);
        ctx.dispatch(Request::MoveWindowToBottomRight);

        let first = requests.recv().await.unwrap();
        assert_eq!(first.origin, WindowLabel::new("main"));
        assert_eq!(first.request, Request::ReadCommands);
        assert!(!first.is_awaited());
        assert_eq!(
            requests.recv().await.unwrap().request,
            Request::MoveWindowToBottomRight
        );
    }

    #[tokio::test]
    async fn test_invoke_resolves_with_backend_reply() {
        let (channel, mut requests) = MessageChannel::new();
        let ctx = channel.for_window(WindowRole::Confirmation);

        let backend = tokio::spawn(async move {
            let invocation = requests.recv().await.unwrap();
            assert!(invocation.is_awaited());
            invocation.respond(Err(InvokeError::Failed {
                operation: "run_command",
                message: "boom".to_string(),
            }));
        });

        let result = ctx
            .invoke(Request::RunCommand {
                args: "false".to_string(),
            })
            .await;
        assert!(matches!(result, Err(InvokeError::Failed { .. })));
        backend.await.unwrap();
    }

    #[tokio::test]
    async fn test_invoke_without_backend_is_unreachable() {
        let (channel, requests) = MessageChannel::new();
        drop(requests);
        let ctx = channel.for_window(WindowRole::List);
        assert_eq!(
            ctx.invoke(Request::ReadCommands).await,
            Err(InvokeError::Unreachable)
        );
        // Fire-and-forget never surfaces the failure to the caller
        ctx.dispatch(Request::ReadCommands);
    }

    #[tokio::test]
    async fn test_dropped_reply_is_unreachable() {
        let (channel, mut requests) = MessageChannel::new();
        let ctx = channel.for_window(WindowRole::List);
        let backend = tokio::spawn(async move {
            drop(requests.recv().await);
        });
        assert_eq!(
            ctx.invoke(Request::ReadCommands).await,
            Err(InvokeError::Unreachable)
        );
        backend.await.unwrap();
    }
}
