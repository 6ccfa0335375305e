//! Window host: creates, sizes, positions and destroys the three windows on a
//! virtual screen, spawning each window's controller loop.

use crate::app::add_command_window::{AddCommandInput, AddCommandWindow, SubmitEvent};
use crate::app::channel::{MessageChannel, Subscription};
use crate::app::confirmation_window::{ConfirmationInput, ConfirmationWindow};
use crate::app::list_window::{ListInput, ListWindow};
use crate::config::Config;
use crate::domain::events::{self, Event};
use crate::domain::models::{PendingCommand, Position, WindowGeometry, WindowLabel, WindowRole};
use crate::domain::view::ConfirmationView;
use crate::error::{InvokeError, InvokeResult};
use crate::infrastructure::headless::{
    HeadlessConfirmation, HeadlessForm, HeadlessList, RenderedEntry,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const INPUT_QUEUE: usize = 16;

enum Surface {
    List {
        view: HeadlessList,
        input: mpsc::Sender<ListInput>,
    },
    AddCommand {
        form: HeadlessForm,
        input: mpsc::Sender<AddCommandInput>,
    },
    Confirmation {
        view: HeadlessConfirmation,
        input: mpsc::Sender<ConfirmationInput>,
        injector: JoinHandle<()>,
    },
}

struct WindowRecord {
    role: WindowRole,
    size: WindowGeometry,
    position: Position,
    surface: Surface,
}

impl Drop for WindowRecord {
    fn drop(&mut self) {
        // The pending command dies with its window
        if let Surface::Confirmation { injector, .. } = &self.surface {
            injector.abort();
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowSnapshot {
    pub label: WindowLabel,
    pub role: WindowRole,
    pub size: WindowGeometry,
    pub position: Position,
}

#[derive(Default)]
struct DesktopState {
    windows: HashMap<WindowLabel, WindowRecord>,
    tasks: Vec<JoinHandle<()>>,
}

impl DesktopState {
    fn track(&mut self, task: JoinHandle<()>) {
        self.tasks.retain(|t| !t.is_finished());
        self.tasks.push(task);
    }
}

#[derive(Clone)]
pub struct Desktop {
    state: Arc<Mutex<DesktopState>>,
    channel: MessageChannel,
    config: Arc<Config>,
}

impl Desktop {
    pub fn new(channel: MessageChannel, config: Arc<Config>) -> Self {
        Self {
            state: Arc::default(),
            channel,
            config,
        }
    }

    fn state(&self) -> MutexGuard<'_, DesktopState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn centered(&self, size: WindowGeometry) -> Position {
        let screen = &self.config.screen;
        Position {
            x: (screen.width - size.width.round() as i32) / 2,
            y: (screen.height - size.height.round() as i32) / 2,
        }
    }

    fn bottom_right(&self, size: WindowGeometry) -> Position {
        let screen = &self.config.screen;
        Position {
            x: screen.width - size.width.round() as i32 + screen.offset_x,
            y: screen.height - size.height.round() as i32 + screen.offset_y,
        }
    }

    pub fn open_list_window(&self) -> InvokeResult {
        let label = WindowLabel::from(WindowRole::List);
        let mut state = self.state();
        if state.windows.contains_key(&label) {
            return Err(InvokeError::WindowExists(label));
        }

        let layout = self.config.list_window;
        let view = HeadlessList::new(layout.row_height, layout.padding);
        let (input, rx) = mpsc::channel(INPUT_QUEUE);
        let window = ListWindow::new(self.channel.for_window(label.clone()), view.clone(), layout);
        state.track(tokio::spawn(window.run(rx)));

        let size = WindowGeometry::new(layout.width, layout.margin);
        let record = WindowRecord {
            role: WindowRole::List,
            size,
            position: self.bottom_right(size),
            surface: Surface::List { view, input },
        };
        state.windows.insert(label.clone(), record);
        tracing::info!(window = %label, "window opened");
        Ok(())
    }

    pub fn open_add_command_window(&self) -> InvokeResult {
        let label = WindowLabel::from(WindowRole::AddCommand);
        let mut state = self.state();
        if state.windows.contains_key(&label) {
            return Err(InvokeError::WindowExists(label));
        }

        let form = HeadlessForm::new();
        let (input, rx) = mpsc::channel(INPUT_QUEUE);
        let window = AddCommandWindow::new(self.channel.for_window(label.clone()), form.clone());
        state.track(tokio::spawn(window.run(rx)));

        let size = self.config.add_command_window;
        let record = WindowRecord {
            role: WindowRole::AddCommand,
            size,
            position: self.centered(size),
            surface: Surface::AddCommand { form, input },
        };
        state.windows.insert(label.clone(), record);
        tracing::info!(window = %label, "window opened");
        Ok(())
    }

    /// Opens the dialog and holds `command` until the dialog reports it has
    /// loaded. A second dialog is refused while one is open.
    pub fn open_confirmation_window(&self, command: String) -> InvokeResult {
        let label = WindowLabel::from(WindowRole::Confirmation);
        let mut state = self.state();
        if state.windows.contains_key(&label) {
            return Err(InvokeError::WindowExists(label));
        }

        // Subscribed before the window exists so its readiness cannot be missed
        let ready = self.channel.subscribe(events::CONFIRMATION_WINDOW_LOADED);
        let injector = tokio::spawn(inject_when_ready(
            ready,
            PendingCommand::new(command),
            self.channel.clone(),
        ));

        let view = HeadlessConfirmation::mounted();
        let (input, rx) = mpsc::channel(INPUT_QUEUE);
        let window = ConfirmationWindow::new(self.channel.for_window(label.clone()), view.clone());
        state.track(tokio::spawn(window.run(rx)));

        let size = self.config.confirmation_window;
        let record = WindowRecord {
            role: WindowRole::Confirmation,
            size,
            position: self.centered(size),
            surface: Surface::Confirmation {
                view,
                input,
                injector,
            },
        };
        state.windows.insert(label.clone(), record);
        tracing::info!(window = %label, "window opened");
        Ok(())
    }

    pub fn resize(&self, label: &WindowLabel, size: WindowGeometry) -> InvokeResult {
        let mut state = self.state();
        let record = state
            .windows
            .get_mut(label)
            .ok_or_else(|| InvokeError::WindowNotFound(label.clone()))?;
        record.size = size;
        Ok(())
    }

    pub fn move_to_bottom_right(&self, label: &WindowLabel) -> InvokeResult {
        let mut state = self.state();
        let record = state
            .windows
            .get_mut(label)
            .ok_or_else(|| InvokeError::WindowNotFound(label.clone()))?;
        record.position = self.bottom_right(record.size);
        Ok(())
    }

    /// Destroys the window. Dropping its input queue ends its loop.
    pub fn close(&self, label: &WindowLabel) -> InvokeResult {
        let record = self
            .state()
            .windows
            .remove(label)
            .ok_or_else(|| InvokeError::WindowNotFound(label.clone()))?;
        tracing::info!(window = %label, role = ?record.role, "window closed");
        Ok(())
    }

    /// The add-command hotkey: broadcast, the list window decides what to do.
    pub fn press_add_command_hotkey(&self) {
        self.channel.publish(Event::OpenAddCommand);
    }

    pub fn click(&self, index: usize) -> bool {
        let state = self.state();
        match state.windows.get(&WindowLabel::from(WindowRole::List)) {
            Some(WindowRecord {
                surface: Surface::List { input, .. },
                ..
            }) => send_input(input, ListInput::Click(index)),
            _ => false,
        }
    }

    pub fn submit_add_command(&self, title: &str, command: &str) -> bool {
        let state = self.state();
        match state.windows.get(&WindowLabel::from(WindowRole::AddCommand)) {
            Some(WindowRecord {
                surface: Surface::AddCommand { form, input },
                ..
            }) => {
                form.fill(title, command);
                send_input(input, AddCommandInput::Submit(SubmitEvent::default()))
            }
            _ => false,
        }
    }

    pub fn approve(&self) -> bool {
        self.send_decision(ConfirmationInput::Yes)
    }

    pub fn decline(&self) -> bool {
        self.send_decision(ConfirmationInput::No)
    }

    fn send_decision(&self, decision: ConfirmationInput) -> bool {
        let state = self.state();
        match state.windows.get(&WindowLabel::from(WindowRole::Confirmation)) {
            Some(WindowRecord {
                surface: Surface::Confirmation { input, .. },
                ..
            }) => send_input(input, decision),
            _ => false,
        }
    }

    pub fn list_entries(&self) -> Vec<RenderedEntry> {
        let state = self.state();
        match state.windows.get(&WindowLabel::from(WindowRole::List)) {
            Some(WindowRecord {
                surface: Surface::List { view, .. },
                ..
            }) => view.entries(),
            _ => Vec::new(),
        }
    }

    pub fn confirmation_text(&self) -> Option<String> {
        let state = self.state();
        match state.windows.get(&WindowLabel::from(WindowRole::Confirmation)) {
            Some(WindowRecord {
                surface: Surface::Confirmation { view, .. },
                ..
            }) => view.command_text(),
            _ => None,
        }
    }

    pub fn window(&self, label: &WindowLabel) -> Option<WindowSnapshot> {
        self.state().windows.get(label).map(|record| WindowSnapshot {
            label: label.clone(),
            role: record.role,
            size: record.size,
            position: record.position,
        })
    }

    pub fn windows(&self) -> Vec<WindowSnapshot> {
        let labels: Vec<WindowLabel> = self.state().windows.keys().cloned().collect();
        let mut snapshots: Vec<_> = labels.iter().filter_map(|l| self.window(l)).collect();
        snapshots.sort_by(|a, b| a.label.cmp(&b.label));
        snapshots
    }

    /// Closes every window and waits for their loops to finish.
    pub async fn shutdown(&self) {
        let tasks = {
            let mut state = self.state();
            state.windows.clear();
            std::mem::take(&mut state.tasks)
        };
        for result in futures::future::join_all(tasks).await {
            if let Err(e) = result {
                tracing::warn!(error = %e, "window task failed");
            }
        }
    }
}

fn send_input<T>(input: &mpsc::Sender<T>, value: T) -> bool {
    match input.try_send(value) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "window input dropped");
            false
        }
    }
}

async fn inject_when_ready(
    mut ready: Subscription,
    mut pending: PendingCommand,
    channel: MessageChannel,
) {
    while let Some(event) = ready.recv().await {
        let Event::ConfirmationWindowLoaded(tag) = event else {
            continue;
        };
        if tag != WindowRole::Confirmation.label() {
            continue;
        }
        if let Some(command) = pending.take() {
            channel.publish(Event::UpdateCommand(command));
        }
        break;
    }
}
