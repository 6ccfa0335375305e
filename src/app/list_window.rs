use crate::app::channel::WindowContext;
use crate::config::ListLayout;
use crate::domain::events::{self, Event};
use crate::domain::models::{CommandEntry, WindowGeometry};
use crate::domain::request::Request;
use crate::domain::view::ListView;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometrySync {
    Stable,
    Resized(WindowGeometry),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListInput {
    Click(usize),
}

/// Controller of the persistent window listing saved commands.
pub struct ListWindow<V: ListView> {
    ctx: WindowContext,
    view: V,
    layout: ListLayout,
    last_height: f64,
}

impl<V: ListView> ListWindow<V> {
    pub fn new(ctx: WindowContext, view: V, layout: ListLayout) -> Self {
        Self {
            ctx,
            view,
            layout,
            last_height: 0.0,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Asks for the list. It arrives later as a `commands` event.
    pub fn load(&self) {
        self.ctx.dispatch(Request::ReadCommands);
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Commands(list) => {
                self.render(&list);
            }
            Event::OpenAddCommand => self.open_add_command(),
            Event::ConfirmationWindowLoaded(_) | Event::UpdateCommand(_) => {}
        }
    }

    /// Replaces every rendered entry, then re-pins the window geometry.
    pub fn render(&mut self, commands: &[CommandEntry]) -> GeometrySync {
        self.view.clear();
        for entry in commands {
            self.view.append(entry);
        }
        self.sync_geometry()
    }

    /// Returns false when there is no entry at `index`.
    pub fn click(&self, index: usize) -> bool {
        let Some(command) = self.view.command_at(index) else {
            return false;
        };
        self.ctx.dispatch(Request::OpenConfirmationWindow { command });
        true
    }

    pub fn open_add_command(&self) {
        self.ctx.dispatch(Request::OpenAddCommandWindow);
    }

    fn sync_geometry(&mut self) -> GeometrySync {
        let height = self.view.content_height() + self.layout.margin;
        if (height - self.last_height).abs() <= self.layout.deadband {
            return GeometrySync::Stable;
        }
        self.last_height = height;

        let geometry = WindowGeometry::new(self.layout.width, height);
        // Two separate requests; the window may show at the old position briefly.
        self.ctx.dispatch(Request::resize(geometry));
        self.ctx.dispatch(Request::MoveWindowToBottomRight);
        GeometrySync::Resized(geometry)
    }

    pub async fn run(mut self, mut input: mpsc::Receiver<ListInput>) {
        let mut commands = self.ctx.subscribe(events::COMMANDS);
        let mut open_add_command = self.ctx.subscribe(events::OPEN_ADD_COMMAND);
        self.load();

        loop {
            tokio::select! {
                biased;

                Some(event) = commands.recv() => self.handle_event(event),
                Some(event) = open_add_command.recv() => self.handle_event(event),
                input = input.recv() => match input {
                    Some(ListInput::Click(index)) => {
                        if !self.click(index) {
                            tracing::debug!(index, "click on missing entry");
                        }
                    }
                    None => break,
                },
            }
        }
        tracing::debug!(window = %self.ctx.label(), "list window loop finished");
    }
}
