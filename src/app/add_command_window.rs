use crate::app::channel::WindowContext;
use crate::domain::request::Request;
use crate::domain::view::CommandForm;
use tokio::sync::mpsc;

#[derive(Debug, Default)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Debug)]
pub enum AddCommandInput {
    Submit(SubmitEvent),
}

pub struct AddCommandWindow<F: CommandForm> {
    ctx: WindowContext,
    form: F,
}

impl<F: CommandForm> AddCommandWindow<F> {
    pub fn new(ctx: WindowContext, form: F) -> Self {
        Self { ctx, form }
    }

    // Nothing here waits on the backend: the refresh can overtake the write.
    pub fn submit(&self, event: &mut SubmitEvent) {
        event.prevent_default();

        let title = self.form.title().unwrap_or_default();
        let command = self.form.command().unwrap_or_default();

        self.ctx.dispatch(Request::WriteCommands { title, command });
        self.ctx.dispatch(Request::CloseWindow);
        self.ctx.dispatch(Request::ReadCommands);
    }

    pub async fn run(self, mut input: mpsc::Receiver<AddCommandInput>) {
        while let Some(input) = input.recv().await {
            match input {
                AddCommandInput::Submit(mut event) => self.submit(&mut event),
            }
        }
        tracing::debug!(window = %self.ctx.label(), "add-command window loop finished");
    }
}
