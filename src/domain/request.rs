use crate::domain::models::WindowGeometry;

// Requests a window can send to the backend. Window-scoped requests act on the
// window that issued them.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    ReadCommands,                                // triggers a later `commands` broadcast
    WriteCommands { title: String, command: String },
    RunCommand { args: String },
    OpenConfirmationWindow { command: String },
    OpenAddCommandWindow,
    ResizeWindow { width: f64, height: f64 },
    MoveWindowToBottomRight,
    CloseWindow,
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Request::ReadCommands => "read_commands",
            Request::WriteCommands { .. } => "write_commands",
            Request::RunCommand { .. } => "run_command",
            Request::OpenConfirmationWindow { .. } => "open_confirmation_window",
            Request::OpenAddCommandWindow => "open_add_command_window",
            Request::ResizeWindow { .. } => "resize_window",
            Request::MoveWindowToBottomRight => "move_window_to_bottom_right",
            Request::CloseWindow => "close_window",
        }
    }

    pub fn resize(geometry: WindowGeometry) -> Self {
        Request::ResizeWindow {
            width: geometry.width,
            height: geometry.height,
        }
    }
}
