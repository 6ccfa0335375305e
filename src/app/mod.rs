pub mod add_command_window;
pub mod backend;
pub mod channel;
pub mod confirmation_window;
pub mod desktop;
pub mod input;
pub mod list_window;
pub mod r#loop;
