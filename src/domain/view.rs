//! Rendering primitives each window controller drives. Implementations own the
//! actual widgets; controllers only see these operations.

use crate::domain::models::CommandEntry;

pub trait ListView: Send + 'static {
    fn clear(&mut self);

    /// Appends one rendered entry showing the title, tagged with the command.
    fn append(&mut self, entry: &CommandEntry);

    /// Command tag of the rendered entry at `index`, if there is one.
    fn command_at(&self, index: usize) -> Option<String>;

    fn content_height(&self) -> f64;
}

pub trait ConfirmationView: Send + 'static {
    /// `None` when the command element does not exist.
    fn command_text(&self) -> Option<String>;

    /// Returns false when the command element does not exist.
    fn set_command_text(&mut self, text: &str) -> bool;
}

pub trait CommandForm: Send + 'static {
    fn title(&self) -> Option<String>;
    fn command(&self) -> Option<String>;
}
