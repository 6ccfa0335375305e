//! In-memory stand-ins for the window contents. Handles are cheap clones over
//! shared state so the console can read what a window currently shows.

use crate::domain::models::CommandEntry;
use crate::domain::view::{CommandForm, ConfirmationView, ListView};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEntry {
    pub text: String,
    pub data_value: String,
}

#[derive(Debug, Clone)]
pub struct HeadlessList {
    entries: Arc<Mutex<Vec<RenderedEntry>>>,
    row_height: f64,
    padding: f64,
}

impl HeadlessList {
    pub fn new(row_height: f64, padding: f64) -> Self {
        Self {
            entries: Arc::default(),
            row_height,
            padding,
        }
    }

    pub fn entries(&self) -> Vec<RenderedEntry> {
        lock(&self.entries).clone()
    }

    pub fn set_row_height(&mut self, row_height: f64) {
        self.row_height = row_height;
    }
}

impl ListView for HeadlessList {
    fn clear(&mut self) {
        lock(&self.entries).clear();
    }

    fn append(&mut self, entry: &CommandEntry) {
        lock(&self.entries).push(RenderedEntry {
            text: entry.title.clone(),
            data_value: entry.command.clone(),
        });
    }

    fn command_at(&self, index: usize) -> Option<String> {
        lock(&self.entries)
            .get(index)
            .map(|entry| entry.data_value.clone())
    }

    fn content_height(&self) -> f64 {
        self.padding + lock(&self.entries).len() as f64 * self.row_height
    }
}

/// `None` inside means the command element has not been created.
#[derive(Debug, Clone, Default)]
pub struct HeadlessConfirmation {
    command: Arc<Mutex<Option<String>>>,
}

impl HeadlessConfirmation {
    pub fn mounted() -> Self {
        Self {
            command: Arc::new(Mutex::new(Some(String::new()))),
        }
    }

    pub fn unmounted() -> Self {
        Self::default()
    }

    pub fn mount(&self) {
        lock(&self.command).get_or_insert_with(String::new);
    }
}

impl ConfirmationView for HeadlessConfirmation {
    fn command_text(&self) -> Option<String> {
        lock(&self.command).clone()
    }

    fn set_command_text(&mut self, text: &str) -> bool {
        match lock(&self.command).as_mut() {
            Some(current) => {
                *current = text.to_string();
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Default)]
struct FormFields {
    title: Option<String>,
    command: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessForm {
    fields: Arc<Mutex<FormFields>>,
}

impl HeadlessForm {
    /// Form with both inputs present and empty.
    pub fn new() -> Self {
        let form = Self::default();
        form.fill("", "");
        form
    }

    pub fn fill(&self, title: &str, command: &str) {
        let mut fields = lock(&self.fields);
        fields.title = Some(title.to_string());
        fields.command = Some(command.to_string());
    }

    pub fn remove_inputs(&self) {
        *lock(&self.fields) = FormFields::default();
    }
}

impl CommandForm for HeadlessForm {
    fn title(&self) -> Option<String> {
        lock(&self.fields).title.clone()
    }

    fn command(&self) -> Option<String> {
        lock(&self.fields).command.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_height_tracks_rows() {
        let mut list = HeadlessList::new(20.0, 10.0);
        assert_eq!(list.content_height(), 10.0);
        list.append(&CommandEntry::new("A", "ls"));
        list.append(&CommandEntry::new("B", "pwd"));
        assert_eq!(list.content_height(), 50.0);
        assert_eq!(list.command_at(1).as_deref(), Some("pwd"));
        assert_eq!(list.command_at(2), None);

        list.clear();
        assert_eq!(list.content_height(), 10.0);
    }

    #[test]
    fn test_confirmation_write_needs_element() {
        let mut view = HeadlessConfirmation::unmounted();
        assert!(!view.set_command_text("ls"));
        assert_eq!(view.command_text(), None);

        view.mount();
        assert!(view.set_command_text("ls"));
        assert_eq!(view.command_text().as_deref(), Some("ls"));

        // Mounting again keeps the content
        view.mount();
        assert_eq!(view.command_text().as_deref(), Some("ls"));
    }

    #[test]
    fn test_form_clones_share_fields() {
        let form = HeadlessForm::new();
        let handle = form.clone();
        handle.fill("T", "C");
        assert_eq!(form.title().as_deref(), Some("T"));
        assert_eq!(form.command().as_deref(), Some("C"));

        handle.remove_inputs();
        assert_eq!(form.title(), None);
    }
}
