use crate::domain::models::{CommandEntry, CommandList};
use serde_json::Value;

pub const COMMANDS: &str = "commands";
pub const CONFIRMATION_WINDOW_LOADED: &str = "confirmation-window-loaded";
pub const UPDATE_COMMAND: &str = "update-command";
pub const OPEN_ADD_COMMAND: &str = "open_add_command";

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Commands(CommandList),            // backend -> list window
    ConfirmationWindowLoaded(String), // confirmation -> any, opaque tag
    UpdateCommand(String),            // any -> confirmation
    OpenAddCommand,                   // hotkey -> list window
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Commands(_) => COMMANDS,
            Event::ConfirmationWindowLoaded(_) => CONFIRMATION_WINDOW_LOADED,
            Event::UpdateCommand(_) => UPDATE_COMMAND,
            Event::OpenAddCommand => OPEN_ADD_COMMAND,
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            Event::Commands(list) => Value::Array(
                list.iter()
                    .map(|entry| {
                        serde_json::json!({ "title": entry.title, "command": entry.command })
                    })
                    .collect(),
            ),
            Event::ConfirmationWindowLoaded(tag) => Value::String(tag.clone()),
            Event::UpdateCommand(command) => Value::String(command.clone()),
            Event::OpenAddCommand => Value::Object(Default::default()),
        }
    }

    /// Shape check for an untrusted payload. `None` means the payload cannot be
    /// used for this event and should be dropped.
    pub fn decode(name: &str, payload: &Value) -> Option<Event> {
        match name {
            COMMANDS => Some(Event::Commands(decode_command_list(payload))),
            CONFIRMATION_WINDOW_LOADED => {
                let tag = match payload {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some(Event::ConfirmationWindowLoaded(tag))
            }
            UPDATE_COMMAND => payload.as_str().map(|s| Event::UpdateCommand(s.to_string())),
            OPEN_ADD_COMMAND => Some(Event::OpenAddCommand),
            _ => None,
        }
    }
}

// Anything that is not an array is an empty list. Array items that are not
// `{title, command}` objects are skipped.
fn decode_command_list(payload: &Value) -> CommandList {
    let Some(items) = payload.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<CommandEntry>(item.clone()) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed command entry");
                None
            }
        })
        .collect()
}
