// Console lines stand in for mouse clicks, form submits and the global hotkey.

#[derive(Debug, Clone, PartialEq)]
pub enum UserInput {
    ShowList,
    ShowWindows,
    Click(usize), // zero-based
    PressAddCommandHotkey,
    Submit { title: String, command: String },
    Yes,
    No,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub const HELP: &str = "\
commands:
  list                      show the list window
  click N                   click entry N (1-based) to confirm and run it
  hotkey                    press the add-command hotkey (F2)
  submit TITLE | COMMAND    submit the add-command form
  yes / no                  answer the confirmation window
  windows                   show open windows and their geometry
  help                      this text
  quit                      exit";

pub fn parse_line(line: &str) -> UserInput {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" => UserInput::Empty,
        "list" | "ls" => UserInput::ShowList,
        "windows" | "w" => UserInput::ShowWindows,
        "click" | "c" => match rest.parse::<usize>() {
            Ok(n) if n >= 1 => UserInput::Click(n - 1),
            _ => UserInput::Invalid(format!("expected an entry number, got '{rest}'")),
        },
        "hotkey" | "f2" | "add" => UserInput::PressAddCommandHotkey,
        "submit" | "s" => match rest.split_once('|') {
            Some((title, command)) => UserInput::Submit {
                title: title.trim().to_string(),
                command: command.trim().to_string(),
            },
            None => UserInput::Invalid("expected TITLE | COMMAND".to_string()),
        },
        "yes" | "y" => UserInput::Yes,
        "no" | "n" => UserInput::No,
        "help" | "?" => UserInput::Help,
        "quit" | "q" | "exit" => UserInput::Quit,
        other => UserInput::Invalid(format!("unknown command '{other}'")),
    }
}
