use crate::app::desktop::Desktop;
use crate::app::input::{parse_line, UserInput, HELP};

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

pub async fn run_loop(desktop: Desktop) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    run_loop_with_events(desktop, stdin, stdout).await
}

pub async fn run_loop_with_events<R, W>(desktop: Desktop, input: R, mut out: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    out.write_all(b"command launcher ready, type 'help'\n").await?;
    out.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let reply = match parse_line(&line) {
            UserInput::Quit => break,
            UserInput::Empty => continue,
            UserInput::Help => HELP.to_string(),
            UserInput::ShowList => render_list(&desktop),
            UserInput::ShowWindows => render_windows(&desktop),
            UserInput::Click(index) => {
                if index >= desktop.list_entries().len() {
                    format!("no entry {}", index + 1)
                } else if desktop.click(index) {
                    "asking for confirmation...".to_string()
                } else {
                    "list window is not open".to_string()
                }
            }
            UserInput::PressAddCommandHotkey => {
                desktop.press_add_command_hotkey();
                "add-command hotkey pressed".to_string()
            }
            UserInput::Submit { title, command } => {
                if desktop.submit_add_command(&title, &command) {
                    format!("submitted '{title}'")
                } else {
                    "add-command window is not open (press 'hotkey' first)".to_string()
                }
            }
            UserInput::Yes => match desktop.confirmation_text() {
                Some(command) if desktop.approve() => format!("running: {command}"),
                _ => "no confirmation window open".to_string(),
            },
            UserInput::No => {
                if desktop.decline() {
                    "cancelled".to_string()
                } else {
                    "no confirmation window open".to_string()
                }
            }
            UserInput::Invalid(msg) => msg,
        };
        out.write_all(reply.as_bytes()).await?;
        out.write_all(b"\n").await?;
        out.flush().await?;
    }

    Ok(())
}

fn render_list(desktop: &Desktop) -> String {
    let entries = desktop.list_entries();
    if entries.is_empty() {
        return "(no commands saved)".to_string();
    }
    let mut text = String::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        text.push_str(&format!("{:>3}. {}", i + 1, entry.text));
    }
    if let Some(command) = desktop.confirmation_text() {
        text.push_str(&format!("\nconfirm? {command}  (yes/no)"));
    }
    text
}

fn render_windows(desktop: &Desktop) -> String {
    let windows = desktop.windows();
    if windows.is_empty() {
        return "(no windows)".to_string();
    }
    windows
        .iter()
        .map(|w| {
            format!(
                "{:<14} {:>5}x{:<5} at ({}, {})",
                w.label.to_string(),
                w.size.width,
                w.size.height,
                w.position.x,
                w.position.y
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[path = "loop_tests.rs"]
mod tests;
