use crate::app::channel::MessageChannel;
use crate::domain::models::WindowLabel;
use crate::domain::request::Request;
use anyhow::{Context, Result};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

const DEBOUNCE: Duration = Duration::from_millis(500);

pub const WATCHER_LABEL: &str = "registry-watcher";

/// Re-broadcasts the list when the registry file changes on disk. The returned
/// watcher must be kept alive.
pub fn watch_registry(path: &Path, channel: MessageChannel) -> Result<RecommendedWatcher> {
    let file_name = path.file_name().map(|n| n.to_os_string());
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let (notify_tx, notify_rx) = mpsc::channel(1);
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        let Ok(event) = res else { return };
        let touches_registry = event
            .paths
            .iter()
            .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
        if touches_registry {
            let _ = notify_tx.try_send(());
        }
    })?;
    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("watching {}", dir.display()))?;

    tokio::spawn(debounce(notify_rx, channel));
    Ok(watcher)
}

async fn debounce(mut notify_rx: mpsc::Receiver<()>, channel: MessageChannel) {
    let ctx = channel.for_window(WindowLabel::new(WATCHER_LABEL));
    let mut pending = false;

    loop {
        if pending {
            tokio::select! {
                Some(()) = notify_rx.recv() => {}
                () = tokio::time::sleep(DEBOUNCE) => {
                    tracing::debug!("registry changed on disk");
                    ctx.dispatch(Request::ReadCommands);
                    pending = false;
                }
            }
        } else if notify_rx.recv().await.is_some() {
            pending = true;
        } else {
            break;
        }
    }
}
