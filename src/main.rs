use anyhow::Result;
use std::sync::Arc;

use command_launcher::app::backend::Backend;
use command_launcher::app::channel::MessageChannel;
use command_launcher::app::desktop::Desktop;
use command_launcher::app::r#loop::run_loop;
use command_launcher::config::Config;
use command_launcher::infrastructure::{
    json_registry::JsonFileRegistry, notifier::ConsoleNotifier, shell_runner::ShellRunner,
    watcher,
};
use command_launcher::logging;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let config = Arc::new(Config::load());
    let (channel, requests) = MessageChannel::new();
    let desktop = Desktop::new(channel.clone(), config.clone());
    let backend = Backend::new(
        Arc::new(JsonFileRegistry::new(&config.registry_path)),
        Arc::new(ShellRunner::from_config(&config.shell)),
        Arc::new(ConsoleNotifier),
        desktop.clone(),
        channel.clone(),
    );
    tokio::spawn(backend.serve(requests));

    // Dropping the watcher stops it, so hold it for the whole session
    let _watcher = if config.watch_registry {
        match watcher::watch_registry(&config.registry_path, channel.clone()) {
            Ok(w) => Some(w),
            Err(e) => {
                tracing::warn!(error = %e, "registry watcher disabled");
                None
            }
        }
    } else {
        None
    };

    desktop.open_list_window()?;
    let res = run_loop(desktop.clone()).await;
    desktop.shutdown().await;

    if let Err(err) = res {
        tracing::error!(error = ?err, "console loop failed");
        return Err(err);
    }
    Ok(())
}
