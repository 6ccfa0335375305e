pub mod headless;
pub mod json_registry;
pub mod notifier;
pub mod shell_runner;
pub mod watcher;
