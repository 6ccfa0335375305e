use crate::domain::models::WindowGeometry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub registry_path: PathBuf,
    pub watch_registry: bool,
    pub shell: ShellConfig,
    pub list_window: ListLayout,
    pub screen: ScreenConfig,
    pub add_command_window: WindowGeometry,
    pub confirmation_window: WindowGeometry,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_path: PathBuf::from("commands.json"),
            watch_registry: true,
            shell: ShellConfig::default(),
            list_window: ListLayout::default(),
            screen: ScreenConfig::default(),
            add_command_window: WindowGeometry::new(700.0, 250.0),
            confirmation_window: WindowGeometry::new(600.0, 160.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShellConfig {
    pub program: String,
    pub args: Vec<String>,
    // WHATWG label, e.g. "shift_jis" for a Japanese Windows console
    pub output_encoding: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        if cfg!(windows) {
            Self {
                program: "powershell.exe".to_string(),
                args: vec!["-Command".to_string()],
                output_encoding: "shift_jis".to_string(),
            }
        } else {
            Self {
                program: "sh".to_string(),
                args: vec!["-c".to_string()],
                output_encoding: "utf-8".to_string(),
            }
        }
    }
}

/// Geometry rules for the persistent list window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListLayout {
    pub width: f64,
    pub margin: f64,
    // Height changes at or below this are layout jitter, not a resize.
    pub deadband: f64,
    pub row_height: f64,
    pub padding: f64,
}

impl Default for ListLayout {
    fn default() -> Self {
        Self {
            width: 200.0,
            margin: 25.0,
            deadband: 1.0,
            row_height: 24.0,
            padding: 16.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: i32,
    pub height: i32,
    // Corner adjustment for window borders and the taskbar
    pub offset_x: i32,
    pub offset_y: i32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            offset_x: 7,
            offset_y: -41,
        }
    }
}

impl Config {
    pub fn config_path() -> Option<PathBuf> {
        home::home_dir().map(|mut path| {
            path.push(".config");
            path.push("command-launcher");
            path.push("config.toml");
            path
        })
    }

    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            registry_path = "/tmp/shortcuts.json"

            [list_window]
            width = 240.0
            "#,
        )
        .unwrap();

        assert_eq!(config.registry_path, PathBuf::from("/tmp/shortcuts.json"));
        assert_eq!(config.list_window.width, 240.0);
        assert_eq!(config.list_window.margin, 25.0);
        assert_eq!(config.list_window.deadband, 1.0);
        assert_eq!(config.screen, ScreenConfig::default());
        assert!(config.watch_registry);
    }

    #[test]
    fn test_shell_encoding_can_be_overridden() {
        let config: Config = toml::from_str(
            r#"
            [shell]
            output_encoding = "shift_jis"
            "#,
        )
        .unwrap();
        assert_eq!(config.shell.output_encoding, "shift_jis");
        assert_eq!(config.shell.program, ShellConfig::default().program);
    }

    #[test]
    fn test_load_from_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "registry_path = [").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = Config::default();
        let text = toml::to_string(&config).unwrap();
        assert_eq!(toml::from_str::<Config>(&text).unwrap(), config);
    }
}
