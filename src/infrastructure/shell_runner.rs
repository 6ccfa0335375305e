use crate::config::ShellConfig;
use crate::domain::backend::CommandRunner;
use crate::domain::models::RunOutcome;
use anyhow::{Context, Result};
use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use tokio::process::Command;

pub struct ShellRunner {
    program: String,
    args: Vec<String>,
    encoding: &'static Encoding,
}

impl ShellRunner {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            encoding: UTF_8,
        }
    }

    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn from_config(config: &ShellConfig) -> Self {
        let encoding = Encoding::for_label(config.output_encoding.as_bytes()).unwrap_or_else(|| {
            tracing::warn!(label = %config.output_encoding, "unknown output encoding, using utf-8");
            UTF_8
        });
        Self::new(config.program.clone(), config.args.clone()).with_encoding(encoding)
    }

    fn decode(&self, bytes: &[u8]) -> String {
        let (text, _, had_errors) = self.encoding.decode(bytes);
        if had_errors {
            tracing::debug!(encoding = self.encoding.name(), "output had undecodable bytes");
        }
        text.into_owned()
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> Result<RunOutcome> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(command)
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("spawning {}", self.program))?;

        Ok(RunOutcome {
            success: output.status.success(),
            stdout: self.decode(&output.stdout),
            stderr: self.decode(&output.stderr),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::SHIFT_JIS;

    #[test]
    fn test_decodes_configured_encoding() {
        let config = ShellConfig {
            output_encoding: "shift_jis".to_string(),
            ..ShellConfig::default()
        };
        let runner = ShellRunner::from_config(&config);
        assert_eq!(runner.encoding, SHIFT_JIS);
        assert_eq!(runner.decode(&[0x82, 0xA0]), "あ");
    }

    #[test]
    fn test_unknown_encoding_falls_back_to_utf8() {
        let config = ShellConfig {
            output_encoding: "klingon".to_string(),
            ..ShellConfig::default()
        };
        let runner = ShellRunner::from_config(&config);
        assert_eq!(runner.encoding, UTF_8);
        assert_eq!(runner.decode("héllo".as_bytes()), "héllo");
    }
}

#[cfg(all(test, unix))]
mod process_tests {
    use super::*;

    fn sh() -> ShellRunner {
        ShellRunner::from_config(&ShellConfig::default())
    }

    #[tokio::test]
    async fn test_captures_stdout() {
        let outcome = sh().run("echo hi").await.unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.stdout, "hi\n");
    }

    #[tokio::test]
    async fn test_failure_is_an_outcome_not_an_error() {
        let outcome = sh().run("echo nope >&2; exit 3").await.unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.stderr, "nope\n");
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let runner = ShellRunner::new("definitely-not-a-shell-4242", vec![]);
        assert!(runner.run("ls").await.is_err());
    }
}
