use crate::domain::models::WindowLabel;
use thiserror::Error;

/// Failure of a request/response invocation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvokeError {
    #[error("backend unreachable")]
    Unreachable,

    #[error("missing argument '{0}'")]
    MissingArgument(&'static str),

    #[error("window '{0}' already exists")]
    WindowExists(WindowLabel),

    #[error("window '{0}' not found")]
    WindowNotFound(WindowLabel),

    #[error("{operation} failed: {message}")]
    Failed {
        operation: &'static str,
        message: String,
    },
}

impl InvokeError {
    pub fn failed(operation: &'static str, err: &anyhow::Error) -> Self {
        InvokeError::Failed {
            operation,
            message: format!("{err:#}"),
        }
    }
}

pub type InvokeResult = Result<(), InvokeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_keeps_context_chain() {
        let err = anyhow::anyhow!("disk full").context("writing commands.json");
        let invoke = InvokeError::failed("write_commands", &err);
        assert_eq!(
            invoke.to_string(),
            "write_commands failed: writing commands.json: disk full"
        );
    }
}
