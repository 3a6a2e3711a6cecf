use std::process::ExitCode;

use thiserror::Error;

/// Everything that can abort a pipeline run.
///
/// Field-level extraction misses are not represented here: a missing
/// `text` or `author` element degrades to an empty string.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Unreachable host, refused connection, timeout, or a broken body stream.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("failed response code {status} from {url}")]
    Fetch { status: u16, url: String },

    #[error("unreadable document: {0}")]
    Parse(String),

    #[error("invalid {field} selector `{selector}`: {reason}")]
    Selector {
        field: &'static str,
        selector: String,
        reason: String,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to write records: {0}")]
    Emit(#[source] std::io::Error),

    #[error("failed to read input: {0}")]
    Input(#[source] std::io::Error),
}

impl PipelineError {
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }

    fn code(&self) -> u8 {
        match self {
            PipelineError::Fetch { .. } => 1,
            PipelineError::Network(_) | PipelineError::Input(_) => 2,
            PipelineError::Parse(_) => 3,
            PipelineError::Selector { .. } | PipelineError::Config(_) => 4,
            PipelineError::Emit(_) => 5,
        }
    }
}
