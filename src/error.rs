//! Error taxonomy shared by the tokenizer, the builtins and the pipeline engine.
//!
//! Every error aborts only the command that produced it; the read-eval loop
//! reports it on standard error and carries on.

use crate::command::{EXIT_NOT_FOUND, ExitCode};
use std::io;

/// Broad class of a [`ShellError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input or a failed lookup the user asked for.
    User,
    /// A policy limit (stack depth, argument count, alias count) would be exceeded.
    ResourceLimit,
    /// A system call failed.
    Os,
    /// An external command could not be executed.
    ExecNotFound,
}

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("empty input")]
    EmptyInput,

    #[error("syntax error: empty command in pipeline")]
    MalformedPipeline,

    #[error("{command}: {message}")]
    Usage {
        command: &'static str,
        message: String,
    },

    #[error("{command}: {name}: not found")]
    AliasNotFound { command: &'static str, name: String },

    #[error("{0}: event not found")]
    EventNotFound(String),

    #[error("{0}: argument contains a NUL byte")]
    NulArgument(String),

    #[error("{command}: {resource} full (limit {limit})")]
    ResourceLimit {
        command: String,
        resource: &'static str,
        limit: usize,
    },

    #[error("{context}: {source}")]
    Os {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("{0}: command not found")]
    ExecNotFound(String),
}

impl ShellError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShellError::EmptyInput
            | ShellError::MalformedPipeline
            | ShellError::Usage { .. }
            | ShellError::AliasNotFound { .. }
            | ShellError::EventNotFound(_)
            | ShellError::NulArgument(_) => ErrorKind::User,
            ShellError::ResourceLimit { .. } => ErrorKind::ResourceLimit,
            ShellError::Os { .. } => ErrorKind::Os,
            ShellError::ExecNotFound(_) => ErrorKind::ExecNotFound,
        }
    }

    /// Status reported for a command that failed with this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            ShellError::ExecNotFound(_) => EXIT_NOT_FOUND,
            _ => 1,
        }
    }

    pub(crate) fn usage(command: &'static str, message: impl Into<String>) -> Self {
        ShellError::Usage {
            command,
            message: message.into(),
        }
    }

    /// Wrap an OS failure, `context` naming the operation (e.g. `"cd: /tmp/x"` or `"fork"`).
    pub(crate) fn os(context: impl Into<String>, source: impl Into<io::Error>) -> Self {
        ShellError::Os {
            context: context.into(),
            source: source.into(),
        }
    }
}

/// Failures while writing command output (e.g. a closed pipe downstream).
impl From<io::Error> for ShellError {
    fn from(source: io::Error) -> Self {
        ShellError::os("write error", source)
    }
}

pub type Result<T> = std::result::Result<T, ShellError>;
