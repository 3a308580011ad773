use crate::alias::resolve_alias;
use crate::builtin::Builtin;
use crate::error::{Result, ShellError};
use crate::session::Session;
use crate::wildcard::expand_wildcards;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// Status of a child whose program could not be executed.
pub const EXIT_NOT_FOUND: ExitCode = 127;

/// Where a resolved stage runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Builtin(Builtin),
    External,
}

/// One command of a pipeline after alias and wildcard expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub argv: Vec<String>,
    pub kind: CommandKind,
}

impl Stage {
    pub fn name(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> Vec<&str> {
        self.argv[1..].iter().map(String::as_str).collect()
    }
}

/// Turn a tokenized argument vector into a runnable [`Stage`].
///
/// Alias substitution comes first, then wildcard expansion against the
/// session's working directory, then the builtin lookup on the final
/// command word. `argv` must not be empty. An argument holding a NUL byte
/// is rejected.
pub fn resolve_stage(session: &Session, argv: Vec<String>) -> Result<Stage> {
    let argv = resolve_alias(&session.aliases, argv);
    let argv = expand_wildcards(&session.current_dir, argv, session.limits.max_args)?;
    if argv.iter().any(|arg| arg.contains('\0')) {
        return Err(ShellError::NulArgument(argv[0].clone()));
    }
    let kind = match Builtin::lookup(&argv[0]) {
        Some(builtin) => CommandKind::Builtin(builtin),
        None => CommandKind::External,
    };
    tracing::debug!(?argv, ?kind, "stage resolved");
    Ok(Stage { argv, kind })
}
