use crate::command::{ExitCode, Stage};
use crate::error::{Result, ShellError};
use crate::session::Session;
use std::process::ExitStatus;

/// Run a single external command in the foreground and wait for it.
///
/// The child inherits the interpreter's standard streams and runs in the
/// session's directory with the session's variables. A program that cannot
/// be started is reported as [`ShellError::ExecNotFound`].
pub fn run_external(stage: &Stage, session: &Session) -> Result<ExitCode> {
    let mut child = std::process::Command::new(stage.name())
        .args(&stage.argv[1..])
        .envs(session.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .current_dir(&session.current_dir)
        .spawn()
        .map_err(|e| {
            tracing::debug!(command = stage.name(), error = %e, "spawn failed");
            ShellError::ExecNotFound(stage.name().to_string())
        })?;
    tracing::debug!(command = stage.name(), pid = child.id(), "spawned");
    let exit_status = child.wait().map_err(|e| ShellError::os("wait", e))?;
    Ok(status_code(exit_status))
}

fn status_code(exit_status: ExitStatus) -> ExitCode {
    match exit_status.code() {
        Some(x) => x,
        None => terminated_by_signal(exit_status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandKind;
    use crate::config::Config;
    use crate::error::ErrorKind;
    use std::path::PathBuf;

    fn root_session() -> Session {
        Session::with_dir(Config::default(), PathBuf::from("/"), std::env::vars().collect())
    }

    fn stage(words: &[&str]) -> Stage {
        Stage {
            argv: words.iter().map(|w| w.to_string()).collect(),
            kind: CommandKind::External,
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_exit_codes_are_reported() {
        let session = root_session();
        assert_eq!(run_external(&stage(&["true"]), &session).unwrap(), 0);
        assert_eq!(run_external(&stage(&["false"]), &session).unwrap(), 1);
        assert_eq!(
            run_external(&stage(&["sh", "-c", "exit 7"]), &session).unwrap(),
            7
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_signal_death_maps_above_128() {
        let session = root_session();
        let code = run_external(&stage(&["sh", "-c", "kill -9 $$"]), &session).unwrap();
        assert_eq!(code, 128 + 9);
    }

    #[test]
    fn test_missing_program_is_exec_not_found() {
        let session = root_session();
        let err = run_external(&stage(&["mysh-no-such-program-xyz"]), &session).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExecNotFound);
        assert_eq!(err.to_string(), "mysh-no-such-program-xyz: command not found");
        assert_eq!(err.exit_code(), 127);
    }
}
