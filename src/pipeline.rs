//! Turning a tokenized line into running processes.
//!
//! A line moves through `Tokenized → Expanded → Wired → Running → Reaped`.
//! A single stage is expanded in this process and, when it names a builtin,
//! runs right here against the live session. Longer pipelines are wired
//! first: one pipe between each pair of neighbouring stages, one forked
//! child per stage. Each child rewires its standard streams, closes every
//! pipe descriptor, then expands and runs its own stage.

use crate::command::{CommandKind, ExitCode, Stage, resolve_stage};
use crate::error::{Result, ShellError};
use crate::external::run_external;
use crate::session::Session;
use crate::tokenizer::Pipeline;
use nix::errno::Errno;
use nix::sys::signal::{SigHandler, Signal, signal};
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, dup2_stdin, dup2_stdout, execvp, fork, pipe};
use std::ffi::CString;
use std::io::{self, Write};
use std::os::fd::OwnedFd;
use std::process;
use tracing::debug;

/// Run one tokenized line to completion and return the status of its last stage.
///
/// The status (or the status implied by the error) is also stored in
/// [`Session::last_status`].
pub fn run_pipeline(session: &mut Session, pipeline: Pipeline) -> Result<ExitCode> {
    let result = if pipeline.is_single() {
        let argv = pipeline.into_stages().swap_remove(0);
        run_single(session, argv)
    } else {
        run_stages(session, pipeline.into_stages())
    };
    session.last_status = Some(match &result {
        Ok(code) => *code,
        Err(err) => err.exit_code(),
    });
    result
}

fn run_single(session: &mut Session, argv: Vec<String>) -> Result<ExitCode> {
    let stage = resolve_stage(session, argv)?;
    match stage.kind {
        CommandKind::Builtin(builtin) => {
            let mut stdout = io::stdout().lock();
            let code = builtin.run(&stage.args(), session, &mut stdout)?;
            stdout.flush()?;
            Ok(code)
        }
        CommandKind::External => run_external(&stage, session),
    }
}

/// Both ends of one pipe. Dropping it closes whatever ends are still held.
struct Pipe {
    read: OwnedFd,
    write: OwnedFd,
}

impl Pipe {
    fn open() -> Result<Self> {
        let (read, write) = pipe().map_err(|e| ShellError::os("pipe", e))?;
        Ok(Self { read, write })
    }
}

/// A forked stage waiting to be reaped.
struct StageProcess {
    index: usize,
    pid: Pid,
}

fn run_stages(session: &mut Session, stages: Vec<Vec<String>>) -> Result<ExitCode> {
    let count = stages.len();
    let mut pipes = (1..count)
        .map(|_| Pipe::open())
        .collect::<Result<Vec<_>>>()?;
    debug!(stages = count, pipes = pipes.len(), "pipeline wired");

    let mut children = Vec::with_capacity(count);
    let mut spawn_error = None;
    for (index, argv) in stages.into_iter().enumerate() {
        match spawn_stage(session, &mut pipes, index, count, argv) {
            Ok(pid) => {
                debug!(stage = index, %pid, "stage running");
                children.push(StageProcess { index, pid });
            }
            Err(err) => {
                spawn_error = Some(err);
                break;
            }
        }
    }

    // Readers only see end-of-stream once every write end is closed, ours included.
    drop(pipes);

    let mut last = 0;
    let mut reap_error = None;
    for child in &children {
        match wait_stage(child) {
            Ok(code) => {
                debug!(stage = child.index, pid = %child.pid, code, "stage reaped");
                last = code;
            }
            Err(err) => {
                reap_error.get_or_insert(err);
            }
        }
    }

    match spawn_error.or(reap_error) {
        Some(err) => Err(err),
        None => Ok(last),
    }
}

fn spawn_stage(
    session: &mut Session,
    pipes: &mut Vec<Pipe>,
    index: usize,
    count: usize,
    argv: Vec<String>,
) -> Result<Pid> {
    // Buffered output would otherwise be written once more by the child.
    io::stdout().flush()?;

    // SAFETY: the interpreter is single-threaded, and the child never returns
    // into the caller: it either execs or exits.
    match unsafe { fork() }.map_err(|e| ShellError::os("fork", e))? {
        ForkResult::Parent { child } => Ok(child),
        ForkResult::Child => run_child(session, std::mem::take(pipes), index, count, argv),
    }
}

/// Body of a forked stage. Never returns.
///
/// `session` is the child's private copy; whatever a builtin changes in it
/// is lost when the child exits.
fn run_child(
    session: &mut Session,
    pipes: Vec<Pipe>,
    index: usize,
    count: usize,
    argv: Vec<String>,
) -> ! {
    let wired = wire_child(&pipes, index, count).and_then(|()| restore_sigpipe());
    drop(pipes);

    let code = match wired.and_then(|()| exec_stage(session, argv)) {
        Ok(code) => code,
        Err(err) => {
            let _ = writeln!(io::stderr(), "{err}");
            err.exit_code()
        }
    };
    let _ = io::stdout().flush();
    process::exit(code)
}

/// Stage `index` reads from pipe `index - 1` and writes into pipe `index`.
fn wire_child(pipes: &[Pipe], index: usize, count: usize) -> Result<()> {
    if index > 0 {
        dup2_stdin(&pipes[index - 1].read).map_err(|e| ShellError::os("dup2", e))?;
    }
    if index + 1 < count {
        dup2_stdout(&pipes[index].write).map_err(|e| ShellError::os("dup2", e))?;
    }
    Ok(())
}

/// The runtime ignores `SIGPIPE`, and an ignored signal survives `exec`.
/// A stage whose reader went away must die quietly instead of reporting
/// write errors.
fn restore_sigpipe() -> Result<()> {
    // SAFETY: installs the default disposition, no handler code is involved.
    unsafe { signal(Signal::SIGPIPE, SigHandler::SigDfl) }
        .map(drop)
        .map_err(|e| ShellError::os("signal", e))
}

fn exec_stage(session: &mut Session, argv: Vec<String>) -> Result<ExitCode> {
    let stage = resolve_stage(session, argv)?;
    match stage.kind {
        CommandKind::Builtin(builtin) => {
            let mut stdout = io::stdout().lock();
            let code = builtin.run(&stage.args(), session, &mut stdout)?;
            stdout.flush()?;
            Ok(code)
        }
        CommandKind::External => Err(exec_external(&stage)),
    }
}

/// Replace the process image with the stage's program. Returns only on failure.
fn exec_external(stage: &Stage) -> ShellError {
    let Ok(args) = stage
        .argv
        .iter()
        .map(|arg| CString::new(arg.as_bytes()))
        .collect::<std::result::Result<Vec<_>, _>>()
    else {
        return ShellError::NulArgument(stage.name().to_string());
    };
    match execvp(&args[0], &args) {
        Ok(never) => match never {},
        Err(errno) => {
            debug!(command = stage.name(), %errno, "exec failed");
            ShellError::ExecNotFound(stage.name().to_string())
        }
    }
}

fn wait_stage(child: &StageProcess) -> Result<ExitCode> {
    loop {
        match waitpid(child.pid, None) {
            Ok(WaitStatus::Exited(_, code)) => return Ok(code),
            Ok(WaitStatus::Signaled(_, signal, _)) => return Ok(128 + signal as i32),
            Ok(_) | Err(Errno::EINTR) => continue,
            Err(errno) => return Err(ShellError::os("waitpid", errno)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::ErrorKind;
    use crate::tokenizer::tokenize;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn new_session() -> Session {
        Session::with_dir(Config::default(), PathBuf::from("/"), HashMap::new())
    }

    #[test]
    fn test_single_builtin_mutates_live_session() {
        let mut session = new_session();
        let code = run_pipeline(&mut session, tokenize("alias ll=ls -la").unwrap()).unwrap();
        assert_eq!(code, 0);
        assert_eq!(session.aliases.get("ll"), Some("ls -la"));
        assert_eq!(session.last_status, Some(0));
    }

    #[test]
    fn test_failure_status_is_recorded() {
        let mut session = new_session();
        let err = run_pipeline(&mut session, tokenize("unalias missing").unwrap()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::User);
        assert_eq!(session.last_status, Some(1));
    }

    #[test]
    fn test_pipe_ends_close_on_drop() {
        let pipe = Pipe::open().unwrap();
        let mut reader = std::fs::File::from(pipe.read);
        drop(pipe.write);
        let mut buf = Vec::new();
        // EOF right away: no write end is left open.
        assert_eq!(std::io::Read::read_to_end(&mut reader, &mut buf).unwrap(), 0);
    }
}
