#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

pub struct ScriptRun {
    pub stdout: String,
    pub stderr: String,
    pub code: Option<i32>,
}

impl From<Output> for ScriptRun {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            code: output.status.code(),
        }
    }
}

/// Write `script` into `dir` and run it with `mysh`, from inside `dir`.
pub fn run_script(dir: &Path, script: &str) -> ScriptRun {
    let path = dir.join("script.mysh");
    fs::write(&path, script).expect("write script");
    Command::new(env!("CARGO_BIN_EXE_mysh"))
        .arg(&path)
        .current_dir(dir)
        .env_remove("MYSH_LOG")
        .output()
        .expect("run mysh")
        .into()
}

/// Run `mysh` without a script, feeding `input` on standard input.
pub fn run_interactive(dir: &Path, input: impl AsRef<[u8]>) -> ScriptRun {
    let mut child = Command::new(env!("CARGO_BIN_EXE_mysh"))
        .current_dir(dir)
        .env_remove("MYSH_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn mysh");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input.as_ref())
        .expect("feed stdin");
    child.wait_with_output().expect("wait mysh").into()
}

/// The directory as the shell itself reports it.
pub fn canonical(dir: &Path) -> PathBuf {
    fs::canonicalize(dir).expect("canonicalize")
}
