use crate::alias::AliasTable;
use crate::command::ExitCode;
use crate::config::Config;
use crate::config::Limits;
use crate::dirstack::DirStack;
use crate::error::{Result, ShellError};
use crate::history::History;
use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

/// Long-lived mutable state of one interpreter.
///
/// The session contains:
/// - `vars`: snapshot of the process environment taken at startup (`HOME`, `PATH`, ...).
/// - `current_dir`: the cached working directory, kept equal to the process one.
/// - `prompt`: text shown by the interactive loop.
/// - `should_exit`: set by `exit`; the read-eval loop stops after the current line.
/// - `history`, `dirs`, `aliases`: the stores mutated by the builtins.
/// - `last_status`: status of the final stage of the last executed line.
///
/// A forked pipeline stage works on its own copy; nothing it changes here
/// reaches the interactive session.
#[derive(Debug, Clone)]
pub struct Session {
    pub vars: HashMap<String, String>,
    pub current_dir: PathBuf,
    pub prompt: String,
    pub should_exit: bool,
    pub history: History,
    pub dirs: DirStack,
    pub aliases: AliasTable,
    pub last_status: Option<ExitCode>,
    pub limits: Limits,
}

impl Session {
    /// Capture the process environment and working directory into a new session.
    ///
    /// Fails when the working directory cannot be determined: there is no
    /// valid session without one.
    pub fn new(config: Config) -> Result<Self> {
        let current_dir = stdenv::current_dir().map_err(|e| ShellError::os("getcwd", e))?;
        Ok(Self::with_dir(config, current_dir, stdenv::vars().collect()))
    }

    /// Build a session around an explicit directory and variable set.
    pub fn with_dir(config: Config, current_dir: PathBuf, vars: HashMap<String, String>) -> Self {
        let Config { prompt, limits } = config;
        Self {
            vars,
            current_dir,
            prompt,
            should_exit: false,
            history: History::new(limits.max_history),
            dirs: DirStack::new(limits.max_dir_stack),
            aliases: AliasTable::new(limits.max_aliases),
            last_status: None,
            limits,
        }
    }

    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }
}
