use crate::command::ExitCode;
use crate::error::{Result, ShellError};
use crate::pipeline::run_pipeline;
use crate::session::Session;
use crate::tokenizer::tokenize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// The read-eval loop around a [`Session`].
///
/// Lines come either from an interactive line editor ([`Interpreter::repl`])
/// or from a script ([`Interpreter::run_script`]); both go through
/// [`Interpreter::execute_line`], so history recall and pipelines behave the
/// same in either mode.
///
/// Example
/// ```
/// use mysh::{Config, Interpreter, Session};
/// let session = Session::new(Config::default()).unwrap();
/// let mut sh = Interpreter::new(session);
/// sh.execute_line("alias ll=ls -la").unwrap();
/// assert_eq!(sh.session().aliases.get("ll"), Some("ls -la"));
/// ```
pub struct Interpreter {
    session: Session,
}

impl Interpreter {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Evaluate one raw input line.
    ///
    /// A line starting with `!` is first replaced by the history entry it
    /// recalls (and echoed). The resulting line is recorded in history,
    /// tokenized and run. Returns the status of the last stage.
    pub fn execute_line(&mut self, line: &str) -> Result<ExitCode> {
        let line = line.trim();
        let command = if line.starts_with('!') {
            let recalled = self
                .session
                .history
                .recall(line)
                .ok_or_else(|| ShellError::EventNotFound(line.to_string()))?
                .to_string();
            println!("{recalled}");
            recalled
        } else {
            line.to_string()
        };

        self.session.history.add(&command);
        let pipeline = tokenize(&command)?;
        run_pipeline(&mut self.session, pipeline)
    }

    /// Evaluate a line, reporting any failure on standard error.
    fn eval(&mut self, line: &str) {
        if let Err(err) = self.execute_line(line) {
            tracing::debug!(kind = ?err.kind(), "command failed");
            eprintln!("{err}");
        }
    }

    /// Interactive Read-Eval-Print Loop.
    ///
    /// Runs until `exit`, end of input, or an interrupt at the prompt.
    pub fn repl(&mut self) -> rustyline::Result<()> {
        let mut rl = DefaultEditor::new()?;

        while !self.session.should_exit {
            match rl.readline(&self.session.prompt) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line.as_str())?;
                    self.eval(&line);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }

    /// Run every command line of the script at `path`.
    pub fn run_script(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path).map_err(|e| ShellError::os(path.display().to_string(), e))?;
        self.run_lines(BufReader::new(file))
            .map_err(|e| ShellError::os(path.display().to_string(), e))
    }

    /// Run script lines from `source`, skipping blank lines and `#` comments.
    /// Stops early once `exit` has run.
    pub fn run_lines(&mut self, source: impl BufRead) -> std::io::Result<()> {
        for line in source.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.eval(line);
            if self.session.should_exit {
                tracing::debug!("exit requested, script stopped");
                break;
            }
        }
        Ok(())
    }
}
