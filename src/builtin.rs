use crate::command::ExitCode;
use crate::config::truncate_chars;
use crate::error::{Result, ShellError};
use crate::session::Session;
use argh::{EarlyExit, FromArgs};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed
/// wherever they are invoked: in the interpreter process for a single
/// command, inside the stage's child process within a pipeline.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd" or "alias".
    fn name() -> &'static str;

    /// Executes the command against the session, writing its output to `stdout`.
    ///
    /// Return value should follow shell conventions: 0 for success, non-zero for error.
    fn execute(self, stdout: &mut dyn Write, session: &mut Session) -> Result<ExitCode>;
}

/// The closed set of builtins, resolved once from the command word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Cd,
    Pushd,
    Popd,
    Dirs,
    History,
    Alias,
    Unalias,
    Prompt,
    Exit,
}

impl Builtin {
    pub const ALL: [Builtin; 9] = [
        Builtin::Cd,
        Builtin::Pushd,
        Builtin::Popd,
        Builtin::Dirs,
        Builtin::History,
        Builtin::Alias,
        Builtin::Unalias,
        Builtin::Prompt,
        Builtin::Exit,
    ];

    pub fn lookup(name: &str) -> Option<Builtin> {
        Self::ALL.into_iter().find(|builtin| builtin.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Cd => Cd::name(),
            Builtin::Pushd => Pushd::name(),
            Builtin::Popd => Popd::name(),
            Builtin::Dirs => Dirs::name(),
            Builtin::History => HistoryCmd::name(),
            Builtin::Alias => AliasCmd::name(),
            Builtin::Unalias => Unalias::name(),
            Builtin::Prompt => Prompt::name(),
            Builtin::Exit => Exit::name(),
        }
    }

    /// Parse `args` (command word excluded) and run the builtin.
    pub fn run(self, args: &[&str], session: &mut Session, stdout: &mut dyn Write) -> Result<ExitCode> {
        match self {
            Builtin::Cd => run_parsed::<Cd>(args, session, stdout),
            Builtin::Pushd => run_parsed::<Pushd>(args, session, stdout),
            Builtin::Popd => run_parsed::<Popd>(args, session, stdout),
            Builtin::Dirs => run_parsed::<Dirs>(args, session, stdout),
            Builtin::History => run_parsed::<HistoryCmd>(args, session, stdout),
            Builtin::Alias => run_parsed::<AliasCmd>(args, session, stdout),
            Builtin::Unalias => run_parsed::<Unalias>(args, session, stdout),
            Builtin::Prompt => run_parsed::<Prompt>(args, session, stdout),
            Builtin::Exit => run_parsed::<Exit>(args, session, stdout),
        }
    }
}

fn run_parsed<T: BuiltinCommand>(
    args: &[&str],
    session: &mut Session,
    stdout: &mut dyn Write,
) -> Result<ExitCode> {
    match T::from_args(&[T::name()], args) {
        Ok(cmd) => cmd.execute(stdout, session),
        // --help
        Err(EarlyExit {
            output,
            status: Ok(()),
        }) => {
            stdout.write_all(output.as_bytes())?;
            Ok(0)
        }
        Err(EarlyExit {
            output,
            status: Err(()),
        }) => Err(ShellError::usage(T::name(), output.trim_end())),
    }
}

/// Change the process and session working directory to `target`.
///
/// Relative targets are taken from the session's directory. On failure
/// nothing changes.
fn change_dir(session: &mut Session, target: &Path, command: &str) -> Result<()> {
    let new_dir = if target.is_absolute() {
        target.to_path_buf()
    } else {
        session.current_dir.join(target)
    };

    let canonical = fs::canonicalize(&new_dir)
        .map_err(|e| ShellError::os(format!("{command}: {}", target.display()), e))?;

    env::set_current_dir(&canonical)
        .map_err(|e| ShellError::os(format!("{command}: {}", target.display()), e))?;
    tracing::debug!(from = %session.current_dir.display(), to = %canonical.display(), "cwd changed");
    session.current_dir = canonical;
    Ok(())
}

#[derive(FromArgs)]
/// Change the current working directory.
/// If no target is provided, changes to the directory specified by the HOME variable.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory. Defaults to $HOME when omitted.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, _stdout: &mut dyn Write, session: &mut Session) -> Result<ExitCode> {
        let target = match self.target {
            Some(t) if !t.is_empty() => PathBuf::from(t),
            _ => match session.get_var("HOME") {
                Some(home) => PathBuf::from(home),
                None => return Err(ShellError::usage("cd", "HOME not set")),
            },
        };
        change_dir(session, &target, "cd")?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Save the current directory on the directory stack, then change to DIR.
pub struct Pushd {
    #[argh(positional)]
    /// directory to switch to.
    pub dir: Option<String>,
}

impl BuiltinCommand for Pushd {
    fn name() -> &'static str {
        "pushd"
    }

    fn execute(self, _stdout: &mut dyn Write, session: &mut Session) -> Result<ExitCode> {
        let Some(dir) = self.dir else {
            return Err(ShellError::usage("pushd", "no directory specified"));
        };
        let limit = session.dirs.capacity();
        let stack_full = || ShellError::ResourceLimit {
            command: "pushd".to_string(),
            resource: "directory stack",
            limit,
        };
        if session.dirs.is_full() {
            return Err(stack_full());
        }

        let previous = session.current_dir.clone();
        change_dir(session, Path::new(&dir), "pushd")?;
        if session.dirs.push(previous).is_err() {
            return Err(stack_full());
        }
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Remove the top entry of the directory stack and change to it.
pub struct Popd {}

impl BuiltinCommand for Popd {
    fn name() -> &'static str {
        "popd"
    }

    fn execute(self, _stdout: &mut dyn Write, session: &mut Session) -> Result<ExitCode> {
        let dir = session
            .dirs
            .pop()
            .ok_or_else(|| ShellError::usage("popd", "directory stack empty"))?;
        change_dir(session, &dir, "popd")?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Print the current directory followed by the directory stack, most recent first.
pub struct Dirs {}

impl BuiltinCommand for Dirs {
    fn name() -> &'static str {
        "dirs"
    }

    fn execute(self, stdout: &mut dyn Write, session: &mut Session) -> Result<ExitCode> {
        write!(stdout, "{}", session.current_dir.display())?;
        for dir in session.dirs.iter() {
            write!(stdout, " {}", dir.display())?;
        }
        writeln!(stdout)?;
        Ok(0)
    }
}

/// Print recorded command lines.
///
/// Parsed by hand rather than derived: any count that is not a positive
/// integer, including negative ones, lists the whole history instead of
/// being rejected as an unknown option.
pub struct HistoryCmd {
    count: Option<usize>,
}

impl FromArgs for HistoryCmd {
    fn from_args(_command_name: &[&str], args: &[&str]) -> std::result::Result<Self, EarlyExit> {
        let count = args
            .first()
            .and_then(|arg| arg.parse::<i64>().ok())
            .filter(|n| *n > 0)
            .and_then(|n| usize::try_from(n).ok());
        Ok(Self { count })
    }
}

impl BuiltinCommand for HistoryCmd {
    fn name() -> &'static str {
        "history"
    }

    fn execute(self, stdout: &mut dyn Write, session: &mut Session) -> Result<ExitCode> {
        for (number, line) in session.history.tail(self.count) {
            writeln!(stdout, "{number:4}  {line}")?;
        }
        Ok(0)
    }
}

#[derive(FromArgs)]
/// List aliases, print one, or define NAME=VALUE.
pub struct AliasCmd {
    #[argh(positional, greedy)]
    /// alias names to print, or a single NAME=VALUE definition (the value may span several words).
    pub definition: Vec<String>,
}

impl BuiltinCommand for AliasCmd {
    fn name() -> &'static str {
        "alias"
    }

    fn execute(self, stdout: &mut dyn Write, session: &mut Session) -> Result<ExitCode> {
        if self.definition.is_empty() {
            for entry in session.aliases.iter() {
                writeln!(stdout, "alias {}='{}'", entry.name, entry.value)?;
            }
            return Ok(0);
        }

        let joined = self.definition.join(" ");
        let Some((name, value)) = joined.split_once('=') else {
            for name in &self.definition {
                let value = session.aliases.get(name).ok_or_else(|| ShellError::AliasNotFound {
                    command: "alias",
                    name: name.clone(),
                })?;
                writeln!(stdout, "alias {name}='{value}'")?;
            }
            return Ok(0);
        };

        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(ShellError::usage("alias", format!("invalid alias name '{name}'")));
        }
        let value = strip_quotes(value.trim());
        if value.trim().is_empty() {
            return Err(ShellError::usage("alias", format!("empty value for '{name}'")));
        }
        session.aliases.set(name, value)?;
        Ok(0)
    }
}

/// Drop one pair of matching surrounding quotes.
fn strip_quotes(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

#[derive(FromArgs)]
/// Remove an alias.
pub struct Unalias {
    #[argh(positional)]
    /// name of the alias to remove.
    pub name: Option<String>,
}

impl BuiltinCommand for Unalias {
    fn name() -> &'static str {
        "unalias"
    }

    fn execute(self, _stdout: &mut dyn Write, session: &mut Session) -> Result<ExitCode> {
        let Some(name) = self.name else {
            return Err(ShellError::usage("unalias", "usage: unalias name"));
        };
        match session.aliases.remove(&name) {
            Some(_) => Ok(0),
            None => Err(ShellError::AliasNotFound {
                command: "unalias",
                name,
            }),
        }
    }
}

#[derive(FromArgs)]
/// Print the prompt, or set it to TEXT.
pub struct Prompt {
    #[argh(positional, greedy)]
    /// new prompt text; words are joined with single spaces.
    pub text: Vec<String>,
}

impl BuiltinCommand for Prompt {
    fn name() -> &'static str {
        "prompt"
    }

    fn execute(self, stdout: &mut dyn Write, session: &mut Session) -> Result<ExitCode> {
        if self.text.is_empty() {
            writeln!(stdout, "Current prompt: {}", session.prompt)?;
        } else {
            session.prompt = truncate_chars(&self.text.join(" "), session.limits.max_prompt_len);
        }
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Leave the shell once the current command line has finished.
pub struct Exit {
    #[argh(positional, greedy)]
    /// ignored.
    pub _args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _stdout: &mut dyn Write, session: &mut Session) -> Result<ExitCode> {
        session.should_exit = true;
        Ok(0)
    }
}
