use argh::FromArgs;
use mysh::{Config, Interpreter, Session};
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
/// Interactive command interpreter with aliases, wildcards, a directory stack and pipelines.
struct Args {
    #[argh(positional)]
    /// script to run line by line instead of reading commands interactively.
    script: Option<PathBuf>,

    #[argh(option)]
    /// initial prompt text.
    prompt: Option<String>,

    #[argh(option)]
    /// number of history entries to keep.
    history_size: Option<usize>,

    #[argh(switch, short = 'v')]
    /// log pipeline activity to standard error.
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("MYSH_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();
    init_logging(args.verbose);

    let mut config = Config::default();
    if let Some(prompt) = &args.prompt {
        config = config.with_prompt(prompt);
    }
    if let Some(size) = args.history_size {
        config = config.with_history_size(size);
    }

    let session = match Session::new(config) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };
    info!(cwd = %session.current_dir.display(), "session started");

    let mut interpreter = Interpreter::new(session);
    match args.script {
        Some(path) => {
            if let Err(err) = interpreter.run_script(&path) {
                eprintln!("{err}");
            }
        }
        None => {
            if let Err(err) = interpreter.repl() {
                eprintln!("line editor failed: {err}");
            }
        }
    }

    Ok(())
}
