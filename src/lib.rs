//! A small interactive command interpreter.
//!
//! Lines are split into pipeline stages, each stage goes through alias
//! substitution and filename wildcard expansion, and then runs either as a
//! builtin against the [`Session`] or as an external program. Stages joined
//! with `|` run as separate processes connected by pipes.
//!
//! The main entry point is [`Interpreter`], which owns the session and
//! drives it from an interactive line editor or from a script. The lower
//! level [`tokenize`] and [`run_pipeline`] functions are public for callers
//! that manage their own input.

pub mod alias;
pub mod builtin;
pub mod command;
pub mod config;
pub mod dirstack;
pub mod error;
mod external;
pub mod history;
mod interpreter;
pub mod pipeline;
pub mod session;
pub mod tokenizer;
pub mod wildcard;

pub use config::Config;
pub use error::{ErrorKind, ShellError};
pub use interpreter::Interpreter;
pub use pipeline::run_pipeline;
pub use session::Session;
pub use tokenizer::tokenize;
