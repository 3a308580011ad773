//! Startup configuration and the policy limits enforced by the session stores.

/// Prompt shown by the interactive loop until `prompt` changes it.
pub const DEFAULT_PROMPT: &str = "mysh> ";

/// Hard caps on the session's growable stores.
///
/// Every cap is a policy limit: hitting it is reported as a resource-limit
/// error, never silently truncated. The one exception is the history log,
/// which evicts its oldest entry instead of refusing a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of arguments (command word included) of one stage after expansion.
    pub max_args: usize,
    /// Number of history entries retained.
    pub max_history: usize,
    /// Maximum depth of the directory stack.
    pub max_dir_stack: usize,
    /// Maximum number of defined aliases.
    pub max_aliases: usize,
    /// Prompt text longer than this (in characters) is truncated.
    pub max_prompt_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_args: 256,
            max_history: 1000,
            max_dir_stack: 50,
            max_aliases: 100,
            max_prompt_len: 255,
        }
    }
}

/// Everything needed to build a fresh [`Session`](crate::session::Session).
#[derive(Debug, Clone)]
pub struct Config {
    pub prompt: String,
    pub limits: Limits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            limits: Limits::default(),
        }
    }
}

impl Config {
    /// Override the initial prompt, applying the prompt length cap.
    pub fn with_prompt(mut self, prompt: &str) -> Self {
        self.prompt = truncate_chars(prompt, self.limits.max_prompt_len);
        self
    }

    /// Override the number of retained history entries.
    pub fn with_history_size(mut self, size: usize) -> Self {
        self.limits.max_history = size;
        self
    }
}

/// Cut `text` down to at most `max` characters without splitting a code point.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
