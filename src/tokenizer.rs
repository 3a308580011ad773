//! Splitting a raw input line into pipeline stages and argument vectors.
//!
//! There is no quoting or escaping: `|` always separates stages and any run of
//! blanks separates arguments.

use crate::error::{Result, ShellError};

/// One input line split into stages, each an argument vector whose first
/// element is the command word.
///
/// A `Pipeline` always holds at least one stage, and every stage holds at
/// least one argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Vec<String>>,
}

impl Pipeline {
    pub fn stages(&self) -> &[Vec<String>] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// A pipeline of one stage runs as a plain command, with no pipes at all.
    pub fn is_single(&self) -> bool {
        self.stages.len() == 1
    }

    pub fn into_stages(self) -> Vec<Vec<String>> {
        self.stages
    }
}

/// Tokenize `line` into a [`Pipeline`].
///
/// Fails with [`ShellError::EmptyInput`] when the line is blank and with
/// [`ShellError::MalformedPipeline`] when a stage between pipes is empty
/// (`a | | b`, `| a`, `a |`).
pub fn tokenize(line: &str) -> Result<Pipeline> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ShellError::EmptyInput);
    }

    let stages = line
        .split('|')
        .map(|segment| split_args(segment.trim()))
        .map(|argv| {
            if argv.is_empty() {
                Err(ShellError::MalformedPipeline)
            } else {
                Ok(argv)
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Pipeline { stages })
}

/// Split one stage on runs of whitespace.
pub fn split_args(stage: &str) -> Vec<String> {
    stage.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_single_command() {
        let p = tokenize("  ls   -la\t/tmp ").unwrap();
        assert!(p.is_single());
        assert_eq!(p.stages(), &[argv(&["ls", "-la", "/tmp"])]);
    }

    #[test]
    fn test_pipeline_stages_are_trimmed() {
        let p = tokenize("echo hi|tr a-z A-Z |  wc -c").unwrap();
        assert_eq!(p.len(), 3);
        assert_eq!(p.stages()[0], argv(&["echo", "hi"]));
        assert_eq!(p.stages()[1], argv(&["tr", "a-z", "A-Z"]));
        assert_eq!(p.stages()[2], argv(&["wc", "-c"]));
    }

    #[test]
    fn test_blank_line_is_empty_input() {
        assert!(matches!(tokenize(""), Err(ShellError::EmptyInput)));
        assert!(matches!(tokenize(" \t "), Err(ShellError::EmptyInput)));
    }

    #[test]
    fn test_empty_stage_is_malformed() {
        for line in ["ls | | wc", "| ls", "ls |", "ls |   | wc", "|"] {
            assert!(
                matches!(tokenize(line), Err(ShellError::MalformedPipeline)),
                "expected malformed pipeline for {line:?}"
            );
        }
    }

    #[test]
    fn test_quotes_are_not_interpreted() {
        let p = tokenize("echo 'a b'").unwrap();
        assert_eq!(p.stages()[0], argv(&["echo", "'a", "b'"]));
    }
}
