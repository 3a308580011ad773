//! Alias storage and single-level command-word substitution.

use crate::error::{Result, ShellError};
use crate::tokenizer::split_args;

/// A named text substitution for a command word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    pub name: String,
    pub value: String,
}

/// Aliases in definition order, unique by name, bounded by `capacity`.
#[derive(Debug, Clone)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
    capacity: usize,
}

impl AliasTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.value.as_str())
    }

    /// Insert a new alias or overwrite an existing one in place.
    ///
    /// Only a brand new name can hit the capacity limit.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.name == name) {
            entry.value = value.to_string();
            return Ok(());
        }
        if self.entries.len() >= self.capacity {
            return Err(ShellError::ResourceLimit {
                command: "alias".to_string(),
                resource: "alias table",
                limit: self.capacity,
            });
        }
        self.entries.push(AliasEntry {
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    /// Remove `name`, returning its entry if it was defined.
    pub fn remove(&mut self, name: &str) -> Option<AliasEntry> {
        let index = self.entries.iter().position(|entry| entry.name == name)?;
        Some(self.entries.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AliasEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Substitute the command word of `argv` if it names an alias.
///
/// The alias value is split on whitespace and spliced in place of the
/// command word. The result is not looked up again, so `ls=ls -la` expands
/// exactly once.
pub fn resolve_alias(table: &AliasTable, mut argv: Vec<String>) -> Vec<String> {
    let Some(value) = argv.first().and_then(|word| table.get(word)) else {
        return argv;
    };
    let replacement = split_args(value);
    tracing::trace!(alias = %argv[0], ?replacement, "alias substituted");
    argv.splice(0..1, replacement);
    argv
}
