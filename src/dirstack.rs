//! Bounded stack of saved working directories for `pushd` / `popd`.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct DirStack {
    dirs: Vec<PathBuf>,
    capacity: usize,
}

impl DirStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            dirs: Vec::new(),
            capacity,
        }
    }

    pub fn is_full(&self) -> bool {
        self.dirs.len() >= self.capacity
    }

    /// Push `dir`, handing it back when the stack is already at capacity.
    pub fn push(&mut self, dir: PathBuf) -> Result<(), PathBuf> {
        if self.is_full() {
            return Err(dir);
        }
        self.dirs.push(dir);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<PathBuf> {
        self.dirs.pop()
    }

    /// Entries from the most recently pushed to the oldest.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().rev().map(PathBuf::as_path)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}
