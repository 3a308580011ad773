//! Filename wildcard (`*`, `?`) expansion.

use crate::error::{Result, ShellError};
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

pub fn has_wildcard(arg: &str) -> bool {
    arg.contains('*') || arg.contains('?')
}

/// Expand every wildcard argument of `argv` against the filesystem under `cwd`.
///
/// Matches replace the pattern in lexicographic order. Each match keeps the
/// directory part of the pattern as written (`./*` gives `./name`, never a
/// bare `name` that could pass for an option), and relative patterns stay
/// relative to `cwd`. A pattern without matches (or one the
/// glob syntax rejects) stays as the literal argument. The expanded vector
/// may hold at most `max_args` arguments.
pub fn expand_wildcards(cwd: &Path, argv: Vec<String>, max_args: usize) -> Result<Vec<String>> {
    let mut expanded = Vec::with_capacity(argv.len());
    for arg in argv {
        if has_wildcard(&arg) {
            let matches = glob_matches(cwd, &arg);
            tracing::trace!(pattern = %arg, count = matches.len(), "wildcard expanded");
            if matches.is_empty() {
                expanded.push(arg);
            } else {
                expanded.extend(matches);
            }
        } else {
            expanded.push(arg);
        }
    }

    if expanded.len() > max_args {
        let command = expanded.first().cloned().unwrap_or_default();
        return Err(ShellError::ResourceLimit {
            command,
            resource: "argument list",
            limit: max_args,
        });
    }
    Ok(expanded)
}

fn glob_matches(cwd: &Path, pattern: &str) -> Vec<String> {
    let prefix = literal_prefix(pattern);
    let base = if Path::new(pattern).is_absolute() {
        PathBuf::from(prefix)
    } else {
        cwd.join(prefix)
    };
    let full_pattern = format!(
        "{}/{}",
        Pattern::escape(&base.to_string_lossy()).trim_end_matches('/'),
        &pattern[prefix.len()..]
    );

    let Ok(paths) = glob::glob_with(&full_pattern, MATCH_OPTIONS) else {
        return Vec::new();
    };

    // Matches keep the directory part exactly as typed (`./`, `../`, `sub/../`).
    let skip = base.components().count();
    let mut matches: Vec<String> = paths
        .flatten()
        .map(|path| {
            let rest: PathBuf = path.components().skip(skip).collect();
            format!("{prefix}{}", rest.to_string_lossy())
        })
        .collect();
    matches.sort();
    matches
}

/// Everything up to and including the last `/` before the first wildcard.
fn literal_prefix(pattern: &str) -> &str {
    let first_wildcard = pattern.find(['*', '?']).unwrap_or(pattern.len());
    match pattern[..first_wildcard].rfind('/') {
        Some(slash) => &pattern[..=slash],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn argv(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn populated_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["b.txt", "a.txt", "c.log", ".hidden.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("d.txt"), "").unwrap();
        dir
    }

    #[test]
    fn test_star_expands_sorted_and_relative() {
        let dir = populated_dir();
        let out = expand_wildcards(dir.path(), argv(&["ls", "*.txt"]), 256).unwrap();
        assert_eq!(out, argv(&["ls", "a.txt", "b.txt"]));
    }

    #[test]
    fn test_question_mark_and_subdirectory() {
        let dir = populated_dir();
        let out = expand_wildcards(dir.path(), argv(&["cat", "?.log", "sub/*"]), 256).unwrap();
        assert_eq!(out, argv(&["cat", "c.log", "sub/d.txt"]));
    }

    #[test]
    fn test_no_match_keeps_literal() {
        let dir = populated_dir();
        let out = expand_wildcards(dir.path(), argv(&["echo", "nomatch*.xyz"]), 256).unwrap();
        assert_eq!(out, argv(&["echo", "nomatch*.xyz"]));
    }

    #[test]
    fn test_absolute_pattern_yields_absolute_paths() {
        let dir = populated_dir();
        let pattern = format!("{}/*.log", dir.path().display());
        let out = expand_wildcards(Path::new("/"), argv(&["ls", &pattern]), 256).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out[1].ends_with("c.log"));
        assert!(Path::new(&out[1]).is_absolute());
    }

    #[test]
    fn test_typed_directory_prefix_is_kept() {
        let dir = populated_dir();
        let out = expand_wildcards(dir.path(), argv(&["echo", "./*.txt"]), 256).unwrap();
        assert_eq!(out, argv(&["echo", "./a.txt", "./b.txt"]));

        let sub = dir.path().join("sub");
        let out = expand_wildcards(&sub, argv(&["ls", "../?.log", "./../sub/*"]), 256).unwrap();
        assert_eq!(out, argv(&["ls", "../c.log", "./../sub/d.txt"]));
    }

    #[test]
    fn test_literal_prefix() {
        assert_eq!(literal_prefix("*.txt"), "");
        assert_eq!(literal_prefix("./*"), "./");
        assert_eq!(literal_prefix("sub/../a?/*.rs"), "sub/../");
        assert_eq!(literal_prefix("/tmp/x*"), "/tmp/");
    }

    #[test]
    fn test_plain_arguments_untouched() {
        let dir = populated_dir();
        let input = argv(&["echo", "a.txt", "[x]"]);
        assert_eq!(expand_wildcards(dir.path(), input.clone(), 256).unwrap(), input);
    }

    #[test]
    fn test_argument_limit_boundary() {
        let dir = populated_dir();
        // ls + a.txt + b.txt = 3 arguments
        assert!(expand_wildcards(dir.path(), argv(&["ls", "*.txt"]), 3).is_ok());
        let err = expand_wildcards(dir.path(), argv(&["ls", "*.txt"]), 2).unwrap_err();
        assert!(matches!(err, ShellError::ResourceLimit { limit: 2, .. }));
    }
}
