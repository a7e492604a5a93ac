//! File list resolution — explicit paths, discovery globs and exclusions.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Resolve the ordered list of files to process.
///
/// Explicit files come first, in the given order, and are kept even when they
/// do not exist so the run can report them. Glob matches follow, sorted, minus
/// anything already listed. `exclude` patterns are matched against paths
/// relative to `root`.
pub fn resolve_files(
    root: &Path,
    files: &[String],
    globs: &[String],
    exclude: &[String],
) -> Result<Vec<PathBuf>> {
    let mut resolved: Vec<PathBuf> = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for file in files {
        let path = anchor(root, file);
        if seen.insert(path.clone()) {
            resolved.push(path);
        }
    }

    for pattern in globs {
        let anchored = anchor(root, pattern);
        let pattern_str = anchored.to_string_lossy().to_string();

        let entries = glob::glob(&pattern_str).map_err(|e| {
            Error::validation_invalid_argument(
                "glob",
                format!("Invalid glob '{}': {}", pattern, e),
                None,
                None,
            )
        })?;

        let mut matched: Vec<PathBuf> = entries.flatten().filter(|p| p.is_file()).collect();
        matched.sort();

        for path in matched {
            if seen.insert(path.clone()) {
                resolved.push(path);
            }
        }
    }

    if !exclude.is_empty() {
        resolved.retain(|path| {
            let relative = path.strip_prefix(root).unwrap_or(path);
            let relative = relative.to_string_lossy().replace('\\', "/");
            !exclude
                .iter()
                .any(|pattern| glob_match::glob_match(pattern, &relative))
        });
    }

    Ok(resolved)
}

/// Expand `~` and join relative paths onto `root`.
fn anchor(root: &Path, raw: &str) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(raw).to_string());
    if expanded.is_absolute() || root == Path::new(".") || root.as_os_str().is_empty() {
        expanded
    } else {
        root.join(expanded)
    }
}
