//! Public output types for rewrite runs.
//!
//! A run produces one [`FileOutcome`] per input path, aggregated into a
//! [`RunReport`]. The report renders either as JSON (serde) or as the
//! line-oriented progress report via `Display`.

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Terminal state of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Modified,
    Unchanged,
    NotFound,
    Errored,
}

/// How many times one rule fired in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleHit {
    pub rule: String,
    pub replacements: usize,
}

/// Result of processing a single file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOutcome {
    pub path: String,
    pub status: FileStatus,
    /// Whether the dependency declaration was added.
    pub injected: bool,
    /// Total replacements across all rules.
    pub replacements: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileOutcome {
    fn bare(path: &Path, status: FileStatus) -> Self {
        Self {
            path: path.display().to_string(),
            status,
            injected: false,
            replacements: 0,
            rules: Vec::new(),
            error: None,
        }
    }

    pub fn not_found(path: &Path) -> Self {
        Self::bare(path, FileStatus::NotFound)
    }

    pub fn errored(path: &Path, message: impl Into<String>) -> Self {
        let mut outcome = Self::bare(path, FileStatus::Errored);
        outcome.error = Some(message.into());
        outcome
    }

    pub fn unchanged(path: &Path) -> Self {
        Self::bare(path, FileStatus::Unchanged)
    }

    pub fn modified(path: &Path, injected: bool, rules: Vec<RuleHit>) -> Self {
        let mut outcome = Self::bare(path, FileStatus::Modified);
        outcome.injected = injected;
        outcome.replacements = rules.iter().map(|h| h.replacements).sum();
        outcome.rules = rules;
        outcome
    }
}

/// Aggregate of a whole run.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub rule_set: String,
    pub dry_run: bool,
    pub total: usize,
    pub modified: usize,
    pub unchanged: usize,
    pub missing: usize,
    pub errors: usize,
    pub files: Vec<FileOutcome>,
}

impl RunReport {
    pub fn new(rule_set: &str, dry_run: bool) -> Self {
        Self {
            rule_set: rule_set.to_string(),
            dry_run,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: FileOutcome) {
        self.total += 1;
        match outcome.status {
            FileStatus::Modified => self.modified += 1,
            FileStatus::Unchanged => self.unchanged += 1,
            FileStatus::NotFound => self.missing += 1,
            FileStatus::Errored => self.errors += 1,
        }
        self.files.push(outcome);
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            FileStatus::Modified => write!(f, "Modified: {}", self.path),
            FileStatus::Unchanged => write!(f, "No change: {}", self.path),
            FileStatus::NotFound => write!(f, "File not found: {}", self.path),
            FileStatus::Errored => write!(
                f,
                "Error with {}: {}",
                self.path,
                self.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.files {
            if self.dry_run && outcome.status == FileStatus::Modified {
                writeln!(f, "Would modify: {}", outcome.path)?;
            } else {
                writeln!(f, "{}", outcome)?;
            }
        }
        writeln!(f)?;
        write!(
            f,
            "Done! {} files modified out of {}",
            self.modified, self.total
        )
    }
}
