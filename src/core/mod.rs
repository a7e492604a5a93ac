// Public modules
pub mod config;
pub mod discover;
pub mod error;
pub mod local_files;
pub mod output;
pub mod rewrite;
pub mod rules;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use output::{FileOutcome, FileStatus, RuleHit, RunReport};
pub use rewrite::{rewrite_content, rewrite_file, run, Rewrite, WriteMode};
pub use rules::{Injection, Rule, RuleSet, RuleSetKind};
