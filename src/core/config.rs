use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::local_files::{local, FileSystem};
use crate::rules::{Injection, Rule, RuleSet, RuleSetKind, DEFAULT_DECLARATION};

/// Manifest looked up in the working directory when no --config is given.
pub const DEFAULT_CONFIG_FILE: &str = "snackswap.json";

/// Root configuration structure for snackswap.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteConfig {
    /// Base directory for relative file paths and globs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    /// Explicit file list, processed in order.
    #[serde(default)]
    pub files: Vec<String>,

    /// Discovery globs, expanded after the explicit files.
    #[serde(default)]
    pub globs: Vec<String>,

    /// Glob patterns removed from the resolved list.
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default = "default_rule_set")]
    pub rule_set: String,

    #[serde(default = "default_declaration")]
    pub declaration: String,

    /// Extra rules appended after the built-in set.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// A user-supplied rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    pub name: String,
    pub pattern: String,
    pub template: String,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            root: None,
            files: Vec::new(),
            globs: Vec::new(),
            exclude: Vec::new(),
            rule_set: default_rule_set(),
            declaration: default_declaration(),
            rules: Vec::new(),
        }
    }
}

fn default_rule_set() -> String {
    RuleSetKind::Simple.as_str().to_string()
}

fn default_declaration() -> String {
    DEFAULT_DECLARATION.to_string()
}

impl RewriteConfig {
    /// Resolve the configured rule set, declaration and extra rules.
    pub fn build_rule_set(&self) -> Result<RuleSet> {
        let kind = RuleSetKind::from_str(&self.rule_set).map_err(|_| {
            Error::config_invalid_value(
                "rule_set",
                Some(self.rule_set.clone()),
                "unknown rule set",
            )
            .with_hint("Use: simple, complex, all")
        })?;

        let extra = self
            .rules
            .iter()
            .map(|r| Rule::new(&r.name, &r.pattern, &r.template))
            .collect::<Result<Vec<_>>>()?;

        Ok(kind
            .build()?
            .with_injection(Some(Injection::new(&self.declaration)?))
            .with_rules(extra))
    }

    pub fn root_dir(&self) -> PathBuf {
        match &self.root {
            Some(root) => PathBuf::from(shellexpand::tilde(root).to_string()),
            None => PathBuf::from("."),
        }
    }
}

/// Parse manifest JSON. `source` names the origin in error messages.
pub fn parse(content: &str, source: &str) -> Result<RewriteConfig> {
    serde_json::from_str(content).map_err(|e| Error::config_invalid_json(source, e))
}

/// Load the manifest at `path`, or the default manifest if present.
///
/// An explicit path must exist; a missing default manifest yields defaults.
pub fn load(path: Option<&Path>) -> Result<RewriteConfig> {
    let fs = local();

    let path = match path {
        Some(p) => {
            if !fs.exists(p) {
                return Err(Error::file_not_found(p.display().to_string())
                    .with_hint("Pass an existing manifest with --config"));
            }
            p.to_path_buf()
        }
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !fs.exists(&default) {
                return Ok(RewriteConfig::default());
            }
            default
        }
    };

    let content = fs.read(&path)?;
    let config = parse(&content, &path.display().to_string())?;
    log_status!("config", "Loaded {}", path.display());
    Ok(config)
}
