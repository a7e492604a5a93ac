//! Rewrite rules — ordered (pattern, template) pairs that retire inline
//! `ScaffoldMessenger.showSnackBar(...)` calls in favor of `notificationService`.
//!
//! Patterns span whole invocations, so they are compiled with multi-line and
//! dot-matches-newline enabled. Templates reference captures as `${1}`.

use regex::{Captures, Regex, RegexBuilder};
use serde::Serialize;

use crate::error::{Error, Result};

// ============================================================================
// Types
// ============================================================================

/// One recognized invocation shape and its canonical replacement.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub pattern: Regex,
    pub template: String,
}

impl Rule {
    pub fn new(name: &str, pattern: &str, template: &str) -> Result<Self> {
        let compiled = RegexBuilder::new(pattern)
            .multi_line(true)
            .dot_matches_new_line(true)
            .build()
            .map_err(|e| Error::rule_pattern_invalid(name, pattern, e))?;

        Ok(Rule {
            name: name.to_string(),
            pattern: compiled,
            template: template.to_string(),
        })
    }

    /// Rewrite every non-overlapping match in `text`.
    /// Returns (new_text, replacement_count).
    pub fn apply(&self, text: &str) -> (String, usize) {
        let mut count = 0usize;

        let replaced = self
            .pattern
            .replace_all(text, |caps: &Captures| {
                count += 1;
                let mut out = String::new();
                caps.expand(&self.template, &mut out);
                out
            })
            .into_owned();

        (replaced, count)
    }
}

/// The dependency-declaration injection rule.
#[derive(Debug, Clone)]
pub struct Injection {
    /// Substring whose presence means the idiom may be in the file.
    pub root_token: String,
    /// Substring whose presence means the service is already referenced.
    pub service_marker: String,
    /// Matches one existing dependency declaration.
    pub declaration_pattern: Regex,
    /// Line inserted after the last existing declaration.
    pub declaration: String,
}

pub const DEFAULT_ROOT_TOKEN: &str = "ScaffoldMessenger";
pub const DEFAULT_DECLARATION: &str =
    "import '../../../../../core/services/notification_service.dart';";
const DECLARATION_PATTERN: &str = r"import '([^']*)';";

impl Injection {
    /// The service marker is the file name the declaration imports, so any
    /// existing import of that file (whatever its relative path) counts.
    pub fn new(declaration: &str) -> Result<Self> {
        let declaration_pattern = Regex::new(DECLARATION_PATTERN)
            .map_err(|e| Error::rule_pattern_invalid("declaration", DECLARATION_PATTERN, e))?;

        let service_marker = declaration_pattern
            .captures(declaration)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .and_then(|path| path.rsplit('/').next())
            .filter(|name| !name.is_empty())
            .unwrap_or(declaration.trim())
            .to_string();

        Ok(Injection {
            root_token: DEFAULT_ROOT_TOKEN.to_string(),
            service_marker,
            declaration_pattern,
            declaration: declaration.to_string(),
        })
    }

    /// Whether `text` already references the service.
    pub fn is_referenced(&self, text: &str) -> bool {
        text.contains(&self.service_marker) || text.contains(self.declaration.trim())
    }
}

/// An ordered collection of rules scoped to one retirement scenario.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub name: String,
    pub injection: Option<Injection>,
    pub rules: Vec<Rule>,
}

/// Listing form of a rule.
#[derive(Debug, Clone, Serialize)]
pub struct RuleSummary {
    pub name: String,
    pub pattern: String,
    pub template: String,
}

impl RuleSet {
    /// Append rules after the built-in ones.
    pub fn with_rules(mut self, extra: Vec<Rule>) -> Self {
        self.rules.extend(extra);
        self
    }

    pub fn with_injection(mut self, injection: Option<Injection>) -> Self {
        self.injection = injection;
        self
    }

    pub fn summaries(&self) -> Vec<RuleSummary> {
        self.rules
            .iter()
            .map(|r| RuleSummary {
                name: r.name.clone(),
                pattern: r.pattern.as_str().to_string(),
                template: r.template.clone(),
            })
            .collect()
    }
}

/// Which built-in rule set to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSetKind {
    /// Single-line content keyed by background color.
    Simple,
    /// Multi-line composite content, actions and dismiss calls.
    Complex,
    /// Complex rules followed by simple rules.
    All,
}

impl RuleSetKind {
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "simple" => Ok(RuleSetKind::Simple),
            "complex" => Ok(RuleSetKind::Complex),
            "all" => Ok(RuleSetKind::All),
            _ => Err(Error::validation_invalid_argument(
                "rule_set",
                format!("Unknown rule set '{}'. Use: simple, complex, all", s),
                None,
                Some(vec!["simple".into(), "complex".into(), "all".into()]),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleSetKind::Simple => "simple",
            RuleSetKind::Complex => "complex",
            RuleSetKind::All => "all",
        }
    }

    /// Compile the rule set with the default dependency declaration.
    pub fn build(&self) -> Result<RuleSet> {
        let rules = match self {
            RuleSetKind::Simple => simple_rules()?,
            RuleSetKind::Complex => complex_rules()?,
            RuleSetKind::All => {
                let mut rules = complex_rules()?;
                rules.extend(simple_rules()?);
                rules
            }
        };

        Ok(RuleSet {
            name: self.as_str().to_string(),
            injection: Some(Injection::new(DEFAULT_DECLARATION)?),
            rules,
        })
    }
}

// ============================================================================
// Built-in rules
// ============================================================================

/// Shared head of every `showSnackBar` pattern.
const SHOW: &str = r"ScaffoldMessenger\.of\(context\)\.showSnackBar\(\s*";

fn simple_rules() -> Result<Vec<Rule>> {
    let text = r"const SnackBar\(\s*content: Text\('([^']+)'\),\s*";
    let tail = r",?\s*(?:duration: [^,)]+)?\),?\s*\);";

    let table: [(&str, &str, &str); 5] = [
        ("success-green", r"backgroundColor: Colors\.green[^)]*", "success"),
        ("error-red", r"backgroundColor: Colors\.red[^)]*", "error"),
        ("success-theme", r"backgroundColor: AppTheme\.success", "success"),
        ("error-theme", r"backgroundColor: AppTheme\.error", "error"),
        ("warning-theme", r"backgroundColor: AppTheme\.warning", "warning"),
    ];

    table
        .iter()
        .map(|(name, color, severity)| {
            let pattern = format!("{}{}{}{}", SHOW, text, color, tail);
            let template = format!("notificationService.{}(context, '${{1}}');", severity);
            Rule::new(name, &pattern, &template)
        })
        .collect()
}

fn complex_rules() -> Result<Vec<Rule>> {
    let loading = format!(
        "{}{}",
        SHOW,
        r"const SnackBar\(\s*content: Row\(\s*children: \[\s*SizedBox\(\s*width: 20,\s*height: 20,\s*child: CircularProgressIndicator\([^)]*\),\s*\),\s*SizedBox\(width: 16\),\s*Text\('([^']+)'\),\s*\],\s*\),\s*backgroundColor: [^,]*,\s*duration: [^,)]*\),?\s*\),?\s*\);"
    );
    let icon = format!(
        "{}{}",
        SHOW,
        r"const SnackBar\(\s*content: Row\(\s*children: \[\s*Icon\(Icons\.check_circle, color: Colors\.white\),\s*SizedBox\(width: 8\),\s*Text\('([^']+)'\),\s*\],\s*\),\s*backgroundColor: AppTheme\.success,\s*duration: Duration\(seconds: \d+\),\s*\),\s*\);"
    );
    let pin = format!(
        "{}{}",
        SHOW,
        r"const SnackBar\(\s*content: Text\('📍 ([^']+)'\),\s*backgroundColor: AppTheme\.success,\s*duration: Duration\(seconds: \d+\),\s*\),\s*\);"
    );
    let action = format!(
        "{}{}",
        SHOW,
        r"SnackBar\(\s*content: Text\([^)]+\),\s*backgroundColor: AppTheme\.error,\s*duration: const Duration\(seconds: \d+\),\s*action: SnackBarAction\(\s*label: '([^']+)',\s*onPressed: [^,]+,\s*textColor: Colors\.white,\s*\),\s*\),\s*\);"
    );

    Ok(vec![
        Rule::new(
            "loading-row",
            &loading,
            "notificationService.showLoading(context, '${1}');",
        )?,
        Rule::new(
            "success-icon-row",
            &icon,
            "notificationService.success(context, '${1}');",
        )?,
        Rule::new(
            "success-pin-label",
            &pin,
            "notificationService.success(context, '${1}');",
        )?,
        Rule::new(
            "error-with-action",
            &action,
            "// TODO: migrate error notification with '${1}' action manually",
        )?,
        Rule::new(
            "hide-current",
            r"ScaffoldMessenger\.of\(context\)\.hideCurrentSnackBar\(\);",
            "// Loading notification dismisses itself",
        )?,
    ])
}
