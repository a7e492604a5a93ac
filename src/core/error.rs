//! Typed error contract for snackswap.
//!
//! Every fallible operation returns [`Error`], a structured value carrying a
//! stable [`ErrorCode`], a human message, and JSON details for the CLI envelope.

use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCode {
    ConfigInvalidJson,
    ConfigInvalidValue,

    ValidationMissingArgument,
    ValidationInvalidArgument,

    RulePatternInvalid,

    FileNotFound,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",
            ErrorCode::ValidationMissingArgument => "validation.missing_argument",
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",
            ErrorCode::RulePatternInvalid => "rule.pattern_invalid",
            ErrorCode::FileNotFound => "file.not_found",
            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

/// Actionable suggestion attached to an error.
#[derive(Debug, Clone, Serialize)]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub retryable: Option<bool>,
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        message: impl Into<String>,
        id: Option<String>,
        tried: Option<Vec<String>>,
    ) -> Self {
        let field = field.into();
        Self::new(
            ErrorCode::ValidationInvalidArgument,
            message,
            json!({ "field": field, "id": id, "tried": tried }),
        )
    }

    pub fn validation_missing_argument(fields: Vec<String>) -> Self {
        Self::new(
            ErrorCode::ValidationMissingArgument,
            format!("Missing required argument: {}", fields.join(", ")),
            json!({ "fields": fields }),
        )
    }

    pub fn config_invalid_json(path: impl Into<String>, error: impl fmt::Display) -> Self {
        let path = path.into();
        Self::new(
            ErrorCode::ConfigInvalidJson,
            format!("Invalid JSON in {}: {}", path, error),
            json!({ "path": path, "error": error.to_string() }),
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let problem = problem.into();
        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("Invalid value for '{}': {}", key, problem),
            json!({ "key": key, "value": value, "problem": problem }),
        )
    }

    pub fn rule_pattern_invalid(
        rule: impl Into<String>,
        pattern: impl Into<String>,
        error: impl fmt::Display,
    ) -> Self {
        let rule = rule.into();
        let pattern = pattern.into();
        Self::new(
            ErrorCode::RulePatternInvalid,
            format!("Rule '{}' has an invalid pattern: {}", rule, error),
            json!({ "rule": rule, "pattern": pattern, "error": error.to_string() }),
        )
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            ErrorCode::FileNotFound,
            format!("File not found: {}", path),
            json!({ "path": path }),
        )
    }

    pub fn internal_io(message: impl Into<String>, context: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalIoError,
            message,
            json!({ "context": context }),
        )
    }

    pub fn internal_json(message: impl Into<String>, context: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalJsonError,
            message,
            json!({ "context": context }),
        )
    }

    pub fn internal_unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalUnexpected, message, Value::Null)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_have_dotted_names() {
        assert_eq!(ErrorCode::FileNotFound.as_str(), "file.not_found");
        assert_eq!(
            ErrorCode::RulePatternInvalid.as_str(),
            "rule.pattern_invalid"
        );
    }

    #[test]
    fn display_uses_message() {
        let err = Error::file_not_found("lib/a.dart");
        assert_eq!(err.to_string(), "File not found: lib/a.dart");
        assert_eq!(err.details["path"], "lib/a.dart");
    }

    #[test]
    fn hints_accumulate() {
        let err = Error::config_invalid_value("rule_set", Some("fancy".into()), "unknown set")
            .with_hint("Use: simple, complex, all");
        assert_eq!(err.hints.len(), 1);
        assert_eq!(err.code, ErrorCode::ConfigInvalidValue);
    }
}
