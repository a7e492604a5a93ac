//! File rewriter — apply a rule set to files on disk.
//!
//! Per file: load the text, inject the notification service declaration when
//! the idiom is present and the service is not yet referenced, apply every rule
//! in order, then write back only if the text changed.
//!
//! Rule templates never reproduce the invocation root, so a second pass over a
//! rewritten file is a no-op.

use std::path::{Path, PathBuf};

use crate::error::{ErrorCode, Result};
use crate::local_files::FileSystem;
use crate::output::{FileOutcome, RuleHit, RunReport};
use crate::rules::{Injection, RuleSet};

/// Whether computed changes reach the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Write,
    DryRun,
}

/// The in-memory result of rewriting one file's text.
#[derive(Debug, Clone)]
pub struct Rewrite {
    pub content: String,
    pub injected: bool,
    pub hits: Vec<RuleHit>,
}

/// Insert the service declaration after the last existing declaration.
///
/// Returns `None` when the root token is absent, the service is already
/// referenced, or the file has no declaration to anchor on.
pub fn inject_declaration(text: &str, injection: &Injection) -> Option<String> {
    if !text.contains(&injection.root_token) || injection.is_referenced(text) {
        return None;
    }

    let last = injection.declaration_pattern.find_iter(text).last()?;
    let at = last.end();

    let mut out = String::with_capacity(text.len() + injection.declaration.len() + 1);
    out.push_str(&text[..at]);
    out.push('\n');
    out.push_str(&injection.declaration);
    out.push_str(&text[at..]);
    Some(out)
}

/// Apply injection and every rule, in order, to `text`.
pub fn rewrite_content(text: &str, rule_set: &RuleSet) -> Rewrite {
    let mut content = text.to_string();
    let mut injected = false;

    if let Some(injection) = &rule_set.injection {
        if let Some(updated) = inject_declaration(&content, injection) {
            content = updated;
            injected = true;
        }
    }

    let mut hits = Vec::new();
    for rule in &rule_set.rules {
        let (next, count) = rule.apply(&content);
        if count > 0 {
            hits.push(RuleHit {
                rule: rule.name.clone(),
                replacements: count,
            });
            content = next;
        }
    }

    Rewrite {
        content,
        injected,
        hits,
    }
}

/// Rewrite a single file. Errors carry the underlying I/O message.
pub fn rewrite_file<F: FileSystem + ?Sized>(
    fs: &F,
    path: &Path,
    rule_set: &RuleSet,
    mode: WriteMode,
) -> Result<FileOutcome> {
    if !fs.exists(path) {
        return Ok(FileOutcome::not_found(path));
    }

    let original = fs.read(path)?;
    let rewrite = rewrite_content(&original, rule_set);

    if rewrite.content == original {
        return Ok(FileOutcome::unchanged(path));
    }

    if mode == WriteMode::Write {
        fs.write(path, &rewrite.content)?;
    }

    Ok(FileOutcome::modified(path, rewrite.injected, rewrite.hits))
}

/// Process every path in order. A failure on one file never stops the run.
pub fn run<F: FileSystem + ?Sized>(
    fs: &F,
    paths: &[PathBuf],
    rule_set: &RuleSet,
    mode: WriteMode,
) -> RunReport {
    log_status!(
        "run",
        "Applying {} rules ({}) to {} files",
        rule_set.rules.len(),
        rule_set.name,
        paths.len()
    );

    let mut report = RunReport::new(&rule_set.name, mode == WriteMode::DryRun);

    for path in paths {
        let outcome = match rewrite_file(fs, path, rule_set, mode) {
            Ok(outcome) => outcome,
            // Removed between the existence check and the read
            Err(e) if e.code == ErrorCode::FileNotFound => FileOutcome::not_found(path),
            Err(e) => FileOutcome::errored(path, e.message),
        };
        report.record(outcome);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::local_files::local;
    use crate::output::FileStatus;
    use crate::rules::{RuleSetKind, DEFAULT_DECLARATION};
    use tempfile::tempdir;

    const PAGE: &str = r#"import 'package:flutter/material.dart';
import '../../theme/app_theme.dart';

class SettingsPage extends StatelessWidget {
  void _save(BuildContext context) {
    ScaffoldMessenger.of(context).showSnackBar(
      const SnackBar(
        content: Text('Saved'),
        backgroundColor: Colors.green,
      ),
    );
  }

  void _fail(BuildContext context) {
    ScaffoldMessenger.of(context).showSnackBar(const SnackBar(content: Text('Oops'), backgroundColor: AppTheme.error));
  }
}
"#;

    const PAGE_REWRITTEN: &str = r#"import 'package:flutter/material.dart';
import '../../theme/app_theme.dart';
import '../../../../../core/services/notification_service.dart';

class SettingsPage extends StatelessWidget {
  void _save(BuildContext context) {
    notificationService.success(context, 'Saved');
  }

  void _fail(BuildContext context) {
    notificationService.error(context, 'Oops');
  }
}
"#;

    const COMPLEX_PAGE: &str = r#"import 'package:flutter/material.dart';

class UploadPage {
  Future<void> _upload(BuildContext context) async {
    ScaffoldMessenger.of(context).showSnackBar(
      const SnackBar(
        content: Row(
          children: [
            SizedBox(
              width: 20,
              height: 20,
              child: CircularProgressIndicator(color: Colors.white),
            ),
            SizedBox(width: 16),
            Text('Uploading...'),
          ],
        ),
        backgroundColor: AppTheme.primaryBlue,
        duration: Duration(seconds: 30),
      ),
    );
    await _send();
    ScaffoldMessenger.of(context).hideCurrentSnackBar();
    ScaffoldMessenger.of(context).showSnackBar(
      const SnackBar(
        content: Row(
          children: [
            Icon(Icons.check_circle, color: Colors.white),
            SizedBox(width: 8),
            Text('Upload complete'),
          ],
        ),
        backgroundColor: AppTheme.success,
        duration: Duration(seconds: 2),
      ),
    );
    ScaffoldMessenger.of(context).showSnackBar(const SnackBar(content: Text('Uploaded'), backgroundColor: AppTheme.success));
  }
}
"#;

    fn simple() -> RuleSet {
        RuleSetKind::Simple.build().unwrap()
    }

    #[test]
    fn concrete_scenario_rewrites_and_stays_put() {
        let input = "ScaffoldMessenger.of(context).showSnackBar(const SnackBar(content: Text('Saved'), backgroundColor: Colors.green));";
        let first = rewrite_content(input, &simple());
        assert_eq!(first.content, "notificationService.success(context, 'Saved');");

        let second = rewrite_content(&first.content, &simple());
        assert_eq!(second.content, first.content);
        assert!(second.hits.is_empty());
    }

    #[test]
    fn rewrites_page_and_injects_once() {
        let rewrite = rewrite_content(PAGE, &simple());
        assert_eq!(rewrite.content, PAGE_REWRITTEN);
        assert!(rewrite.injected);
        assert_eq!(rewrite.content.matches(DEFAULT_DECLARATION).count(), 1);
        assert_eq!(rewrite.hits.len(), 2);
    }

    #[test]
    fn rewriting_is_idempotent() {
        for kind in [RuleSetKind::Simple, RuleSetKind::Complex, RuleSetKind::All] {
            let set = kind.build().unwrap();
            for input in [PAGE, COMPLEX_PAGE] {
                let once = rewrite_content(input, &set).content;
                let twice = rewrite_content(&once, &set).content;
                assert_eq!(once, twice, "second {} pass changed output", kind.as_str());
            }
        }
    }

    #[test]
    fn file_without_idiom_is_untouched() {
        let input = "import 'package:flutter/material.dart';\n\nclass Plain {}\n";
        let rewrite = rewrite_content(input, &RuleSetKind::All.build().unwrap());
        assert_eq!(rewrite.content, input);
        assert!(!rewrite.injected);
    }

    #[test]
    fn injection_skipped_when_service_already_referenced() {
        let input = "import 'package:app/core/services/notification_service.dart';\n\nvoid f() { ScaffoldMessenger.of(context); }\n";
        let injection = Injection::new(DEFAULT_DECLARATION).unwrap();
        assert!(inject_declaration(input, &injection).is_none());
    }

    #[test]
    fn injection_skipped_without_declarations() {
        let input = "void f() { ScaffoldMessenger.of(context).hideCurrentSnackBar(); }\n";
        let injection = Injection::new(DEFAULT_DECLARATION).unwrap();
        assert!(inject_declaration(input, &injection).is_none());
    }

    #[test]
    fn injection_only_after_last_occurrence() {
        // The same declaration appearing twice must still yield a single insertion.
        let input = "import 'a.dart';\nimport 'b.dart';\nimport 'a.dart';\n\nScaffoldMessenger\n";
        let injection = Injection::new("import 'svc/notification_service.dart';").unwrap();
        let out = inject_declaration(input, &injection).unwrap();
        assert_eq!(
            out,
            "import 'a.dart';\nimport 'b.dart';\nimport 'a.dart';\nimport 'svc/notification_service.dart';\n\nScaffoldMessenger\n"
        );
    }

    #[test]
    fn all_set_rewrites_each_shape_once() {
        let set = RuleSetKind::All.build().unwrap();
        let rewrite = rewrite_content(COMPLEX_PAGE, &set);

        assert!(rewrite
            .content
            .contains("    notificationService.showLoading(context, 'Uploading...');\n"));
        assert!(rewrite
            .content
            .contains("    // Loading notification dismisses itself\n"));
        assert!(rewrite
            .content
            .contains("    notificationService.success(context, 'Uploaded');\n"));
        assert!(rewrite
            .content
            .contains("    notificationService.success(context, 'Upload complete');\n"));
        assert!(!rewrite.content.contains("showSnackBar"));
        assert_eq!(rewrite.content.matches("notificationService.").count(), 3);

        let names: Vec<&str> = rewrite.hits.iter().map(|h| h.rule.as_str()).collect();
        assert_eq!(
            names,
            vec!["loading-row", "success-icon-row", "hide-current", "success-theme"]
        );
    }

    const UNMATCHED_PAGE: &str = r#"import 'package:flutter/material.dart';

void notify(BuildContext context, String msg) {
  ScaffoldMessenger.of(context).showSnackBar(SnackBar(content: Text(msg)));
}
"#;

    #[test]
    fn custom_declaration_is_injected_once_across_passes() {
        let declaration = "import 'package:app/services/notifier.dart';";
        let set = simple().with_injection(Some(Injection::new(declaration).unwrap()));

        let first = rewrite_content(UNMATCHED_PAGE, &set);
        assert!(first.injected);
        assert_eq!(first.content.matches(declaration).count(), 1);

        let second = rewrite_content(&first.content, &set);
        assert!(!second.injected);
        assert_eq!(second.content, first.content);
    }

    #[test]
    fn root_token_without_shape_only_injects() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chat_page.dart");
        std::fs::write(&path, UNMATCHED_PAGE).unwrap();

        let first = rewrite_file(&local(), &path, &simple(), WriteMode::Write).unwrap();
        assert_eq!(first.status, FileStatus::Modified);
        assert!(first.injected);
        assert_eq!(first.replacements, 0);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            format!(
                "import 'package:flutter/material.dart';\n{}\n\nvoid notify(BuildContext context, String msg) {{\n  ScaffoldMessenger.of(context).showSnackBar(SnackBar(content: Text(msg)));\n}}\n",
                DEFAULT_DECLARATION
            )
        );

        let second = rewrite_file(&local(), &path, &simple(), WriteMode::Write).unwrap();
        assert_eq!(second.status, FileStatus::Unchanged);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn rewrite_file_writes_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings_page.dart");
        std::fs::write(&path, PAGE).unwrap();

        let outcome = rewrite_file(&local(), &path, &simple(), WriteMode::Write).unwrap();
        assert_eq!(outcome.status, FileStatus::Modified);
        assert!(outcome.injected);
        assert_eq!(outcome.replacements, 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), PAGE_REWRITTEN);

        let again = rewrite_file(&local(), &path, &simple(), WriteMode::Write).unwrap();
        assert_eq!(again.status, FileStatus::Unchanged);
    }

    #[test]
    fn dry_run_leaves_file_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings_page.dart");
        std::fs::write(&path, PAGE).unwrap();

        let outcome = rewrite_file(&local(), &path, &simple(), WriteMode::DryRun).unwrap();
        assert_eq!(outcome.status, FileStatus::Modified);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), PAGE);
    }

    #[test]
    fn run_isolates_missing_and_unreadable_files() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first.dart");
        let missing = dir.path().join("missing.dart");
        let binary = dir.path().join("binary.dart");
        let second = dir.path().join("second.dart");
        std::fs::write(&first, PAGE).unwrap();
        std::fs::write(&binary, b"\xff\xfe\xfd").unwrap();
        std::fs::write(&second, PAGE).unwrap();

        let paths = vec![first.clone(), missing, binary, second.clone()];
        let report = run(&local(), &paths, &simple(), WriteMode::Write);

        assert_eq!(report.total, 4);
        assert_eq!(report.modified, 2);
        assert_eq!(report.missing, 1);
        assert_eq!(report.errors, 1);
        assert_eq!(report.files[1].status, FileStatus::NotFound);
        assert_eq!(report.files[2].status, FileStatus::Errored);
        assert_eq!(std::fs::read_to_string(&first).unwrap(), PAGE_REWRITTEN);
        assert_eq!(std::fs::read_to_string(&second).unwrap(), PAGE_REWRITTEN);

        let text = report.to_string();
        assert!(text.contains(&format!("File not found: {}", paths[1].display())));
        assert!(text.ends_with("Done! 2 files modified out of 4"));
    }

    struct ReadOnlyFs {
        files: std::collections::HashMap<PathBuf, String>,
    }

    impl FileSystem for ReadOnlyFs {
        fn exists(&self, path: &Path) -> bool {
            self.files.contains_key(path)
        }

        fn read(&self, path: &Path) -> Result<String> {
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| Error::file_not_found(path.display().to_string()))
        }

        fn write(&self, _path: &Path, _content: &str) -> Result<()> {
            Err(Error::internal_io(
                "Permission denied (os error 13)",
                Some("write temp file".to_string()),
            ))
        }
    }

    #[test]
    fn write_failure_is_reported_and_run_continues() {
        let mut files = std::collections::HashMap::new();
        files.insert(PathBuf::from("lib/a.dart"), PAGE.to_string());
        files.insert(PathBuf::from("lib/b.dart"), "class B {}\n".to_string());
        let fs = ReadOnlyFs { files };

        let paths = vec![PathBuf::from("lib/a.dart"), PathBuf::from("lib/b.dart")];
        let report = run(&fs, &paths, &simple(), WriteMode::Write);

        assert_eq!(report.errors, 1);
        assert_eq!(report.unchanged, 1);
        assert_eq!(
            report.files[0].to_string(),
            "Error with lib/a.dart: Permission denied (os error 13)"
        );
    }
}
