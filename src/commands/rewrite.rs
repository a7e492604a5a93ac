use clap::Args;
use std::path::PathBuf;

use snackswap::config;
use snackswap::discover;
use snackswap::local_files::local;
use snackswap::{rewrite, RunReport, WriteMode};

use crate::commands::CmdResult;

#[derive(Args)]
pub struct RewriteArgs {
    /// Files to rewrite, in order (replaces the manifest file list)
    files: Vec<String>,

    /// Discovery glob, relative to the root (repeatable)
    #[arg(long = "glob", value_name = "PATTERN")]
    globs: Vec<String>,

    /// Skip files matching this glob (repeatable)
    #[arg(long, value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Rule set: simple, complex, all (default: simple)
    #[arg(long, value_name = "SET")]
    rule_set: Option<String>,

    /// Dependency declaration line to inject
    #[arg(long, value_name = "LINE")]
    declaration: Option<String>,

    /// Base directory for relative paths and globs
    #[arg(long)]
    root: Option<String>,

    /// Manifest path (default: ./snackswap.json when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report what would change without writing
    #[arg(long)]
    dry_run: bool,
}

pub fn run(args: RewriteArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<RunReport> {
    let mut config = config::load(args.config.as_deref())?;

    if !args.files.is_empty() || !args.globs.is_empty() {
        config.files = args.files;
        config.globs = args.globs;
    }
    config.exclude.extend(args.exclude);
    if let Some(rule_set) = args.rule_set {
        config.rule_set = rule_set;
    }
    if let Some(declaration) = args.declaration {
        config.declaration = declaration;
    }
    if args.root.is_some() {
        config.root = args.root;
    }

    let rule_set = config.build_rule_set()?;
    let paths = discover::resolve_files(
        &config.root_dir(),
        &config.files,
        &config.globs,
        &config.exclude,
    )?;

    if paths.is_empty() {
        return Err(
            snackswap::Error::validation_missing_argument(vec!["files".to_string()])
                .with_hint("Pass file paths, --glob, or list them in snackswap.json"),
        );
    }

    let mode = if args.dry_run {
        WriteMode::DryRun
    } else {
        WriteMode::Write
    };

    let report = rewrite::run(&local(), &paths, &rule_set, mode);
    let exit_code = if report.has_errors() { 3 } else { 0 };

    Ok((report, exit_code))
}
