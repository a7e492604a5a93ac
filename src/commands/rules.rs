use clap::Args;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use snackswap::config;
use snackswap::rules::RuleSummary;

use crate::commands::CmdResult;

#[derive(Args)]
pub struct RulesArgs {
    /// Rule set: simple, complex, all (default: simple)
    #[arg(long, value_name = "SET")]
    rule_set: Option<String>,

    /// Manifest path (default: ./snackswap.json when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Serialize)]
pub struct RulesOutput {
    pub rule_set: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declaration: Option<String>,
    pub rules: Vec<RuleSummary>,
}

impl fmt::Display for RulesOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rule set: {}", self.rule_set)?;
        if let Some(declaration) = &self.declaration {
            writeln!(f, "Declaration: {}", declaration)?;
        }
        for (i, rule) in self.rules.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "{}. {}", i + 1, rule.name)?;
            writeln!(f, "   pattern:  {}", rule.pattern)?;
            write!(f, "   template: {}", rule.template)?;
        }
        Ok(())
    }
}

pub fn run(args: RulesArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<RulesOutput> {
    let mut config = config::load(args.config.as_deref())?;
    if let Some(rule_set) = args.rule_set {
        config.rule_set = rule_set;
    }

    let set = config.build_rule_set()?;

    Ok((
        RulesOutput {
            rule_set: set.name.clone(),
            declaration: set.injection.as_ref().map(|i| i.declaration.clone()),
            rules: set.summaries(),
        },
        0,
    ))
}
