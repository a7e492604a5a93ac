pub type CmdResult<T> = snackswap::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    pub json: bool,
}

pub mod rewrite;
pub mod rules;

/// Dispatch a command to its handler and print the result.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::emit($module::run($args, $global), $global.json)
    };
}

pub(crate) fn run(command: crate::Commands, global: &GlobalArgs) -> i32 {
    match command {
        crate::Commands::Run(args) => dispatch!(args, global, rewrite),
        crate::Commands::Rules(args) => dispatch!(args, global, rules),
    }
}
