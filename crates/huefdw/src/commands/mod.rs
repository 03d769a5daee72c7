//! Command handlers, one module per subcommand.

pub mod columns;
pub mod config_cmd;
pub mod reject;
pub mod select;
pub mod update;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a table command. `config` and `completions` are handled by the
/// caller since they never talk to a bridge.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Select(args) => select::handle(args, global).await,
        Command::Update(args) => update::handle(args, global).await,
        Command::Insert(args) => reject::insert(args, global),
        Command::Delete(args) => reject::delete(args, global),
        Command::Columns(args) => columns::handle(args, global),
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Completions(_) => Err(CliError::Internal(
            "completions are generated before dispatch".into(),
        )),
    }
}
