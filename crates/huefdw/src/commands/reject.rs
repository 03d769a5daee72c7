//! `insert` / `delete` -- always refused.
//!
//! The adapter is still built so a bad profile reports the same errors as
//! any other command, but no request ever reaches the bridge.

use huefdw_core::{Rejection, ResourceAdapter, ResourceKind};

use crate::cli::{DeleteArgs, GlobalOpts, InsertArgs, OutputFormat};
use crate::commands::util;
use crate::config;
use crate::error::CliError;
use crate::output;

#[allow(clippy::needless_pass_by_value)]
pub fn insert(args: InsertArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let kind = ResourceKind::from(args.kind);
    let values = args
        .assignments
        .iter()
        .map(|a| util::parse_assignment(a))
        .collect::<Result<Vec<_>, _>>()?;
    let adapter = adapter(global, kind)?;
    refuse(&adapter.reject_insert(values), global)
}

#[allow(clippy::needless_pass_by_value)]
pub fn delete(args: DeleteArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let kind = ResourceKind::from(args.kind);
    let adapter = adapter(global, kind)?;
    refuse(&adapter.reject_delete(&args.id), global)
}

fn adapter(global: &GlobalOpts, kind: ResourceKind) -> Result<ResourceAdapter, CliError> {
    let adapter_config = config::build_adapter_config(global, kind)?;
    Ok(ResourceAdapter::new(adapter_config, &[] as &[&str])?)
}

fn refuse(rejection: &Rejection, global: &GlobalOpts) -> Result<(), CliError> {
    if !matches!(global.output, OutputFormat::Table) {
        let out = output::render_single(
            global.output,
            rejection,
            ToString::to_string,
            |r| output::plain(&r.payload),
        );
        output::print_output(&out, global.quiet);
    }
    Err(CliError::Refused {
        message: rejection.to_string(),
    })
}
