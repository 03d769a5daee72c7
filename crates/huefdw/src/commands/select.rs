//! `select` -- fetch rows from one resource table.

use tracing::debug;

use huefdw_core::{ResourceAdapter, ResourceKind, Row};

use crate::cli::{GlobalOpts, SelectArgs};
use crate::commands::util;
use crate::config;
use crate::error::CliError;
use crate::output;

pub async fn handle(args: SelectArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let kind = ResourceKind::from(args.kind);
    let qualifiers = args
        .qualifiers
        .iter()
        .map(|q| util::parse_qualifier(q))
        .collect::<Result<Vec<_>, _>>()?;

    let adapter_config = config::build_adapter_config(global, kind)?;
    let adapter = ResourceAdapter::new(adapter_config, &args.declare)?;

    let rows = adapter.fetch(&args.columns, &qualifiers).await?;
    if !global.quiet {
        for skipped in rows.skipped_qualifiers() {
            eprintln!(
                "note: '{} {} ...' was not applied (unsupported operator)",
                skipped.column, skipped.operator
            );
        }
    }
    let columns: Vec<&str> = rows.columns().collect();
    let rows: Vec<Row> = rows.collect();
    debug!(%kind, rows = rows.len(), "select finished");

    let out = output::render_rows(
        global.output,
        &columns,
        &rows,
        adapter.row_id_column(),
        output::should_color(global.color),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
