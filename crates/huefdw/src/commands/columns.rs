//! `columns` -- show the column map of a resource table. No bridge needed.

use tabled::Tabled;

use huefdw_core::{Coercion, ColumnMap, ColumnSpec, FieldSource, ResourceKind};

use crate::cli::{ColumnsArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ColumnRow {
    #[tabled(rename = "Column")]
    name: &'static str,
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Type")]
    coercion: &'static str,
    #[tabled(rename = "Mutable")]
    mutable: String,
}

fn column_row(spec: &ColumnSpec, kind: ResourceKind, color: bool) -> ColumnRow {
    let field = match spec.source {
        FieldSource::Key => format!("(key of {kind})"),
        FieldSource::Path(path) => path.to_owned(),
    };
    let coercion = match spec.coercion {
        Coercion::Plain => "plain",
        Coercion::Integer => "integer",
        Coercion::Boolean => "boolean",
        Coercion::KeyValue => "key-value",
    };
    let mutable = if spec.mutable {
        output::status("yes", true, color)
    } else {
        "no".into()
    };
    ColumnRow {
        name: spec.name,
        field,
        coercion,
        mutable,
    }
}

#[allow(clippy::needless_pass_by_value, clippy::unnecessary_wraps)]
pub fn handle(args: ColumnsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let kind = ResourceKind::from(args.kind);
    let map = ColumnMap::for_kind(kind);
    let specs: Vec<ColumnSpec> = if args.mutable {
        map.mutable_columns().copied().collect()
    } else {
        map.iter().copied().collect()
    };

    let color = output::should_color(global.color);
    let out = output::render_list(
        global.output,
        &specs,
        |s| column_row(s, kind, color),
        |s| s.name.to_owned(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
