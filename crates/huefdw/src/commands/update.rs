//! `update` -- write changed columns of one row.

use std::fmt::Write;

use tracing::debug;

use huefdw_core::{MutationOutcome, ResourceAdapter, ResourceKind};

use crate::cli::{GlobalOpts, UpdateArgs};
use crate::commands::util;
use crate::config;
use crate::error::CliError;
use crate::output;

pub async fn handle(args: UpdateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let kind = ResourceKind::from(args.kind);
    let row_id = match (args.id, kind.is_singleton()) {
        (Some(id), _) => id,
        (None, true) => String::new(),
        (None, false) => {
            return Err(CliError::Validation {
                field: "id".into(),
                reason: format!("{kind} updates need a {}", kind.row_id_column()),
            });
        }
    };
    let changes = args
        .assignments
        .iter()
        .map(|a| util::parse_assignment(a))
        .collect::<Result<Vec<_>, _>>()?;

    let adapter_config = config::build_adapter_config(global, kind)?;
    let adapter = ResourceAdapter::new(adapter_config, &[] as &[&str])?;
    let outcome = adapter.mutate(&row_id, changes).await?;
    debug!(
        %kind,
        row_id = %outcome.row_id,
        sent = outcome.was_sent(),
        failures = outcome.failures.len(),
        "update finished"
    );

    let color = output::should_color(global.color);
    let out = output::render_single(
        global.output,
        &outcome,
        |o| describe(o, color),
        |o| o.applied.keys().cloned().collect::<Vec<_>>().join("\n"),
    );
    output::print_output(&out, global.quiet);

    if outcome.is_success() {
        Ok(())
    } else {
        Err(CliError::PartialUpdate {
            failed: outcome.failures.len(),
            total: outcome.applied.len() + outcome.failures.len(),
        })
    }
}

/// Human-readable outcome: one line per applied field and per failure.
fn describe(outcome: &MutationOutcome, color: bool) -> String {
    let mut out = String::new();
    let target = if outcome.kind.is_singleton() {
        outcome.kind.to_string()
    } else {
        format!("{} {}", outcome.kind, outcome.row_id)
    };

    if !outcome.was_sent() {
        let _ = writeln!(out, "{target}: nothing sent to the bridge");
    }
    for (field, value) in &outcome.applied {
        let mark = output::status("ok", true, color);
        let _ = writeln!(out, "{mark}  {target}: {field} = {}", output::plain(value));
    }
    for failure in &outcome.failures {
        let mark = output::status("failed", false, color);
        let _ = writeln!(out, "{mark}  {target}: {failure}");
    }
    out.trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use huefdw_core::{FailureReason, FieldFailure};
    use indexmap::IndexMap;
    use serde_json::json;

    #[test]
    fn describe_lists_applied_and_failed_fields() {
        let mut applied = IndexMap::new();
        applied.insert("is_on".to_string(), json!(true));
        let outcome = MutationOutcome {
            kind: ResourceKind::Lights,
            row_id: "1".into(),
            body: Some(json!({"on": true, "bri": 300})),
            applied,
            failures: vec![FieldFailure {
                column: Some("brightness".into()),
                reason: FailureReason::Bridge {
                    code: 7,
                    address: "/lights/1/state/bri".into(),
                    description: "invalid value, 300, for parameter, bri".into(),
                },
            }],
        };
        let text = describe(&outcome, false);
        assert_eq!(
            text,
            "ok  lights 1: is_on = true\n\
             failed  lights 1: brightness: bridge error 7: invalid value, 300, for parameter, bri"
        );
    }

    #[test]
    fn describe_unsent_config_update() {
        let outcome = MutationOutcome {
            kind: ResourceKind::Config,
            row_id: String::new(),
            body: None,
            applied: IndexMap::new(),
            failures: vec![FieldFailure {
                column: Some("mac".into()),
                reason: FailureReason::Immutable,
            }],
        };
        let text = describe(&outcome, false);
        assert!(text.starts_with("config: nothing sent to the bridge"));
        assert!(text.contains("mac: column is read-only"));
    }
}
