// ── Mutation translator ──
//
// Changed-column values → PUT body. Fields are written relative to the
// endpoint's object: for lights the endpoint is `lights/{id}/state`, so
// `state.bri` becomes `bri`.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::column::{ColumnMap, insert_path};
use crate::outcome::{FailureReason, FieldFailure};

/// Bridge field carrying the fade duration of a light change, in 100 ms
/// steps.
pub const TRANSITION_TIME_FIELD: &str = "transitiontime";

/// Result of translating one set of changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Translation {
    /// The PUT body, including injected parameters.
    pub body: Map<String, Value>,
    /// Endpoint-relative field path → column that produced it.
    pub fields: IndexMap<String, String>,
    /// Changes refused before any request.
    pub rejected: Vec<FieldFailure>,
}

impl Translation {
    /// No column survived, so there is nothing to send.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Map a bridge status address back to the column that caused it.
    ///
    /// `prefix` is the endpoint address (`/lights/1/state`). Nested fields
    /// (`/config/swupdate/checkforupdate`) resolve to the column that wrote
    /// their top-level object.
    pub fn column_for_address(&self, prefix: &str, address: &str) -> Option<&str> {
        let relative = address
            .strip_prefix(prefix)
            .unwrap_or(address)
            .trim_start_matches('/');
        let relative = relative.replace('/', ".");
        self.fields
            .iter()
            .find(|(path, _)| {
                relative == **path
                    || relative
                        .strip_prefix(path.as_str())
                        .is_some_and(|rest| rest.starts_with('.'))
            })
            .map(|(_, column)| column.as_str())
    }
}

/// Builds PUT bodies for one adapter.
#[derive(Debug, Clone)]
pub struct MutationTranslator<'a> {
    columns: &'a ColumnMap,
    transition_time: Option<u16>,
}

impl<'a> MutationTranslator<'a> {
    pub fn new(columns: &'a ColumnMap, transition_time: Option<u16>) -> Self {
        Self {
            columns,
            transition_time,
        }
    }

    pub fn translate<I, K>(&self, changes: I) -> Translation
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let scope = self.columns.kind().mutation_scope();
        let mut out = Translation::default();

        for (column, value) in changes {
            let column = column.as_ref();
            let Some(spec) = self.columns.get(column) else {
                out.rejected
                    .push(FieldFailure::new(column, FailureReason::UnknownColumn));
                continue;
            };
            if !spec.mutable {
                out.rejected
                    .push(FieldFailure::new(column, FailureReason::Immutable));
                continue;
            }
            let Some(path) = spec.field_path() else {
                out.rejected
                    .push(FieldFailure::new(column, FailureReason::Immutable));
                continue;
            };

            let relative = match scope {
                None => path,
                Some(scope) => match path
                    .strip_prefix(scope)
                    .and_then(|rest| rest.strip_prefix('.'))
                {
                    Some(rest) => rest,
                    None => {
                        out.rejected.push(FieldFailure::new(
                            column,
                            FailureReason::Conflict { path: path.into() },
                        ));
                        continue;
                    }
                },
            };

            if insert_path(&mut out.body, relative, spec.coercion.write(value)) {
                out.fields.insert(relative.to_owned(), column.to_owned());
            } else {
                out.rejected.push(FieldFailure::new(
                    column,
                    FailureReason::Conflict { path: path.into() },
                ));
            }
        }

        if !out.is_empty() {
            if let Some(tt) = self.transition_time {
                out.body
                    .entry(TRANSITION_TIME_FIELD)
                    .or_insert_with(|| Value::from(tt));
            }
        }

        debug!(
            kind = %self.columns.kind(),
            fields = out.fields.len(),
            rejected = out.rejected.len(),
            "translated mutation"
        );
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::kind::ResourceKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn light_changes_drop_state_prefix_and_inject_transition_time() {
        let map = ColumnMap::for_kind(ResourceKind::Lights);
        let t = MutationTranslator::new(&map, Some(4))
            .translate([("is_on", json!("t")), ("hue", json!(25000))]);

        assert_eq!(
            Value::Object(t.body),
            json!({"on": true, "hue": 25000, "transitiontime": 4})
        );
        assert!(t.rejected.is_empty());
    }

    #[test]
    fn immutable_and_unknown_never_reach_the_body() {
        let map = ColumnMap::for_kind(ResourceKind::Lights);
        let t = MutationTranslator::new(&map, Some(4)).translate([
            ("reachable", json!(true)),
            ("bogus", json!(1)),
            ("brightness", json!(10)),
        ]);

        assert_eq!(Value::Object(t.body), json!({"bri": 10, "transitiontime": 4}));
        assert_eq!(t.rejected.len(), 2);
        assert_eq!(t.rejected[0].reason, FailureReason::Immutable);
        assert_eq!(t.rejected[1].reason, FailureReason::UnknownColumn);
    }

    #[test]
    fn nothing_survives_means_empty_body() {
        let map = ColumnMap::for_kind(ResourceKind::Sensors);
        let t = MutationTranslator::new(&map, None).translate([("sensor_name", json!("Porch"))]);
        assert!(t.is_empty());
        assert!(t.body.is_empty());
    }

    #[test]
    fn config_fields_keep_their_names() {
        let map = ColumnMap::for_kind(ResourceKind::Config);
        let t = MutationTranslator::new(&map, None).translate([
            ("proxy_port", json!(8080)),
            ("link_button", json!("f")),
            ("software_update", json!(r#"{"checkforupdate": true}"#)),
        ]);
        assert_eq!(
            Value::Object(t.body.clone()),
            json!({"proxyport": 8080, "linkbutton": false, "swupdate": {"checkforupdate": true}})
        );
        assert_eq!(
            t.column_for_address("/config", "/config/swupdate/checkforupdate"),
            Some("software_update")
        );
        assert_eq!(t.column_for_address("/config", "/config/proxyport"), Some("proxy_port"));
        assert_eq!(t.column_for_address("/config", "/config/mac"), None);
    }

    #[test]
    fn light_address_maps_to_column() {
        let map = ColumnMap::for_kind(ResourceKind::Lights);
        let t = MutationTranslator::new(&map, Some(4)).translate([("color_temperature", json!(300))]);
        assert_eq!(
            t.column_for_address("/lights/1/state", "/lights/1/state/ct"),
            Some("color_temperature")
        );
        assert_eq!(t.column_for_address("/lights/1/state", "/lights/1/state/transitiontime"), None);
    }
}
