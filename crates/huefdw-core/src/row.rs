// ── Rows ──
//
// `Row` is one flattened bridge entry. `Rows` walks a fetched snapshot and
// builds rows on demand; nothing is flattened for entries a qualifier drops.

use std::iter::FusedIterator;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::column::{Coercion, ColumnSpec};
use crate::kind::KvType;
use crate::qualifier::{Operator, Qualifier};

/// One output row: external column name → value, in projection order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row(IndexMap<String, Value>);

impl Row {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.0
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A qualifier whose column and operator have been resolved.
#[derive(Debug, Clone)]
pub(crate) struct Filter {
    pub(crate) spec: &'static ColumnSpec,
    pub(crate) operator: Operator,
    pub(crate) value: Value,
}

impl Filter {
    fn passes(&self, key: &str, entry: &Value, kv_type: KvType) -> bool {
        let lhs = self.spec.read(key, entry, kv_type);
        // Key-value columns compare by structure, not by their JSON text;
        // pattern operators still see the text.
        if self.spec.coercion == Coercion::KeyValue && !self.operator.is_pattern() {
            return self.operator.apply(&parse_text(lhs), &self.value);
        }
        self.operator.apply(&lhs, &self.value)
    }
}

/// JSON text back into the value it encodes. Anything else is unchanged.
fn parse_text(value: Value) -> Value {
    match value {
        Value::String(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        other => other,
    }
}

/// Lazy, single-pass iterator over the rows of one fetch.
///
/// The snapshot is owned; fetch again for a fresh pass.
#[derive(Debug)]
pub struct Rows {
    entries: std::vec::IntoIter<(String, Value)>,
    projection: Vec<&'static ColumnSpec>,
    filters: Vec<Filter>,
    kv_type: KvType,
    skipped: Vec<Qualifier>,
}

impl Rows {
    pub(crate) fn new(
        entries: Vec<(String, Value)>,
        projection: Vec<&'static ColumnSpec>,
        filters: Vec<Filter>,
        kv_type: KvType,
        skipped: Vec<Qualifier>,
    ) -> Self {
        Self {
            entries: entries.into_iter(),
            projection,
            filters,
            kv_type,
            skipped,
        }
    }

    /// Qualifiers that were not applied because their operator is unknown.
    pub fn skipped_qualifiers(&self) -> &[Qualifier] {
        &self.skipped
    }

    /// Output columns, in order.
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.projection.iter().map(|c| c.name)
    }

    fn build_row(&self, key: &str, entry: &Value) -> Row {
        self.projection
            .iter()
            .map(|spec| (spec.name.to_owned(), spec.read(key, entry, self.kv_type)))
            .collect()
    }
}

impl Iterator for Rows {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        loop {
            let (key, entry) = self.entries.next()?;
            if self
                .filters
                .iter()
                .all(|f| f.passes(&key, &entry, self.kv_type))
            {
                return Some(self.build_row(&key, &entry));
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.entries.len();
        if self.filters.is_empty() {
            (remaining, Some(remaining))
        } else {
            (0, Some(remaining))
        }
    }
}

impl FusedIterator for Rows {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::column::ColumnMap;
    use crate::kind::ResourceKind;
    use serde_json::json;

    fn entries() -> Vec<(String, Value)> {
        vec![
            ("1".into(), json!({"name": "Hall", "state": {"on": true}})),
            ("2".into(), json!({"name": "Desk", "state": {"on": false}})),
        ]
    }

    #[test]
    fn yields_projection_in_order() {
        let map = ColumnMap::for_kind(ResourceKind::Lights);
        let projection = vec![
            map.get("light_name").unwrap(),
            map.get("light_id").unwrap(),
        ];
        let rows: Vec<Row> =
            Rows::new(entries(), projection, vec![], KvType::Json, vec![]).collect();

        assert_eq!(rows.len(), 2);
        let cols: Vec<_> = rows[0].columns().collect();
        assert_eq!(cols, vec!["light_name", "light_id"]);
        assert_eq!(rows[1].get("light_id"), Some(&json!(2)));
    }

    #[test]
    fn filter_on_unprojected_column() {
        let map = ColumnMap::for_kind(ResourceKind::Lights);
        let filters = vec![Filter {
            spec: map.get("is_on").unwrap(),
            operator: Operator::Eq,
            value: json!("f"),
        }];
        let mut rows = Rows::new(
            entries(),
            vec![map.get("light_name").unwrap()],
            filters,
            KvType::Json,
            vec![],
        );

        assert_eq!(rows.size_hint(), (0, Some(2)));
        let row = rows.next().unwrap();
        assert_eq!(row.get("light_name"), Some(&json!("Desk")));
        assert_eq!(row.get("is_on"), None);
        assert!(rows.next().is_none());
        assert!(rows.next().is_none());
    }

    #[test]
    fn key_value_filter_ignores_json_spacing() {
        let map = ColumnMap::for_kind(ResourceKind::Lights);
        let entries = vec![
            ("1".into(), json!({"name": "Hall", "pointsymbol": {"1": "none"}})),
            ("2".into(), json!({"name": "Desk", "pointsymbol": {"1": "0a00f1f01f1f1001"}})),
        ];
        let filter = |operator, value| Filter {
            spec: map.get("pointsymbol").unwrap(),
            operator,
            value,
        };

        for kv_type in [KvType::Json, KvType::Structured] {
            let names: Vec<_> = Rows::new(
                entries.clone(),
                vec![map.get("light_name").unwrap()],
                vec![filter(Operator::Eq, json!(r#"{"1": "none"}"#))],
                kv_type,
                vec![],
            )
            .map(|r| r.get("light_name").cloned())
            .collect();
            assert_eq!(names, vec![Some(json!("Hall"))], "{kv_type}");
        }

        let liked: Vec<_> = Rows::new(
            entries,
            vec![map.get("light_name").unwrap()],
            vec![filter(Operator::Like, json!("%0a00%"))],
            KvType::Json,
            vec![],
        )
        .collect();
        assert_eq!(liked.len(), 1);
        assert_eq!(liked[0].get("light_name"), Some(&json!("Desk")));
    }

    #[test]
    fn row_serializes_as_object() {
        let row: Row = [("a".to_string(), json!(1)), ("b".to_string(), Value::Null)]
            .into_iter()
            .collect();
        assert_eq!(serde_json::to_value(&row).unwrap(), json!({"a": 1, "b": null}));
    }
}
