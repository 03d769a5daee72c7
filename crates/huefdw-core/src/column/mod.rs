// ── Column mapper ──
//
// Declarative mapping from SQL-facing column names to bridge field paths.
// Each resource kind has one static table (see `tables`); an adapter holds
// a validated subset of it for its lifetime.

mod tables;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::kind::{KvType, ResourceKind};

/// Where a column's value comes from inside one bridge entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "source", content = "path")]
pub enum FieldSource {
    /// The key the entry is stored under (`"1"`, `"ab12cd"`).
    Key,
    /// A dotted path into the entry (`state.bri`, `swversion`).
    Path(&'static str),
}

/// Type handling applied on both the read and the write path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Coercion {
    Plain,
    Integer,
    Boolean,
    /// Nested object or list, shaped by the adapter's [`KvType`].
    KeyValue,
}

impl Coercion {
    /// Normalize a value read from the bridge.
    pub fn read(self, raw: Value, kv_type: KvType) -> Value {
        match (self, raw) {
            (_, Value::Null) => Value::Null,
            (Self::Integer, Value::Number(n)) => match n.as_i64() {
                Some(i) => Value::from(i),
                None => n.as_f64().map_or(Value::Number(n), round_to_integer),
            },
            (Self::Integer, Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map_or(Value::String(s), Value::from),
            (Self::Boolean, Value::String(s)) => parse_bool(&s).map_or(Value::String(s), Value::Bool),
            (Self::KeyValue, v @ (Value::Object(_) | Value::Array(_))) => match kv_type {
                KvType::Structured => v,
                KvType::Json => Value::String(v.to_string()),
            },
            (_, v) => v,
        }
    }

    /// Prepare a caller-supplied value for a PUT body.
    ///
    /// Boolean columns accept the `t`/`f` markers the engine sends for
    /// booleans. Key-value columns accept their JSON text form. Everything
    /// else passes through unchanged.
    pub fn write(self, value: Value) -> Value {
        match (self, value) {
            (Self::Boolean, Value::String(s)) => parse_bool(&s).map_or(Value::String(s), Value::Bool),
            (Self::KeyValue, Value::String(s)) => match serde_json::from_str::<Value>(&s) {
                Ok(parsed @ (Value::Object(_) | Value::Array(_))) => parsed,
                _ => Value::String(s),
            },
            (_, v) => v,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn round_to_integer(f: f64) -> Value {
    Value::from(f.round() as i64)
}

/// `t`/`f`/`true`/`false`, as the engine renders booleans.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "t" | "true" => Some(true),
        "f" | "false" => Some(false),
        _ => None,
    }
}

/// One entry of a column table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub name: &'static str,
    #[serde(flatten)]
    pub source: FieldSource,
    pub coercion: Coercion,
    pub mutable: bool,
}

impl ColumnSpec {
    const fn path(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            source: FieldSource::Path(path),
            coercion: Coercion::Plain,
            mutable: false,
        }
    }

    const fn key(name: &'static str) -> Self {
        Self {
            name,
            source: FieldSource::Key,
            coercion: Coercion::Plain,
            mutable: false,
        }
    }

    const fn coerce(mut self, coercion: Coercion) -> Self {
        self.coercion = coercion;
        self
    }

    const fn mutable(mut self) -> Self {
        self.mutable = true;
        self
    }

    /// The bridge field path, or `None` for the row-id pseudo-column.
    pub fn field_path(&self) -> Option<&'static str> {
        match self.source {
            FieldSource::Key => None,
            FieldSource::Path(p) => Some(p),
        }
    }

    /// Read this column out of one entry. Missing fields read as `null`.
    pub fn read(&self, key: &str, entry: &Value, kv_type: KvType) -> Value {
        let raw = match self.source {
            FieldSource::Key => Value::String(key.to_owned()),
            FieldSource::Path(path) => lookup(entry, path).cloned().unwrap_or(Value::Null),
        };
        self.coercion.read(raw, kv_type)
    }
}

/// Follow a dotted path through nested objects.
pub(crate) fn lookup<'v>(entry: &'v Value, path: &str) -> Option<&'v Value> {
    path.split('.').try_fold(entry, |node, segment| node.get(segment))
}

/// Insert `value` at a dotted path, creating intermediate objects.
///
/// Returns `false` without writing if the path is already occupied or runs
/// through a non-object.
pub(crate) fn insert_path(body: &mut Map<String, Value>, path: &str, value: Value) -> bool {
    let mut segments = path.split('.').peekable();
    let mut node = body;
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            if node.contains_key(segment) {
                return false;
            }
            node.insert(segment.to_owned(), value);
            return true;
        }
        let child = node
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        match child {
            Value::Object(map) => node = map,
            _ => return false,
        }
    }
    false
}

/// Validated, ordered column table for one adapter.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    kind: ResourceKind,
    columns: IndexMap<&'static str, &'static ColumnSpec>,
}

impl ColumnMap {
    /// Every column the resource kind knows about.
    pub fn for_kind(kind: ResourceKind) -> Self {
        let columns = tables::table(kind).iter().map(|c| (c.name, c)).collect();
        Self { kind, columns }
    }

    /// The subset of columns the engine declared for its table.
    ///
    /// An empty declaration means every column. Unknown or repeated names
    /// are configuration errors.
    pub fn declared<S: AsRef<str>>(kind: ResourceKind, names: &[S]) -> Result<Self, CoreError> {
        if names.is_empty() {
            return Ok(Self::for_kind(kind));
        }

        let all = tables::table(kind);
        let mut columns = IndexMap::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let spec = all
                .iter()
                .find(|c| c.name == name)
                .ok_or_else(|| CoreError::UnknownColumn {
                    kind,
                    column: name.to_owned(),
                })?;
            if columns.insert(spec.name, spec).is_some() {
                return Err(CoreError::DuplicateColumn {
                    kind,
                    column: name.to_owned(),
                });
            }
        }
        Ok(Self { kind, columns })
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn get(&self, name: &str) -> Option<&'static ColumnSpec> {
        self.columns.get(name).copied()
    }

    /// Resolve an external column name.
    pub fn resolve(&self, name: &str) -> Result<&'static ColumnSpec, CoreError> {
        self.get(name).ok_or_else(|| CoreError::UnknownColumn {
            kind: self.kind,
            column: name.to_owned(),
        })
    }

    pub fn is_mutable(&self, name: &str) -> bool {
        self.get(name).is_some_and(|c| c.mutable)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static ColumnSpec> + '_ {
        self.columns.values().copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.keys().copied()
    }

    pub fn mutable_columns(&self) -> impl Iterator<Item = &'static ColumnSpec> + '_ {
        self.iter().filter(|c| c.mutable)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
