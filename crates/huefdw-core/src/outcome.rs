// ── Mutation results ──
//
// A mutation never fails as a whole because one field was refused. Refusals
// from the translator and from the bridge are collected here next to the
// fields that were applied.

use std::fmt;

use huefdw_api::BridgeErrorKind;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use strum::{Display, IntoStaticStr};

use crate::kind::ResourceKind;

/// Why one changed column did not take effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FailureReason {
    /// The column exists but is read-only for this resource kind.
    Immutable,
    /// The column is not declared for this adapter.
    UnknownColumn,
    /// The column's field lies outside the mutation endpoint, or another
    /// column already wrote it.
    Conflict { path: String },
    /// The bridge refused the field.
    Bridge {
        code: u16,
        address: String,
        description: String,
    },
}

impl FailureReason {
    pub fn bridge_kind(&self) -> Option<BridgeErrorKind> {
        match self {
            Self::Bridge { code, .. } => Some(BridgeErrorKind::from_code(*code)),
            _ => None,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immutable => f.write_str("column is read-only"),
            Self::UnknownColumn => f.write_str("unknown column"),
            Self::Conflict { path } => write!(f, "conflicting write to '{path}'"),
            Self::Bridge {
                code, description, ..
            } => write!(f, "bridge error {code}: {description}"),
        }
    }
}

/// A changed column that was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldFailure {
    /// `None` when the bridge reported an error that maps to no column.
    pub column: Option<String>,
    #[serde(flatten)]
    pub reason: FailureReason,
}

impl FieldFailure {
    pub(crate) fn new(column: impl Into<String>, reason: FailureReason) -> Self {
        Self {
            column: Some(column.into()),
            reason,
        }
    }
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.column {
            Some(column) => write!(f, "{column}: {}", self.reason),
            None => write!(f, "{}", self.reason),
        }
    }
}

/// Result of one `mutate` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutationOutcome {
    pub kind: ResourceKind,
    pub row_id: String,
    /// The PUT body, or `None` when nothing was sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Fields the bridge confirmed, keyed by column (or bridge field for
    /// injected parameters such as `transitiontime`).
    pub applied: IndexMap<String, Value>,
    pub failures: Vec<FieldFailure>,
}

impl MutationOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Whether a request reached the bridge.
    pub fn was_sent(&self) -> bool {
        self.body.is_some()
    }

    pub fn failed_columns(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().filter_map(|f| f.column.as_deref())
    }
}

// ── Rejected operations ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RejectedOperation {
    Insert,
    Delete,
}

/// An insert or delete that was refused without contacting the bridge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    pub kind: ResourceKind,
    pub operation: RejectedOperation,
    /// The row values for an insert, the row id for a delete.
    pub payload: Value,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is not supported on {}; rows are created and removed on the bridge itself",
            self.operation, self.kind
        )
    }
}
