//! Relational adapter over the Philips Hue bridge.
//!
//! Sits between a relational engine (a foreign-data-wrapper host, the
//! `huefdw` CLI) and `huefdw-api`:
//!
//! - **[`ColumnMap`]**: static per-kind tables mapping external column names
//!   to bridge field paths, with read/write coercion.
//! - **[`qualifier::evaluate`]**: `(operator, lhs, rhs) -> bool` for the
//!   predicates the engine pushes down.
//! - **[`ResourceAdapter`]**: one GET per fetch, flattened into lazy
//!   [`Rows`]; one PUT per mutation, reported as a [`MutationOutcome`].
//!   Inserts and deletes are refused with a [`Rejection`].
//! - **[`MutationTranslator`]**: changed columns → PUT body.
//! - **[`BlockingAdapter`]**: the same operations for callers that cannot
//!   await.

pub mod adapter;
pub mod blocking;
pub mod column;
pub mod config;
pub mod error;
pub mod kind;
pub mod outcome;
pub mod qualifier;
pub mod row;
pub mod translate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use adapter::ResourceAdapter;
pub use blocking::BlockingAdapter;
pub use column::{Coercion, ColumnMap, ColumnSpec, FieldSource};
pub use config::{AdapterConfig, DEFAULT_TRANSITION_TIME, DEFAULT_USERNAME};
pub use error::CoreError;
pub use kind::{KvType, ResourceKind};
pub use outcome::{FailureReason, FieldFailure, MutationOutcome, RejectedOperation, Rejection};
pub use qualifier::{Operator, Qualifier};
pub use row::{Row, Rows};
pub use translate::{MutationTranslator, Translation};

// Transport types callers need to build an `AdapterConfig` by hand.
pub use huefdw_api::{BridgeErrorKind, TlsMode};
