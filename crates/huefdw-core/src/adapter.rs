// ── Resource adapter ──
//
// One adapter per table. It owns the validated configuration, the declared
// column map and an HTTP client bound to one bridge and one token.

use huefdw_api::BridgeClient;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::column::{ColumnMap, ColumnSpec};
use crate::config::AdapterConfig;
use crate::error::CoreError;
use crate::kind::ResourceKind;
use crate::outcome::{
    FailureReason, FieldFailure, MutationOutcome, RejectedOperation, Rejection,
};
use crate::qualifier::{Operator, Qualifier};
use crate::row::{Filter, Rows};
use crate::translate::MutationTranslator;

pub struct ResourceAdapter {
    config: AdapterConfig,
    columns: ColumnMap,
    client: BridgeClient,
}

impl ResourceAdapter {
    /// Build an adapter for the columns the engine declared.
    ///
    /// An empty declaration exposes every column of the resource kind.
    pub fn new<S: AsRef<str>>(config: AdapterConfig, declared: &[S]) -> Result<Self, CoreError> {
        let columns = ColumnMap::declared(config.kind, declared)?;
        let client = BridgeClient::new(
            config.bridge.clone(),
            config.token.clone(),
            &config.transport(),
        )?;
        debug!(kind = %config.kind, columns = columns.len(), "adapter ready");
        Ok(Self {
            config,
            columns,
            client,
        })
    }

    pub fn kind(&self) -> ResourceKind {
        self.config.kind
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    /// Column that identifies a row for `mutate`.
    pub fn row_id_column(&self) -> &'static str {
        self.config.kind.row_id_column()
    }

    // ── Fetch ────────────────────────────────────────────────────────

    /// Fetch the whole collection and return the rows passing every
    /// qualifier, restricted to `columns` (empty = every declared column).
    ///
    /// Column names are checked before any request is sent. Qualifiers with
    /// an unknown operator are skipped and reported on the returned `Rows`.
    pub async fn fetch<S: AsRef<str> + Sync>(
        &self,
        columns: &[S],
        qualifiers: &[Qualifier],
    ) -> Result<Rows, CoreError> {
        let projection = self.projection(columns)?;
        let (filters, skipped) = self.filters(qualifiers)?;

        let kind = self.config.kind;
        let resource = self.client.get_resource(kind.path_segment()).await?;
        let entries = entries(kind, resource)?;

        debug!(
            %kind,
            entries = entries.len(),
            qualifiers = filters.len(),
            "fetched resource"
        );
        Ok(Rows::new(
            entries,
            projection,
            filters,
            self.config.kv_type,
            skipped,
        ))
    }

    fn projection<S: AsRef<str>>(
        &self,
        columns: &[S],
    ) -> Result<Vec<&'static ColumnSpec>, CoreError> {
        if columns.is_empty() {
            return Ok(self.columns.iter().collect());
        }
        let mut seen = IndexMap::with_capacity(columns.len());
        for name in columns {
            let spec = self.columns.resolve(name.as_ref())?;
            seen.entry(spec.name).or_insert(spec);
        }
        Ok(seen.into_values().collect())
    }

    fn filters(&self, qualifiers: &[Qualifier]) -> Result<(Vec<Filter>, Vec<Qualifier>), CoreError> {
        let mut filters = Vec::with_capacity(qualifiers.len());
        let mut skipped = Vec::new();
        for qual in qualifiers {
            let spec = self.columns.resolve(&qual.column)?;
            match Operator::parse(&qual.operator) {
                Ok(operator) => filters.push(Filter {
                    spec,
                    operator,
                    value: qual.value.clone(),
                }),
                Err(_) => {
                    warn!(
                        kind = %self.config.kind,
                        column = %qual.column,
                        operator = %qual.operator,
                        "unsupported qualifier operator; qualifier not applied"
                    );
                    skipped.push(qual.clone());
                }
            }
        }
        Ok((filters, skipped))
    }

    // ── Mutate ───────────────────────────────────────────────────────

    /// Apply changed columns to one row with a single PUT.
    ///
    /// Refused columns and fields the bridge rejects are reported in the
    /// outcome; only whole-call failures are errors. `row_id` is ignored for
    /// `config`.
    pub async fn mutate<I, K>(&self, row_id: &str, changes: I) -> Result<MutationOutcome, CoreError>
    where
        I: IntoIterator<Item = (K, Value)> + Send,
        K: AsRef<str>,
    {
        let kind = self.config.kind;
        if !kind.is_singleton() && !is_path_segment(row_id) {
            return Err(CoreError::InvalidRowId {
                kind,
                row_id: row_id.to_owned(),
            });
        }

        let translation =
            MutationTranslator::new(&self.columns, self.config.transition_time).translate(changes);
        for failure in &translation.rejected {
            warn!(%kind, row_id, %failure, "change refused");
        }

        let mut outcome = MutationOutcome {
            kind,
            row_id: row_id.to_owned(),
            body: None,
            applied: IndexMap::new(),
            failures: translation.rejected.clone(),
        };
        if translation.is_empty() {
            info!(%kind, row_id, "no mutable changes; nothing sent");
            return Ok(outcome);
        }

        let path = kind.mutation_path(row_id);
        let body = Value::Object(translation.body.clone());
        let response = self.client.put(&path, &body).await?;
        outcome.body = Some(body);

        let prefix = format!("/{path}");
        for entry in response.entries {
            if let Some(success) = entry.success {
                for (address, value) in success {
                    let key = translation
                        .column_for_address(&prefix, &address)
                        .map_or_else(|| relative_field(&prefix, &address), str::to_owned);
                    outcome.applied.insert(key, value);
                }
                continue;
            }

            let failure = match entry.error {
                Some(detail) => FieldFailure {
                    column: translation
                        .column_for_address(&prefix, &detail.address)
                        .map(str::to_owned),
                    reason: FailureReason::Bridge {
                        code: detail.code,
                        address: detail.address,
                        description: detail.description,
                    },
                },
                None => FieldFailure {
                    column: None,
                    reason: FailureReason::Bridge {
                        code: 0,
                        address: String::new(),
                        description: "status entry without success or error".into(),
                    },
                },
            };
            warn!(%kind, row_id, %failure, "bridge refused field");
            outcome.failures.push(failure);
        }

        debug!(
            %kind,
            row_id,
            applied = outcome.applied.len(),
            failed = outcome.failures.len(),
            "mutation complete"
        );
        Ok(outcome)
    }

    // ── Rejected operations ──────────────────────────────────────────

    /// Rows cannot be created through the adapter. No request is made.
    pub fn reject_insert<I, K>(&self, values: I) -> Rejection
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let payload: Map<String, Value> = values.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let rejection = Rejection {
            kind: self.config.kind,
            operation: RejectedOperation::Insert,
            payload: Value::Object(payload),
        };
        warn!(kind = %rejection.kind, payload = %rejection.payload, "insert rejected");
        rejection
    }

    /// Rows cannot be removed through the adapter. No request is made.
    pub fn reject_delete(&self, row_id: &str) -> Rejection {
        let rejection = Rejection {
            kind: self.config.kind,
            operation: RejectedOperation::Delete,
            payload: Value::String(row_id.to_owned()),
        };
        warn!(kind = %rejection.kind, row_id, "delete rejected");
        rejection
    }
}

/// Split a GET payload into `(row key, entry)` pairs.
///
/// `config` is one entry keyed by the bridge name.
fn entries(kind: ResourceKind, resource: Map<String, Value>) -> Result<Vec<(String, Value)>, CoreError> {
    if kind.is_singleton() {
        let key = resource
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        return Ok(vec![(key, Value::Object(resource))]);
    }

    resource
        .into_iter()
        .map(|(key, entry)| {
            if entry.is_object() {
                Ok((key, entry))
            } else {
                Err(CoreError::MalformedResource {
                    kind,
                    message: format!("entry '{key}' is not an object"),
                })
            }
        })
        .collect()
}

/// A row id must stay one URL path segment: `.` and `..` would be
/// normalized away and address a different endpoint.
fn is_path_segment(row_id: &str) -> bool {
    !matches!(row_id, "" | "." | "..") && !row_id.contains(['/', '\\', '?', '#'])
}

/// `/lights/1/state/transitiontime` → `transitiontime`.
fn relative_field(prefix: &str, address: &str) -> String {
    address
        .strip_prefix(prefix)
        .unwrap_or(address)
        .trim_start_matches('/')
        .replace('/', ".")
}
