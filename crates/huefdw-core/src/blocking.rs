// Synchronous facade over `ResourceAdapter`.
//
// Engine callbacks run on plain threads and cannot await. Each
// `BlockingAdapter` owns a current-thread runtime and drives one call at a
// time on it. Do not use it from inside another tokio runtime.

use serde_json::Value;
use tokio::runtime::{Builder, Runtime};

use crate::adapter::ResourceAdapter;
use crate::column::ColumnMap;
use crate::config::AdapterConfig;
use crate::error::CoreError;
use crate::kind::ResourceKind;
use crate::outcome::{MutationOutcome, Rejection};
use crate::qualifier::Qualifier;
use crate::row::Rows;

pub struct BlockingAdapter {
    runtime: Runtime,
    inner: ResourceAdapter,
}

impl BlockingAdapter {
    pub fn new<S: AsRef<str>>(config: AdapterConfig, declared: &[S]) -> Result<Self, CoreError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let inner = ResourceAdapter::new(config, declared)?;
        Ok(Self { runtime, inner })
    }

    pub fn kind(&self) -> ResourceKind {
        self.inner.kind()
    }

    pub fn columns(&self) -> &ColumnMap {
        self.inner.columns()
    }

    pub fn row_id_column(&self) -> &'static str {
        self.inner.row_id_column()
    }

    pub fn fetch<S: AsRef<str> + Sync>(
        &self,
        columns: &[S],
        qualifiers: &[Qualifier],
    ) -> Result<Rows, CoreError> {
        self.runtime.block_on(self.inner.fetch(columns, qualifiers))
    }

    pub fn mutate<I, K>(&self, row_id: &str, changes: I) -> Result<MutationOutcome, CoreError>
    where
        I: IntoIterator<Item = (K, Value)> + Send,
        K: AsRef<str>,
    {
        self.runtime.block_on(self.inner.mutate(row_id, changes))
    }

    pub fn reject_insert<I, K>(&self, values: I) -> Rejection
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.inner.reject_insert(values)
    }

    pub fn reject_delete(&self, row_id: &str) -> Rejection {
        self.inner.reject_delete(row_id)
    }

    /// The async adapter underneath.
    pub fn as_async(&self) -> &ResourceAdapter {
        &self.inner
    }
}
