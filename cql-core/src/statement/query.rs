use bytes::Bytes;
use derivative::Derivative;
use std::sync::Arc;

use crate::cluster::pager::Iter;
use crate::cluster::session::Session;
use crate::cluster::session_config::SessionDefaults;
use crate::consistency::Consistency;
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use crate::trace_writer::Tracer;
use crate::types::unmarshal::Unmarshal;
use crate::types::value::QueryValues;

/// A single CQL statement bound to a session, together with its execution settings. Settings are
/// copied from the session defaults when the query is created and can be overridden per query.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct Query {
    statement: String,
    values: QueryValues,
    consistency: Consistency,
    page_size: i32,
    paging_state: Option<Bytes>,
    prefetch: f64,
    #[derivative(Debug = "ignore")]
    tracer: Option<Arc<dyn Tracer>>,
    #[derivative(Debug = "ignore")]
    retry_policy: Arc<dyn RetryPolicy + Send + Sync>,
    #[derivative(Debug = "ignore")]
    session: Arc<Session>,
}

impl Query {
    pub(crate) fn new(
        session: Arc<Session>,
        defaults: &SessionDefaults,
        statement: String,
        values: QueryValues,
    ) -> Self {
        Query {
            statement,
            values,
            consistency: defaults.consistency,
            page_size: defaults.page_size,
            paging_state: None,
            prefetch: defaults.prefetch,
            tracer: defaults.tracer.clone(),
            retry_policy: defaults.retry_policy.clone(),
            session,
        }
    }

    /// Sets statement consistency.
    #[must_use]
    pub fn with_consistency(mut self, consistency: Consistency) -> Self {
        self.consistency = consistency;
        self
    }

    /// Sets the number of rows per page. Zero or less disables paging.
    #[must_use]
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the fraction of a page which, once left unread, triggers fetching the next page in
    /// the background.
    #[must_use]
    pub fn with_prefetch(mut self, prefetch: f64) -> Self {
        self.prefetch = prefetch;
        self
    }

    /// Enables tracing with given tracer, or disables it with `None`.
    #[must_use]
    pub fn with_tracer(mut self, tracer: Option<Arc<dyn Tracer>>) -> Self {
        self.tracer = tracer;
        self
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry_policy: Arc<dyn RetryPolicy + Send + Sync>) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Resumes the query from a page returned by an earlier execution.
    #[must_use]
    pub fn with_paging_state(mut self, paging_state: Option<Bytes>) -> Self {
        self.paging_state = paging_state;
        self
    }

    #[inline]
    pub fn statement(&self) -> &str {
        &self.statement
    }

    #[inline]
    pub fn values(&self) -> &QueryValues {
        &self.values
    }

    #[inline]
    pub fn consistency(&self) -> Consistency {
        self.consistency
    }

    #[inline]
    pub fn page_size(&self) -> i32 {
        self.page_size
    }

    #[inline]
    pub fn paging_state(&self) -> Option<&Bytes> {
        self.paging_state.as_ref()
    }

    #[inline]
    pub fn prefetch(&self) -> f64 {
        self.prefetch
    }

    /// Returns `true` if the connection should ask the server to trace this query.
    #[inline]
    pub fn is_traced(&self) -> bool {
        self.tracer.is_some()
    }

    #[inline]
    pub fn tracer(&self) -> Option<&Arc<dyn Tracer>> {
        self.tracer.as_ref()
    }

    #[inline]
    pub fn retry_policy(&self) -> &Arc<dyn RetryPolicy + Send + Sync> {
        &self.retry_policy
    }

    #[inline]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Executes the query, discarding any returned rows.
    pub async fn exec(&self) -> Result<()> {
        self.iter().await.close()
    }

    /// Executes the query and returns an iterator over its rows. Errors are reported by the
    /// iterator.
    pub async fn iter(&self) -> Iter {
        self.session.execute_query(self).await
    }

    /// Executes the query and decodes the first row into `dest`. Fails with [`Error::NotFound`]
    /// if no rows were returned.
    pub async fn scan(&self, dest: &mut [&mut dyn Unmarshal]) -> Result<()> {
        let mut iter = self.first_page().await?;
        iter.scan(dest).await;
        iter.close()
    }

    /// Executes a conditional statement (`IF NOT EXISTS`, `IF ...`) and returns whether it was
    /// applied. When it was not, the current values of the row are decoded into `dest`.
    pub async fn scan_cas(&self, dest: &mut [&mut dyn Unmarshal]) -> Result<bool> {
        let mut iter = self.first_page().await?;

        let mut applied = false;
        {
            let mut all: Vec<&mut dyn Unmarshal> = Vec::with_capacity(dest.len() + 1);
            all.push(&mut applied);

            if iter.columns().len() > 1 {
                for dest in dest.iter_mut() {
                    all.push(&mut **dest);
                }
            }

            iter.scan(&mut all).await;
        }

        iter.close().map(|_| applied)
    }

    async fn first_page(&self) -> Result<Iter> {
        let iter = self.iter().await;
        if let Some(error) = iter.error() {
            return Err(error.clone());
        }

        if iter.num_rows() == 0 {
            return Err(Error::NotFound);
        }

        Ok(iter)
    }
}
