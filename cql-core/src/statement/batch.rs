use derivative::Derivative;
use derive_more::Constructor;
use std::sync::Arc;

use crate::cluster::session_config::SessionDefaults;
use crate::consistency::Consistency;
use crate::frame::message_batch::BatchType;
use crate::retry::RetryPolicy;
use crate::types::value::QueryValues;

/// Maximum number of statements a single batch request can carry.
pub const MAX_BATCH_STATEMENTS: usize = 65536;

/// Single statement in a batch.
#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct BatchEntry {
    pub statement: String,
    pub values: QueryValues,
}

/// Ordered list of statements executed as one request.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct Batch {
    batch_type: BatchType,
    entries: Vec<BatchEntry>,
    consistency: Consistency,
    #[derivative(Debug = "ignore")]
    retry_policy: Arc<dyn RetryPolicy + Send + Sync>,
}

impl Batch {
    /// Creates an empty batch with library default settings.
    pub fn new(batch_type: BatchType) -> Self {
        Self::with_defaults(batch_type, &SessionDefaults::default())
    }

    pub(crate) fn with_defaults(batch_type: BatchType, defaults: &SessionDefaults) -> Self {
        Batch {
            batch_type,
            entries: vec![],
            consistency: defaults.consistency,
            retry_policy: defaults.retry_policy.clone(),
        }
    }

    /// Appends a statement to the batch.
    pub fn add_query(&mut self, statement: impl Into<String>, values: impl Into<QueryValues>) {
        self.entries
            .push(BatchEntry::new(statement.into(), values.into()));
    }

    #[must_use]
    pub fn with_consistency(mut self, consistency: Consistency) -> Self {
        self.consistency = consistency;
        self
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry_policy: Arc<dyn RetryPolicy + Send + Sync>) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    #[inline]
    pub fn batch_type(&self) -> BatchType {
        self.batch_type
    }

    #[inline]
    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn consistency(&self) -> Consistency {
        self.consistency
    }

    #[inline]
    pub fn retry_policy(&self) -> &Arc<dyn RetryPolicy + Send + Sync> {
        &self.retry_policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::value::Value;

    #[test]
    fn should_collect_entries_in_order() {
        let mut batch = Batch::new(BatchType::Unlogged).with_consistency(Consistency::One);
        assert!(batch.is_empty());

        batch.add_query("INSERT INTO t (id) VALUES (?)", query_values!(1));
        batch.add_query("DELETE FROM t WHERE id = 2", query_values!());

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.batch_type(), BatchType::Unlogged);
        assert_eq!(batch.consistency(), Consistency::One);
        assert_eq!(batch.entries()[0].statement, "INSERT INTO t (id) VALUES (?)");
        assert_eq!(
            batch.entries()[0].values,
            QueryValues::SimpleValues(vec![Value::new(1)])
        );
        assert!(batch.entries()[1].values.is_empty());
    }

    #[test]
    fn should_use_library_defaults() {
        let batch = Batch::new(BatchType::Logged);
        assert_eq!(batch.consistency(), Consistency::Quorum);
    }
}
