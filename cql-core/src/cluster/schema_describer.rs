#[cfg(test)]
use mockall::automock;

/// Cache of schema metadata, invalidated on schema change events.
#[cfg_attr(test, automock)]
pub trait SchemaDescriber: Send + Sync {
    /// Drops any cached metadata for the keyspace.
    fn clear_schema(&self, keyspace: &str);
}

/// Describer for sessions which do not cache schema metadata.
#[derive(Default, Debug, Clone, Copy)]
pub struct NoopSchemaDescriber;

impl SchemaDescriber for NoopSchemaDescriber {
    #[inline]
    fn clear_schema(&self, _keyspace: &str) {}
}
