use derive_more::Constructor;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

use crate::cluster::topology::HostInfo;
use crate::frame::events::SchemaChangeType;

/// Keyspace change delivered to the host selection policy after schema agreement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Constructor)]
pub struct KeyspaceUpdateEvent {
    pub keyspace: String,
    pub change: SchemaChangeType,
}

/// Host selection policy, notified about hosts becoming routable or unavailable. Routing itself
/// happens in the node pool.
#[cfg_attr(test, automock)]
pub trait HostSelectionPolicy: Send + Sync {
    /// A new host became known to the driver.
    fn add_host(&self, host: Arc<HostInfo>);

    /// A host became routable.
    fn host_up(&self, host: Arc<HostInfo>);

    /// A host stopped being routable.
    fn host_down(&self, host: Arc<HostInfo>);

    /// A keyspace was created, altered or dropped.
    fn keyspace_changed(&self, event: KeyspaceUpdateEvent);
}
