use std::sync::Arc;
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use crate::cluster::topology::HostInfo;
use crate::transport::Connection;

/// Connection pool spanning all cluster members. The pool owns reconnection; the execution core
/// only picks connections and adjusts membership.
#[cfg_attr(test, automock)]
pub trait NodePool: Send + Sync {
    /// Returns a usable connection, or `None` if no host is currently reachable. `exclude` names a
    /// host to avoid if possible.
    fn pick(&self, exclude: Option<Uuid>) -> Option<Arc<dyn Connection>>;

    /// Starts filling connections to a host.
    fn add_host(&self, host: Arc<HostInfo>);

    /// Drops all connections to a host and forgets it.
    fn remove_host(&self, host_id: Uuid);

    /// Number of hosts with connections.
    fn size(&self) -> usize;

    /// Closes all connections.
    fn close(&self);
}
