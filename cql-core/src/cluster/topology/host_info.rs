use atomic::Atomic;
use std::fmt::{Debug, Formatter};
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::Ordering;
use uuid::Uuid;

use crate::cluster::topology::{CassandraVersion, NodeState};

/// Identity and state of a single cluster member.
pub struct HostInfo {
    connect_address: SocketAddr,
    host_id: Uuid,
    datacenter: String,
    rack: String,
    version: CassandraVersion,
    state: Atomic<NodeState>,
}

impl Debug for HostInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostInfo")
            .field("connect_address", &self.connect_address)
            .field("host_id", &self.host_id)
            .field("datacenter", &self.datacenter)
            .field("rack", &self.rack)
            .field("version", &self.version)
            .field("state", &self.state())
            .finish()
    }
}

impl HostInfo {
    pub fn new(
        connect_address: SocketAddr,
        host_id: Uuid,
        datacenter: String,
        rack: String,
        version: CassandraVersion,
    ) -> Self {
        Self::with_state(
            connect_address,
            host_id,
            datacenter,
            rack,
            version,
            NodeState::Unknown,
        )
    }

    pub fn with_state(
        connect_address: SocketAddr,
        host_id: Uuid,
        datacenter: String,
        rack: String,
        version: CassandraVersion,
        state: NodeState,
    ) -> Self {
        HostInfo {
            connect_address,
            host_id,
            datacenter,
            rack,
            version,
            state: Atomic::new(state),
        }
    }

    #[inline]
    pub fn connect_address(&self) -> SocketAddr {
        self.connect_address
    }

    /// Address used to match status events against this host.
    #[inline]
    pub fn ip(&self) -> IpAddr {
        self.connect_address.ip()
    }

    #[inline]
    pub fn host_id(&self) -> Uuid {
        self.host_id
    }

    #[inline]
    pub fn datacenter(&self) -> &str {
        &self.datacenter
    }

    #[inline]
    pub fn rack(&self) -> &str {
        &self.rack
    }

    #[inline]
    pub fn version(&self) -> CassandraVersion {
        self.version
    }

    #[inline]
    pub fn state(&self) -> NodeState {
        self.state.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn is_up(&self) -> bool {
        self.state() == NodeState::Up
    }

    #[inline]
    pub(crate) fn mark_up(&self) {
        self.state.store(NodeState::Up, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn mark_down(&self) {
        self.state.store(NodeState::Down, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn should_track_state() {
        let host = HostInfo::new(
            SocketAddr::new(Ipv4Addr::new(10, 0, 0, 1).into(), 9042),
            Uuid::new_v4(),
            "dc1".into(),
            "rack1".into(),
            CassandraVersion::new(4, 0, 0),
        );

        assert_eq!(host.state(), NodeState::Unknown);
        assert_eq!(host.ip(), IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));

        host.mark_up();
        assert!(host.is_up());

        host.mark_down();
        assert_eq!(host.state(), NodeState::Down);
    }
}
