use arc_swap::ArcSwap;
use fxhash::FxHashMap;
use std::net::IpAddr;
use std::sync::Arc;

use crate::cluster::topology::HostInfo;

/// The driver's view of cluster members, keyed by address. Readers get lock-free snapshots;
/// writers replace the whole map.
#[derive(Debug, Default)]
pub struct Ring {
    hosts: ArcSwap<FxHashMap<IpAddr, Arc<HostInfo>>>,
}

impl Ring {
    pub fn new(hosts: impl IntoIterator<Item = Arc<HostInfo>>) -> Self {
        Ring {
            hosts: ArcSwap::from_pointee(
                hosts.into_iter().map(|host| (host.ip(), host)).collect(),
            ),
        }
    }

    #[inline]
    pub fn host_by_ip(&self, ip: &IpAddr) -> Option<Arc<HostInfo>> {
        self.hosts.load().get(ip).cloned()
    }

    /// Adds a host or replaces the one with the same address, returning the replaced host.
    pub fn add_or_update_host(&self, host: Arc<HostInfo>) -> Option<Arc<HostInfo>> {
        let mut previous = None;
        self.hosts.rcu(|hosts| {
            let mut hosts = FxHashMap::clone(hosts);
            previous = hosts.insert(host.ip(), host.clone());
            hosts
        });

        previous
    }

    pub fn remove_host(&self, ip: &IpAddr) -> Option<Arc<HostInfo>> {
        let mut removed = None;
        self.hosts.rcu(|hosts| {
            let mut hosts = FxHashMap::clone(hosts);
            removed = hosts.remove(ip);
            hosts
        });

        removed
    }

    /// Replaces the whole view, e.g. after a full topology refresh.
    pub fn replace_hosts(&self, hosts: impl IntoIterator<Item = Arc<HostInfo>>) {
        self.hosts.store(Arc::new(
            hosts.into_iter().map(|host| (host.ip(), host)).collect(),
        ));
    }

    pub fn hosts(&self) -> Vec<Arc<HostInfo>> {
        self.hosts.load().values().cloned().collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.hosts.load().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
