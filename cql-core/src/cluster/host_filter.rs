//! Host filters decide whether the driver should route requests to, and keep connections with,
//! a given host. Filtered hosts still have their state tracked.

use fxhash::FxHashSet;
use std::net::IpAddr;

use crate::cluster::topology::HostInfo;

pub trait HostFilter: Send + Sync {
    /// Returns whether a host should be accepted or not.
    fn accept(&self, host: &HostInfo) -> bool;
}

/// Unconditionally accepts all hosts.
#[derive(Default, Debug, Clone, Copy)]
pub struct AcceptAllHostFilter;

impl HostFilter for AcceptAllHostFilter {
    fn accept(&self, _host: &HostInfo) -> bool {
        true
    }
}

/// Accepts hosts whose addresses are present in the allow list.
#[derive(Debug, Clone)]
pub struct AllowListHostFilter {
    allowed: FxHashSet<IpAddr>,
}

impl AllowListHostFilter {
    pub fn new(allowed: impl IntoIterator<Item = IpAddr>) -> Self {
        AllowListHostFilter {
            allowed: allowed.into_iter().collect(),
        }
    }
}

impl HostFilter for AllowListHostFilter {
    fn accept(&self, host: &HostInfo) -> bool {
        self.allowed.contains(&host.ip())
    }
}

/// Accepts hosts from given datacenter.
#[derive(Debug, Clone)]
pub struct DcHostFilter {
    local_dc: String,
}

impl DcHostFilter {
    pub fn new(local_dc: String) -> Self {
        DcHostFilter { local_dc }
    }
}

impl HostFilter for DcHostFilter {
    fn accept(&self, host: &HostInfo) -> bool {
        host.datacenter() == self.local_dc
    }
}
