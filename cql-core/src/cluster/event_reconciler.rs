use derive_more::Constructor;
use fxhash::FxHashMap;
use std::collections::hash_map::Entry;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::*;

use crate::cluster::control_connection::ControlConnection;
use crate::cluster::host_filter::HostFilter;
use crate::cluster::node_pool::NodePool;
use crate::cluster::ring::Ring;
use crate::cluster::schema_describer::SchemaDescriber;
use crate::cluster::session_config::EventsConfig;
use crate::cluster::topology::HostInfo;
use crate::frame::events::{SchemaChange, ServerEvent, StatusChange, StatusChangeType};
use crate::load_balancing::{HostSelectionPolicy, KeyspaceUpdateEvent};

/// Applies debounced server events to the cluster state: schema caches, the node pool and the
/// host selection policy.
#[derive(Constructor)]
pub struct EventReconciler {
    ring: Arc<Ring>,
    pool: Arc<dyn NodePool>,
    policy: Arc<dyn HostSelectionPolicy>,
    control_connection: Arc<dyn ControlConnection>,
    schema_describer: Arc<dyn SchemaDescriber>,
    host_filter: Arc<dyn HostFilter>,
    events_config: EventsConfig,
}

impl EventReconciler {
    /// Handles a batch of schema change events, in arrival order.
    pub async fn handle_schema_events(&self, events: Vec<ServerEvent>) {
        for event in events {
            let change = match event {
                ServerEvent::SchemaChange(change) => change,
                event => {
                    debug!(?event, "Ignoring non-schema event.");
                    continue;
                }
            };

            self.schema_describer.clear_schema(change.keyspace());

            if let SchemaChange::Keyspace {
                change_type,
                keyspace,
            } = change
            {
                if let Err(error) = self.control_connection.await_schema_agreement().await {
                    warn!(%error, %keyspace, "Unable to reach schema agreement.");
                }

                self.policy
                    .keyspace_changed(KeyspaceUpdateEvent::new(keyspace, change_type));
            }
        }
    }

    /// Handles a batch of topology and status events.
    ///
    /// Any number of topology events results in a single ring refresh, requested before status
    /// events are dispatched. Status events are collapsed to the last one seen for each host.
    pub async fn handle_node_events(&self, events: Vec<ServerEvent>) {
        let mut topology_changed = false;
        let mut statuses: Vec<StatusChange> = Vec::new();
        let mut status_index = FxHashMap::default();

        for event in events {
            match event {
                ServerEvent::TopologyChange(_) => topology_changed = true,
                ServerEvent::StatusChange(status) => match status_index.entry(status.ip()) {
                    Entry::Occupied(entry) => statuses[*entry.get()] = status,
                    Entry::Vacant(entry) => {
                        entry.insert(statuses.len());
                        statuses.push(status);
                    }
                },
                ServerEvent::SchemaChange(_) => {
                    debug!(?event, "Ignoring schema event.");
                }
            }
        }

        let mut ring_refreshed = false;
        if topology_changed && !self.events_config.disable_topology_events {
            self.control_connection.refresh_ring();
            ring_refreshed = true;
        }

        if self.events_config.disable_node_status_events {
            return;
        }

        for status in statuses {
            debug!(?status, "Dispatching status change.");

            match status.change_type {
                StatusChangeType::Up => self.node_up(status.addr.addr, &mut ring_refreshed).await,
                StatusChangeType::Down => self.node_down(status.addr.addr),
            }
        }
    }

    /// Marks a host as routable once the pool connected to it.
    pub fn handle_node_connected(&self, host: &Arc<HostInfo>) {
        debug!(address = %host.connect_address(), pool_size = self.pool.size(), "Node connected.");

        host.mark_up();

        if self.host_filter.accept(host) {
            self.policy.host_up(host.clone());
        }

        debug!(address = %host.connect_address(), pool_size = self.pool.size(), "Node connected, handled.");
    }

    async fn node_up(&self, address: SocketAddr, ring_refreshed: &mut bool) {
        debug!(%address, pool_size = self.pool.size(), "Node up.");

        let Some(host) = self.ring.host_by_ip(&address.ip()) else {
            // dropped until the refreshed ring knows the host
            if !*ring_refreshed {
                self.control_connection.refresh_ring();
                *ring_refreshed = true;
            }
            return;
        };

        if !self.host_filter.accept(&host) {
            return;
        }

        let delay = host.version().node_up_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.pool.add_host(host.clone());
        self.policy.add_host(host);

        debug!(%address, pool_size = self.pool.size(), "Node up, handled.");
    }

    fn node_down(&self, address: SocketAddr) {
        debug!(%address, pool_size = self.pool.size(), "Node down.");

        let Some(host) = self.ring.host_by_ip(&address.ip()) else {
            return;
        };

        host.mark_down();

        if !self.host_filter.accept(&host) {
            return;
        }

        self.policy.host_down(host.clone());
        self.pool.remove_host(host.host_id());

        debug!(%address, pool_size = self.pool.size(), "Node down, handled.");
    }
}
