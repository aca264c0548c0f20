//! Cluster-facing side of the driver: the session, statement dispatch and paging, and the
//! handling of server pushed events against the topology view.
pub use crate::cluster::control_connection::ControlConnection;
pub use crate::cluster::event_reconciler::EventReconciler;
pub use crate::cluster::host_filter::{
    AcceptAllHostFilter, AllowListHostFilter, DcHostFilter, HostFilter,
};
pub use crate::cluster::node_pool::NodePool;
pub use crate::cluster::pager::Iter;
pub use crate::cluster::ring::Ring;
pub use crate::cluster::schema_describer::{NoopSchemaDescriber, SchemaDescriber};
pub use crate::cluster::send_request::send_request;
pub use crate::cluster::session::{Session, SessionBuilder};
pub use crate::cluster::session_config::{
    DebounceConfig, EventsConfig, SessionDefaults, DEFAULT_EVENT_BUFFER_SIZE,
    DEFAULT_EVENT_DEBOUNCE_WINDOW, DEFAULT_PREFETCH,
};

pub(crate) mod control_connection;
pub(crate) mod event_reconciler;
pub(crate) mod host_filter;
pub(crate) mod node_pool;
pub(crate) mod pager;
pub(crate) mod ring;
pub(crate) mod schema_describer;
pub(crate) mod send_request;
pub mod session;
pub mod session_config;
pub mod topology;
