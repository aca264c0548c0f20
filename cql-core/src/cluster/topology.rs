mod cassandra_version;
mod host_info;
mod node_state;

pub use self::cassandra_version::CassandraVersion;
pub use self::host_info::HostInfo;
pub use self::node_state::NodeState;
