//! **cql-core** is the execution core of a CQL driver: it turns statements into requests against
//! a pool of node connections, pages through results, and keeps cluster state in sync with the
//! events servers push.
//!
//! The core does not open sockets itself. Connections, the node pool, the control connection and
//! the host selection policy are supplied by the embedding driver through the traits in
//! [`transport`], [`cluster`] and [`load_balancing`].
//!
//! ```no_run
//! use cql_core::cluster::SessionBuilder;
//! use cql_core::query_values;
//! use cql_core::types::prelude::*;
//! # use std::sync::Arc;
//! # async fn run(
//! #     pool: Arc<dyn cql_core::cluster::NodePool>,
//! #     policy: Arc<dyn cql_core::load_balancing::HostSelectionPolicy>,
//! #     control: Arc<dyn cql_core::cluster::ControlConnection>,
//! # ) -> Result<()> {
//! let session = SessionBuilder::new(pool, policy, control)
//!     .with_page_size(500)
//!     .build();
//!
//! let mut iter = session
//!     .query("SELECT id, name FROM ks.users", query_values!())
//!     .iter()
//!     .await;
//!
//! let mut id = 0i32;
//! let mut name = String::new();
//! while iter.scan(&mut [&mut id, &mut name]).await {
//!     println!("{id}: {name}");
//! }
//!
//! iter.close()
//! # }
//! ```

#[macro_use]
mod macros;

pub mod cluster;
pub mod events;
pub mod future;
pub mod load_balancing;
pub mod retry;
pub mod statement;
pub mod trace_writer;
pub mod transport;

pub use cql_protocol::consistency;
pub use cql_protocol::error;
pub use cql_protocol::frame;
pub use cql_protocol::types;

pub type Error = error::Error;
pub type Result<T> = error::Result<T>;
