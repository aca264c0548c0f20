//! This module contains a declaration of the `Connection` trait, which represents a single usable
//! link to a cluster member. Framing, compression and the socket itself live behind it.
use std::net::SocketAddr;

#[cfg(test)]
use mockall::*;

use crate::frame::message_result::QueryResult;
use crate::future::BoxFuture;
use crate::statement::{Batch, Query};
use crate::Result;

/// A single connection to a cluster member.
pub trait Connection: Send + Sync {
    /// Executes a single statement, honoring its consistency and paging parameters.
    fn execute_query<'a>(&'a self, query: &'a Query) -> BoxFuture<'a, Result<QueryResult>>;

    /// Executes all batch entries as one request.
    fn execute_batch<'a>(&'a self, batch: &'a Batch) -> BoxFuture<'a, Result<()>>;

    /// Returns associated node address
    fn address(&self) -> SocketAddr;
}

#[cfg(test)]
mock! {
    pub Connection {
    }

    impl Connection for Connection {
        fn execute_query(&self, query: &Query) -> BoxFuture<'static, Result<QueryResult>>;

        fn execute_batch(&self, batch: &Batch) -> BoxFuture<'static, Result<()>>;

        fn address(&self) -> SocketAddr;
    }
}
