use std::sync::Arc;
use tracing::*;

use crate::cluster::node_pool::NodePool;
use crate::error::{Error, Result};
use crate::future::BoxFuture;
use crate::retry::{QueryInfo, RetryDecision, RetrySession};
use crate::transport::Connection;

/// Mid-level interface for sending requests to the cluster. Binds the request to a connection
/// picked from the pool and uses the retry session for error handling. Fails with
/// `Error::Unavailable` as soon as the pool has no connection to offer; otherwise returns the
/// first success or the last error once the retry session gives up.
pub async fn send_request<'a, R>(
    pool: &dyn NodePool,
    mut retry_session: Box<dyn RetrySession + Send + Sync>,
    execute: impl Fn(Arc<dyn Connection>) -> BoxFuture<'a, Result<R>>,
) -> Result<R> {
    let mut attempt = 0;
    let mut connection = pool.pick(None).ok_or(Error::Unavailable)?;

    loop {
        attempt += 1;

        let error = match execute(connection.clone()).await {
            Ok(result) => return Ok(result),
            Err(error) => error,
        };

        let decision = retry_session.decide(QueryInfo {
            error: &error,
            attempt,
        });

        debug!(%error, attempt, address = %connection.address(), %decision, "Request failed.");

        match decision {
            RetryDecision::RetrySameNode => continue,
            RetryDecision::RetryNextNode => {
                connection = pool.pick(None).ok_or(Error::Unavailable)?;
            }
            RetryDecision::DontRetry => return Err(error),
        }
    }
}
