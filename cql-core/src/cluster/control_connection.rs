#[cfg(test)]
use mockall::*;

use crate::future::BoxFuture;
use crate::Result;

/// The dedicated connection used for cluster-wide metadata operations.
pub trait ControlConnection: Send + Sync {
    /// Schedules a full topology refresh. Returns without waiting for it to finish.
    fn refresh_ring(&self);

    /// Waits until all reachable hosts report the same schema version.
    fn await_schema_agreement(&self) -> BoxFuture<'_, Result<()>>;
}

#[cfg(test)]
mock! {
    pub ControlConnection {
    }

    impl ControlConnection for ControlConnection {
        fn refresh_ring(&self);

        fn await_schema_agreement(&self) -> BoxFuture<'static, Result<()>>;
    }
}
