#![allow(dead_code)]

use bytes::Bytes;
use futures::FutureExt;
use std::io::Write;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use cql_core::cluster::topology::HostInfo;
use cql_core::cluster::{ControlConnection, NodePool, Session, SessionBuilder};
use cql_core::error::Result;
use cql_core::frame::message_result::{ColumnSpec, ColumnType, QueryResult, Row};
use cql_core::future::BoxFuture;
use cql_core::load_balancing::{HostSelectionPolicy, KeyspaceUpdateEvent};
use cql_core::statement::{Batch, BatchEntry, Query};
use cql_core::transport::Connection;

pub type Responder = Box<dyn Fn(&Query) -> Result<QueryResult> + Send + Sync>;

/// Connection answering statements from memory and recording what it was asked.
pub struct MemoryConnection {
    responder: Responder,
    continuation_delay: Duration,
    queries: Mutex<Vec<String>>,
    batches: Mutex<Vec<Vec<BatchEntry>>>,
}

impl MemoryConnection {
    pub fn new(responder: Responder) -> Self {
        MemoryConnection {
            responder,
            continuation_delay: Duration::ZERO,
            queries: Default::default(),
            batches: Default::default(),
        }
    }

    /// Delays answers to requests carrying a paging state.
    pub fn with_continuation_delay(mut self, delay: Duration) -> Self {
        self.continuation_delay = delay;
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn batches(&self) -> Vec<Vec<BatchEntry>> {
        self.batches.lock().unwrap().clone()
    }
}

impl Connection for MemoryConnection {
    fn execute_query<'a>(&'a self, query: &'a Query) -> BoxFuture<'a, Result<QueryResult>> {
        self.queries
            .lock()
            .unwrap()
            .push(query.statement().to_string());

        let result = (self.responder)(query);
        let delay = if query.paging_state().is_some() {
            self.continuation_delay
        } else {
            Duration::ZERO
        };

        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            result
        }
        .boxed()
    }

    fn execute_batch<'a>(&'a self, batch: &'a Batch) -> BoxFuture<'a, Result<()>> {
        self.batches.lock().unwrap().push(batch.entries().to_vec());
        async { Ok(()) }.boxed()
    }

    fn address(&self) -> SocketAddr {
        SocketAddr::new(Ipv4Addr::LOCALHOST.into(), 9042)
    }
}

/// Pool with a single always available connection.
pub struct MemoryPool {
    connection: Arc<MemoryConnection>,
    closed: AtomicBool,
    picks: AtomicUsize,
}

impl MemoryPool {
    pub fn picks(&self) -> usize {
        self.picks.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl NodePool for MemoryPool {
    fn pick(&self, _exclude: Option<Uuid>) -> Option<Arc<dyn Connection>> {
        self.picks.fetch_add(1, Ordering::SeqCst);
        Some(self.connection.clone())
    }

    fn add_host(&self, _host: Arc<HostInfo>) {}

    fn remove_host(&self, _host_id: Uuid) {}

    fn size(&self) -> usize {
        1
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

pub struct NoopPolicy;

impl HostSelectionPolicy for NoopPolicy {
    fn add_host(&self, _host: Arc<HostInfo>) {}

    fn host_up(&self, _host: Arc<HostInfo>) {}

    fn host_down(&self, _host: Arc<HostInfo>) {}

    fn keyspace_changed(&self, _event: KeyspaceUpdateEvent) {}
}

pub struct NoopControlConnection;

impl ControlConnection for NoopControlConnection {
    fn refresh_ring(&self) {}

    fn await_schema_agreement(&self) -> BoxFuture<'_, Result<()>> {
        async { Ok(()) }.boxed()
    }
}

pub struct TestCluster {
    pub session: Arc<Session>,
    pub connection: Arc<MemoryConnection>,
    pub pool: Arc<MemoryPool>,
}

pub fn setup(
    responder: impl Fn(&Query) -> Result<QueryResult> + Send + Sync + 'static,
) -> TestCluster {
    setup_with(responder, |builder| builder)
}

pub fn setup_with(
    responder: impl Fn(&Query) -> Result<QueryResult> + Send + Sync + 'static,
    configure: impl FnOnce(SessionBuilder) -> SessionBuilder,
) -> TestCluster {
    setup_connection(MemoryConnection::new(Box::new(responder)), configure)
}

/// Cluster whose following pages arrive only after `delay`.
pub fn setup_with_slow_pages(
    responder: impl Fn(&Query) -> Result<QueryResult> + Send + Sync + 'static,
    delay: Duration,
) -> TestCluster {
    setup_connection(
        MemoryConnection::new(Box::new(responder)).with_continuation_delay(delay),
        |builder| builder,
    )
}

fn setup_connection(
    connection: MemoryConnection,
    configure: impl FnOnce(SessionBuilder) -> SessionBuilder,
) -> TestCluster {
    let connection = Arc::new(connection);
    let pool = Arc::new(MemoryPool {
        connection: connection.clone(),
        closed: AtomicBool::new(false),
        picks: AtomicUsize::new(0),
    });

    let builder = SessionBuilder::new(
        pool.clone(),
        Arc::new(NoopPolicy),
        Arc::new(NoopControlConnection),
    );

    TestCluster {
        session: configure(builder).build(),
        connection,
        pool,
    }
}

pub fn column(name: &str, col_type: ColumnType) -> ColumnSpec {
    ColumnSpec::new("ks".into(), "tbl".into(), name.into(), col_type)
}

pub fn int(value: i32) -> Option<Bytes> {
    Some(Bytes::copy_from_slice(&value.to_be_bytes()))
}

pub fn text(value: &str) -> Option<Bytes> {
    Some(Bytes::copy_from_slice(value.as_bytes()))
}

pub fn boolean(value: bool) -> Option<Bytes> {
    Some(Bytes::copy_from_slice(&[value as u8]))
}

/// Serves `rows` in pages of the requested size. The paging state is the offset of the next page.
pub fn paged_table(
    columns: Vec<ColumnSpec>,
    rows: Vec<Row>,
) -> impl Fn(&Query) -> Result<QueryResult> + Send + Sync + 'static {
    move |query| {
        let offset = query
            .paging_state()
            .map(|state| u32::from_be_bytes(state[..4].try_into().unwrap()) as usize)
            .unwrap_or(0);

        let end = if query.page_size() > 0 {
            (offset + query.page_size() as usize).min(rows.len())
        } else {
            rows.len()
        };

        let result = QueryResult::new_rows(columns.clone(), rows[offset..end].to_vec());
        if end < rows.len() {
            Ok(result.with_paging_state(Some(Bytes::copy_from_slice(
                &(end as u32).to_be_bytes(),
            ))))
        } else {
            Ok(result)
        }
    }
}

/// Table of `count` rows with an `id` column holding the row number.
pub fn numbers(count: i32) -> impl Fn(&Query) -> Result<QueryResult> + Send + Sync + 'static {
    paged_table(
        vec![column("id", ColumnType::Int)],
        (0..count).map(|id| vec![int(id)]).collect(),
    )
}

/// Cloneable in-memory sink for text output.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
