use arc_swap::ArcSwap;
use futures::FutureExt;
use std::sync::Arc;
use tracing::*;

use crate::cluster::control_connection::ControlConnection;
use crate::cluster::event_reconciler::EventReconciler;
use crate::cluster::host_filter::{AcceptAllHostFilter, HostFilter};
use crate::cluster::node_pool::NodePool;
use crate::cluster::pager::Iter;
use crate::cluster::ring::Ring;
use crate::cluster::schema_describer::{NoopSchemaDescriber, SchemaDescriber};
use crate::cluster::send_request::send_request;
use crate::cluster::session_config::{DebounceConfig, EventsConfig, SessionDefaults};
use crate::cluster::topology::HostInfo;
use crate::consistency::Consistency;
use crate::error::{Error, Result};
use crate::events::{EventCallback, EventDebouncer};
use crate::frame::events::ServerEvent;
use crate::frame::message_batch::BatchType;
use crate::frame::FromBytes;
use crate::load_balancing::HostSelectionPolicy;
use crate::retry::RetryPolicy;
use crate::statement::{Batch, Query, MAX_BATCH_STATEMENTS};
use crate::trace_writer::Tracer;
use crate::types::value::QueryValues;

/// Entry point for executing statements against a cluster. Also consumes server pushed events
/// and keeps the node pool and host selection policy in sync with them.
///
/// Settings changed on a session apply to statements created afterwards.
pub struct Session {
    defaults: ArcSwap<SessionDefaults>,
    pool: Arc<dyn NodePool>,
    ring: Arc<Ring>,
    reconciler: Arc<EventReconciler>,
    events_config: EventsConfig,
    schema_events: EventDebouncer,
    node_events: EventDebouncer,
}

impl Session {
    /// Creates a query with the current session defaults.
    pub fn query(
        self: &Arc<Self>,
        statement: impl Into<String>,
        values: impl Into<QueryValues>,
    ) -> Query {
        Query::new(
            self.clone(),
            &self.defaults.load(),
            statement.into(),
            values.into(),
        )
    }

    /// Creates an empty batch with the current session defaults.
    pub fn batch(&self, batch_type: BatchType) -> Batch {
        Batch::with_defaults(batch_type, &self.defaults.load())
    }

    /// Snapshot of settings new statements are created with.
    #[inline]
    pub fn defaults(&self) -> Arc<SessionDefaults> {
        self.defaults.load_full()
    }

    pub fn set_consistency(&self, consistency: Consistency) {
        self.defaults.rcu(|defaults| SessionDefaults {
            consistency,
            ..SessionDefaults::clone(defaults)
        });
    }

    /// Sets the default page size. Zero or less disables paging.
    pub fn set_page_size(&self, page_size: i32) {
        self.defaults.rcu(|defaults| SessionDefaults {
            page_size,
            ..SessionDefaults::clone(defaults)
        });
    }

    pub fn set_prefetch(&self, prefetch: f64) {
        self.defaults.rcu(|defaults| SessionDefaults {
            prefetch,
            ..SessionDefaults::clone(defaults)
        });
    }

    /// Sets the default tracer. `None` disables tracing.
    pub fn set_tracer(&self, tracer: Option<Arc<dyn Tracer>>) {
        self.defaults.rcu(|defaults| SessionDefaults {
            tracer: tracer.clone(),
            ..SessionDefaults::clone(defaults)
        });
    }

    pub fn set_retry_policy(&self, retry_policy: Arc<dyn RetryPolicy + Send + Sync>) {
        self.defaults.rcu(|defaults| SessionDefaults {
            retry_policy: retry_policy.clone(),
            ..SessionDefaults::clone(defaults)
        });
    }

    #[inline]
    pub fn ring(&self) -> &Arc<Ring> {
        &self.ring
    }

    #[inline]
    pub fn pool(&self) -> &Arc<dyn NodePool> {
        &self.pool
    }

    /// Executes a query, retrying according to its retry policy. Errors are reported through the
    /// returned iterator.
    pub async fn execute_query(&self, query: &Query) -> Iter {
        let result = send_request(
            self.pool.as_ref(),
            query.retry_policy().new_session(),
            |connection| async move { connection.execute_query(query).await }.boxed(),
        )
        .await;

        match result {
            Ok(result) => {
                if let (Some(tracer), Some(tracing_id)) = (query.tracer(), result.tracing_id) {
                    tracer.trace(tracing_id).await;
                }

                Iter::from_result(query, result)
            }
            Err(error) => Iter::with_error(error),
        }
    }

    /// Executes all statements of a batch as one request.
    pub async fn execute_batch(&self, batch: &Batch) -> Result<()> {
        if batch.len() > MAX_BATCH_STATEMENTS {
            return Err(Error::TooManyStatements(batch.len()));
        }

        send_request(
            self.pool.as_ref(),
            batch.retry_policy().new_session(),
            |connection| async move { connection.execute_batch(batch).await }.boxed(),
        )
        .await
    }

    /// Decodes the body of an EVENT frame and queues the event. Malformed frames are dropped.
    pub fn handle_event_frame(&self, body: &[u8]) {
        match ServerEvent::from_bytes(body) {
            Ok(event) => self.handle_event(event),
            Err(error) => warn!(%error, "Unable to parse event frame."),
        }
    }

    /// Queues a server event for debounced processing.
    pub fn handle_event(&self, event: ServerEvent) {
        debug!(?event, "Handling event.");

        if event.is_schema_change() {
            if self.events_config.disable_schema_events {
                debug!("Schema events disabled, dropping event.");
                return;
            }

            self.schema_events.debounce(event);
        } else {
            self.node_events.debounce(event);
        }
    }

    /// Called by the pool once it established a connection to a host.
    #[inline]
    pub fn handle_node_connected(&self, host: &Arc<HostInfo>) {
        self.reconciler.handle_node_connected(host);
    }

    /// Stops event processing and closes all connections.
    pub async fn close(&self) {
        self.schema_events.stop().await;
        self.node_events.stop().await;
        self.pool.close();
    }
}

/// Builder of [`Session`]. Node pool, host selection policy and control connection are
/// mandatory; everything else has defaults.
pub struct SessionBuilder {
    pool: Arc<dyn NodePool>,
    policy: Arc<dyn HostSelectionPolicy>,
    control_connection: Arc<dyn ControlConnection>,
    ring: Arc<Ring>,
    schema_describer: Arc<dyn SchemaDescriber>,
    host_filter: Arc<dyn HostFilter>,
    defaults: SessionDefaults,
    events_config: EventsConfig,
    debounce_config: DebounceConfig,
}

impl SessionBuilder {
    pub fn new(
        pool: Arc<dyn NodePool>,
        policy: Arc<dyn HostSelectionPolicy>,
        control_connection: Arc<dyn ControlConnection>,
    ) -> Self {
        SessionBuilder {
            pool,
            policy,
            control_connection,
            ring: Default::default(),
            schema_describer: Arc::new(NoopSchemaDescriber),
            host_filter: Arc::new(AcceptAllHostFilter),
            defaults: Default::default(),
            events_config: Default::default(),
            debounce_config: Default::default(),
        }
    }

    /// Sets the topology view shared with the control connection.
    #[must_use]
    pub fn with_ring(mut self, ring: Arc<Ring>) -> Self {
        self.ring = ring;
        self
    }

    #[must_use]
    pub fn with_schema_describer(mut self, schema_describer: Arc<dyn SchemaDescriber>) -> Self {
        self.schema_describer = schema_describer;
        self
    }

    /// Sets the filter deciding which hosts the pool and policy should use.
    #[must_use]
    pub fn with_host_filter(mut self, host_filter: Arc<dyn HostFilter>) -> Self {
        self.host_filter = host_filter;
        self
    }

    #[must_use]
    pub fn with_consistency(mut self, consistency: Consistency) -> Self {
        self.defaults.consistency = consistency;
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.defaults.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_prefetch(mut self, prefetch: f64) -> Self {
        self.defaults.prefetch = prefetch;
        self
    }

    #[must_use]
    pub fn with_tracer(mut self, tracer: Arc<dyn Tracer>) -> Self {
        self.defaults.tracer = Some(tracer);
        self
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry_policy: Arc<dyn RetryPolicy + Send + Sync>) -> Self {
        self.defaults.retry_policy = retry_policy;
        self
    }

    #[must_use]
    pub fn with_events_config(mut self, events_config: EventsConfig) -> Self {
        self.events_config = events_config;
        self
    }

    #[must_use]
    pub fn with_debounce_config(mut self, debounce_config: DebounceConfig) -> Self {
        self.debounce_config = debounce_config;
        self
    }

    /// Finalizes building process. Must be called within a tokio runtime, since event processing
    /// runs on background tasks.
    pub fn build(self) -> Arc<Session> {
        let reconciler = Arc::new(EventReconciler::new(
            self.ring.clone(),
            self.pool.clone(),
            self.policy,
            self.control_connection,
            self.schema_describer,
            self.host_filter,
            self.events_config,
        ));

        let schema_reconciler = reconciler.clone();
        let schema_callback: EventCallback = Arc::new(move |events: Vec<ServerEvent>| {
            let reconciler = schema_reconciler.clone();
            async move { reconciler.handle_schema_events(events).await }.boxed()
        });

        let node_reconciler = reconciler.clone();
        let node_callback: EventCallback = Arc::new(move |events: Vec<ServerEvent>| {
            let reconciler = node_reconciler.clone();
            async move { reconciler.handle_node_events(events).await }.boxed()
        });

        Arc::new(Session {
            defaults: ArcSwap::from_pointee(self.defaults),
            pool: self.pool,
            ring: self.ring,
            reconciler,
            events_config: self.events_config,
            schema_events: EventDebouncer::new("schema", self.debounce_config, schema_callback),
            node_events: EventDebouncer::new("node", self.debounce_config, node_callback),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, SocketAddr};
    use std::sync::Mutex;
    use std::time::Duration;
    use uuid::Uuid;

    use super::*;
    use crate::cluster::control_connection::MockControlConnection;
    use crate::cluster::node_pool::MockNodePool;
    use crate::frame::events::{SchemaChange, SchemaChangeType};
    use crate::frame::message_result::QueryResult;
    use crate::frame::Serialize;
    use crate::future::BoxFuture;
    use crate::load_balancing::MockHostSelectionPolicy;
    use crate::retry::SimpleRetryPolicy;
    use crate::transport::{Connection, MockConnection};

    fn session_with_pool(pool: MockNodePool) -> Arc<Session> {
        let mut control_connection = MockControlConnection::new();
        control_connection
            .expect_await_schema_agreement()
            .returning(|| async { Ok(()) }.boxed());

        SessionBuilder::new(
            Arc::new(pool),
            Arc::new(MockHostSelectionPolicy::new()),
            Arc::new(control_connection),
        )
        .build()
    }

    fn connection(result: QueryResult) -> Arc<dyn Connection> {
        let mut connection = MockConnection::new();
        connection
            .expect_address()
            .returning(|| SocketAddr::new(Ipv4Addr::LOCALHOST.into(), 9042));
        connection
            .expect_execute_query()
            .returning(move |_| {
                let result = result.clone();
                async move { Ok(result) }.boxed()
            });
        Arc::new(connection)
    }

    #[derive(Default)]
    struct RecordingTracer {
        traced: Mutex<Vec<Uuid>>,
    }

    impl Tracer for RecordingTracer {
        fn trace(&self, tracing_id: Uuid) -> BoxFuture<'_, ()> {
            self.traced.lock().unwrap().push(tracing_id);
            async {}.boxed()
        }
    }

    #[tokio::test]
    async fn should_reject_oversized_batch_without_picking_connection() {
        let mut pool = MockNodePool::new();
        pool.expect_pick().never();
        let session = session_with_pool(pool);

        let mut batch = session.batch(BatchType::Logged);
        for _ in 0..=MAX_BATCH_STATEMENTS {
            batch.add_query("INSERT INTO t (id) VALUES (1)", query_values!());
        }

        assert!(matches!(
            session.execute_batch(&batch).await,
            Err(Error::TooManyStatements(65537))
        ));
    }

    #[tokio::test]
    async fn should_copy_defaults_into_new_statements_only() {
        let session = session_with_pool(MockNodePool::new());
        let before = session.query("SELECT * FROM t", query_values!());

        session.set_consistency(Consistency::LocalOne);
        session.set_page_size(100);
        session.set_retry_policy(Arc::new(SimpleRetryPolicy::new(2)));

        let after = session.query("SELECT * FROM t", query_values!());

        assert_eq!(before.consistency(), Consistency::Quorum);
        assert_eq!(before.page_size(), 0);
        assert_eq!(after.consistency(), Consistency::LocalOne);
        assert_eq!(after.page_size(), 100);
        assert_eq!(
            session.batch(BatchType::Logged).consistency(),
            Consistency::LocalOne
        );
    }

    #[tokio::test]
    async fn should_trace_queries_returning_tracing_id() {
        let tracing_id = Uuid::new_v4();
        let mut pool = MockNodePool::new();
        pool.expect_pick().returning(move |_| {
            Some(connection(
                QueryResult::void().with_tracing_id(Some(tracing_id)),
            ))
        });

        let session = session_with_pool(pool);
        let tracer = Arc::new(RecordingTracer::default());
        session.set_tracer(Some(tracer.clone()));

        session
            .query("INSERT INTO t (id) VALUES (1)", query_values!())
            .exec()
            .await
            .unwrap();

        session
            .query("INSERT INTO t (id) VALUES (1)", query_values!())
            .with_tracer(None)
            .exec()
            .await
            .unwrap();

        assert_eq!(*tracer.traced.lock().unwrap(), vec![tracing_id]);
    }

    #[tokio::test]
    async fn should_report_unavailable_through_iterator() {
        let mut pool = MockNodePool::new();
        pool.expect_pick().returning(|_| None);
        let session = session_with_pool(pool);

        let iter = session
            .query("SELECT * FROM t", query_values!())
            .iter()
            .await;

        assert!(matches!(iter.close(), Err(Error::Unavailable)));
    }

    #[tokio::test]
    async fn should_stop_events_and_close_pool() {
        let mut pool = MockNodePool::new();
        pool.expect_close().times(1).return_const(());
        let session = session_with_pool(pool);

        session.close().await;

        // ignored after close
        session.handle_event(ServerEvent::SchemaChange(SchemaChange::Keyspace {
            change_type: SchemaChangeType::Dropped,
            keyspace: "ks".into(),
        }));
    }

    #[tokio::test(start_paused = true)]
    async fn should_route_event_frames_to_reconciler() {
        let pool = MockNodePool::new();
        let mut policy = MockHostSelectionPolicy::new();
        let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();
        policy.expect_keyspace_changed().returning(move |event| {
            let _ = sender.send(event);
        });

        let mut control_connection = MockControlConnection::new();
        control_connection
            .expect_await_schema_agreement()
            .returning(|| async { Ok(()) }.boxed());

        let session = SessionBuilder::new(
            Arc::new(pool),
            Arc::new(policy),
            Arc::new(control_connection),
        )
        .with_debounce_config(DebounceConfig {
            window: Duration::from_millis(100),
            buffer_size: 10,
        })
        .build();

        let body = ServerEvent::SchemaChange(SchemaChange::Keyspace {
            change_type: SchemaChangeType::Created,
            keyspace: "ks".into(),
        })
        .serialize_to_vec();

        session.handle_event_frame(&[0, 3, b'F', b'O', b'O']);
        session.handle_event_frame(&body);

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.keyspace, "ks");
        assert_eq!(event.change, SchemaChangeType::Created);
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_debounce_disabled_schema_events() {
        let mut policy = MockHostSelectionPolicy::new();
        policy.expect_keyspace_changed().never();

        let session = SessionBuilder::new(
            Arc::new(MockNodePool::new()),
            Arc::new(policy),
            Arc::new(MockControlConnection::new()),
        )
        .with_events_config(EventsConfig {
            disable_schema_events: true,
            ..Default::default()
        })
        .build();

        session.handle_event(ServerEvent::SchemaChange(SchemaChange::Keyspace {
            change_type: SchemaChangeType::Created,
            keyspace: "ks".into(),
        }));

        tokio::time::sleep(Duration::from_secs(5)).await;
    }
}
