use futures::FutureExt;
use std::io::Write;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::*;
use uuid::Uuid;

use crate::cluster::session::Session;
use crate::consistency::Consistency;
use crate::future::BoxFuture;
use crate::types::unmarshal::Unmarshal;

const SESSION_QUERY: &str =
    "SELECT coordinator, duration FROM system_traces.sessions WHERE session_id = ?";
const EVENTS_QUERY: &str = "SELECT event_id, activity, source, source_elapsed \
     FROM system_traces.events WHERE session_id = ?";

/// Receives the tracing id of every traced statement after it completes successfully.
pub trait Tracer: Send + Sync {
    fn trace(&self, tracing_id: Uuid) -> BoxFuture<'_, ()>;
}

/// Tracer which reads the trace session back from `system_traces` and renders it as text.
///
/// Output format:
///
/// ```text
/// Tracing session <id> (coordinator: <ip>, duration: <duration>):
/// <timestamp>: <activity> (source: <ip>, elapsed: <microseconds>)
/// ```
///
/// Both lookups run at consistency `one` and are never traced themselves.
pub struct TraceWriter {
    session: Weak<Session>,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl TraceWriter {
    pub fn new(session: &Arc<Session>, writer: impl Write + Send + 'static) -> Self {
        TraceWriter {
            session: Arc::downgrade(session),
            writer: Mutex::new(Box::new(writer)),
        }
    }

    async fn render(session: &Arc<Session>, tracing_id: Uuid) -> String {
        let mut coordinator: Option<IpAddr> = None;
        let mut duration: Option<i32> = None;

        let result = {
            let mut dest: [&mut dyn Unmarshal; 2] = [&mut coordinator, &mut duration];
            session
                .query(SESSION_QUERY, query_values!(tracing_id))
                .with_consistency(Consistency::One)
                .with_tracer(None)
                .scan(&mut dest)
                .await
        };

        if let Err(error) = result {
            debug!(%error, %tracing_id, "Unable to read trace session.");
        }

        let mut report = format!(
            "Tracing session {} (coordinator: {}, duration: {:?}):\n",
            tracing_id,
            coordinator.map(|ip| ip.to_string()).unwrap_or_default(),
            Duration::from_micros(duration.unwrap_or_default().max(0) as u64),
        );

        let mut iter = session
            .query(EVENTS_QUERY, query_values!(tracing_id))
            .with_consistency(Consistency::One)
            .with_tracer(None)
            .iter()
            .await;

        let mut event_id = Uuid::nil();
        let mut activity = String::new();
        let mut source = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
        let mut elapsed = 0i32;

        loop {
            let scanned = {
                let mut dest: [&mut dyn Unmarshal; 4] =
                    [&mut event_id, &mut activity, &mut source, &mut elapsed];
                iter.scan(&mut dest).await
            };

            if !scanned {
                break;
            }

            report.push_str(&format!(
                "{}: {} (source: {}, elapsed: {})\n",
                format_event_time(&event_id),
                activity,
                source,
                elapsed
            ));
        }

        if let Err(error) = iter.close() {
            report.push_str(&format!("Error: {error}\n"));
        }

        report
    }
}

impl Tracer for TraceWriter {
    fn trace(&self, tracing_id: Uuid) -> BoxFuture<'_, ()> {
        async move {
            let Some(session) = self.session.upgrade() else {
                return;
            };

            let report = Self::render(&session, tracing_id).await;

            let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
            if let Err(error) = writer.write_all(report.as_bytes()) {
                warn!(%error, %tracing_id, "Unable to write trace.");
            }
        }
        .boxed()
    }
}

/// Formats the creation time embedded in a time-based event id.
fn format_event_time(event_id: &Uuid) -> String {
    let format = format_description!(
        "[year]/[month]/[day] [hour]:[minute]:[second].[subsecond digits:6]"
    );

    event_id
        .get_timestamp()
        .and_then(|timestamp| {
            let (seconds, nanos) = timestamp.to_unix();
            OffsetDateTime::from_unix_timestamp_nanos(
                seconds as i128 * 1_000_000_000 + nanos as i128,
            )
            .ok()
        })
        .and_then(|time| time.format(&format).ok())
        .unwrap_or_else(|| event_id.to_string())
}
