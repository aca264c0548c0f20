//! Coalescing of server pushed events.
//!
//! Servers tend to emit bursts of related events (every replica announcing the same schema
//! change, a node flapping). An [`EventDebouncer`] buffers incoming events and hands them over in
//! one batch once no new event arrived for the configured window.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep_until, Instant};
use tracing::*;

use crate::cluster::session_config::DebounceConfig;
use crate::frame::events::ServerEvent;
use crate::future::BoxFuture;

pub use crate::frame::events::{
    SchemaChange, SchemaChangeTarget, SchemaChangeType, StatusChange, StatusChangeType,
    TopologyChange, TopologyChangeType,
};

/// Receives batches of debounced events. Each batch is handled by a separate task.
pub type EventCallback = Arc<dyn Fn(Vec<ServerEvent>) -> BoxFuture<'static, ()> + Send + Sync>;

enum Command {
    Debounce(ServerEvent),
    Stop(oneshot::Sender<()>),
}

/// Buffers events and delivers them in batches after a quiet period.
///
/// Every new event restarts the quiet period. When the buffer is full, new events are dropped
/// until the next delivery. Delivery happens on a new task, so a slow callback never delays
/// buffering.
pub struct EventDebouncer {
    name: &'static str,
    commands: mpsc::UnboundedSender<Command>,
    dropped_events: Arc<AtomicUsize>,
}

impl EventDebouncer {
    /// Creates a debouncer and starts its worker. Must be called within a tokio runtime.
    pub fn new(name: &'static str, config: DebounceConfig, callback: EventCallback) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        let dropped_events = Arc::new(AtomicUsize::new(0));

        let worker = DebouncerWorker {
            name,
            window: config.window,
            buffer_size: config.buffer_size,
            callback,
            commands: receiver,
            dropped_events: dropped_events.clone(),
        };

        tokio::spawn(worker.work());

        EventDebouncer {
            name,
            commands,
            dropped_events,
        }
    }

    /// Adds an event to the current batch.
    pub fn debounce(&self, event: ServerEvent) {
        if self.commands.send(Command::Debounce(event)).is_err() {
            debug!(debouncer = self.name, "Debouncer stopped, ignoring event.");
        }
    }

    /// Stops the worker, discarding buffered events. No batch is delivered after this returns.
    pub async fn stop(&self) {
        let (sender, receiver) = oneshot::channel();
        if self.commands.send(Command::Stop(sender)).is_ok() {
            // the worker might be already gone
            let _ = receiver.await;
        }
    }

    /// Number of events dropped because the buffer was full.
    #[inline]
    pub fn dropped_events(&self) -> usize {
        self.dropped_events.load(Ordering::Relaxed)
    }
}

struct DebouncerWorker {
    name: &'static str,
    window: Duration,
    buffer_size: usize,
    callback: EventCallback,
    commands: mpsc::UnboundedReceiver<Command>,
    dropped_events: Arc<AtomicUsize>,
}

impl DebouncerWorker {
    async fn work(mut self) {
        let mut events = Vec::with_capacity(self.buffer_size);
        let mut deadline = Instant::now();

        loop {
            tokio::select! {
                command = self.commands.recv() => {
                    match command {
                        Some(Command::Debounce(event)) => {
                            deadline = Instant::now() + self.window;

                            if events.len() < self.buffer_size {
                                events.push(event);
                            } else {
                                self.dropped_events.fetch_add(1, Ordering::Relaxed);
                                warn!(debouncer = self.name, ?event, "Buffer full, dropping event.");
                            }
                        }
                        Some(Command::Stop(ack)) => {
                            let _ = ack.send(());
                            return;
                        }
                        // all handles dropped
                        None => return,
                    }
                }
                _ = sleep_until(deadline), if !events.is_empty() => {
                    let batch = std::mem::replace(&mut events, Vec::with_capacity(self.buffer_size));
                    debug!(debouncer = self.name, events = batch.len(), "Delivering events.");
                    tokio::spawn((self.callback)(batch));
                }
            }
        }
    }
}
