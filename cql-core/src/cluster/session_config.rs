use derivative::Derivative;
use std::sync::Arc;
use std::time::Duration;

use crate::consistency::Consistency;
use crate::retry::{RetryPolicy, SimpleRetryPolicy};
use crate::trace_writer::Tracer;

/// Fraction of a page which must be consumed before the next page is requested in the
/// background.
pub const DEFAULT_PREFETCH: f64 = 0.25;

/// Quiet period after which buffered events are delivered.
pub const DEFAULT_EVENT_DEBOUNCE_WINDOW: Duration = Duration::from_secs(1);

/// Maximum number of events buffered between deliveries.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 1000;

/// Settings copied into every statement created by a session. Changing them on the session
/// affects only statements created afterwards.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct SessionDefaults {
    pub consistency: Consistency,
    /// Rows per page. Zero or less disables paging.
    pub page_size: i32,
    pub prefetch: f64,
    #[derivative(Debug = "ignore")]
    pub tracer: Option<Arc<dyn Tracer>>,
    #[derivative(Debug = "ignore")]
    pub retry_policy: Arc<dyn RetryPolicy + Send + Sync>,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        SessionDefaults {
            consistency: Consistency::default(),
            page_size: 0,
            prefetch: DEFAULT_PREFETCH,
            tracer: None,
            retry_policy: Arc::new(SimpleRetryPolicy::default()),
        }
    }
}

/// Switches for server pushed events. Disabled schema events are dropped on arrival. Disabled
/// topology and status events are still debounced, but the ring is not refreshed for them and
/// node state changes are not dispatched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventsConfig {
    pub disable_schema_events: bool,
    pub disable_topology_events: bool,
    pub disable_node_status_events: bool,
}

/// Timing and capacity of the event debouncers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceConfig {
    pub window: Duration,
    pub buffer_size: usize,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        DebounceConfig {
            window: DEFAULT_EVENT_DEBOUNCE_WINDOW,
            buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
        }
    }
}
