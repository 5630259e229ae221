//! Append-only failover event history.
//!
//! Events are immutable once recorded. The in-memory log retains the most
//! recent `capacity` entries; the admin API reads newest-first.

use parking_lot::RwLock;
use routing_core::{ConfigId, EngineResult, EventSink, FailoverEvent};
use std::collections::VecDeque;
use tracing::debug;

/// Default number of events retained
pub const DEFAULT_EVENT_CAPACITY: usize = 10_000;

/// In-memory implementation of [`EventSink`]
#[derive(Debug)]
pub struct InMemoryEventLog {
    events: RwLock<VecDeque<FailoverEvent>>,
    capacity: usize,
}

impl Default for InMemoryEventLog {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl InMemoryEventLog {
    /// Create a log retaining up to `capacity` events
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            events: RwLock::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    /// Number of retained events
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Whether the log is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Most recent events, newest first
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<FailoverEvent> {
        self.events
            .read()
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    /// Most recent events for one config, newest first
    #[must_use]
    pub fn for_config(&self, config_id: &ConfigId, limit: usize) -> Vec<FailoverEvent> {
        self.events
            .read()
            .iter()
            .rev()
            .filter(|event| event.config_id == *config_id)
            .take(limit)
            .cloned()
            .collect()
    }
}

impl EventSink for InMemoryEventLog {
    fn append(&self, event: FailoverEvent) -> EngineResult<()> {
        let mut events = self.events.write();
        if events.len() == self.capacity {
            events.pop_front();
        }
        debug!(
            config_id = %event.config_id,
            event_type = %event.event_type,
            from = %event.from_provider,
            success = event.success,
            "Failover event recorded"
        );
        events.push_back(event);
        Ok(())
    }
}
