//! Append-only in-memory event ledger.

use chrono::{DateTime, Utc};
use ice_core::{Event, EventId, RunId};
use parking_lot::{Mutex, MutexGuard};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::filter::EventFilter;

/// Per-run index kept alongside the log.
#[derive(Debug, Default)]
struct RunIndex {
    ids: HashSet<EventId>,
    last_timestamp: Option<DateTime<Utc>>,
}

/// Ledger contents. Only reachable through the store's lock.
#[derive(Debug, Default)]
pub(crate) struct Ledger {
    events: Vec<Arc<Event>>,
    runs: HashMap<RunId, RunIndex>,
}

impl Ledger {
    /// Ids already accepted for `run_id`.
    pub(crate) fn ids_in(&self, run_id: &str) -> Option<&HashSet<EventId>> {
        self.runs.get(run_id).map(|run| &run.ids)
    }

    /// Timestamp of the most recently accepted event, any run.
    pub(crate) fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.events.last().map(|event| event.timestamp())
    }

    /// Timestamp of the most recently accepted event of `run_id`.
    pub(crate) fn last_timestamp_in(&self, run_id: &str) -> Option<DateTime<Utc>> {
        self.runs.get(run_id).and_then(|run| run.last_timestamp)
    }

    /// Adds one event at the end. The caller has validated it.
    pub(crate) fn append(&mut self, event: Event) -> Arc<Event> {
        let event = Arc::new(event);
        let run = self.runs.entry(event.run_id().to_string()).or_default();
        run.ids.insert(event.event_id().to_string());
        run.last_timestamp = Some(event.timestamp());
        self.events.push(Arc::clone(&event));
        event
    }
}

/// Append-only store of accepted events.
///
/// The log is never reordered, truncated or edited. The only growth path is
/// [`EventEmitter::emit`](crate::EventEmitter::emit); everything public here
/// is a read. Every read takes the same lock as appends, so callers never see
/// a half-appended state.
#[derive(Debug, Default)]
pub struct EventStore {
    ledger: Mutex<Ledger>,
}

impl EventStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusive access to the ledger; held across a whole emission.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock()
    }

    /// Every accepted event, in acceptance order.
    pub fn all(&self) -> Vec<Arc<Event>> {
        self.ledger.lock().events.clone()
    }

    /// Accepted events of one run, in acceptance order.
    pub fn by_run(&self, run_id: &str) -> Vec<Arc<Event>> {
        self.ledger
            .lock()
            .events
            .iter()
            .filter(|event| event.run_id() == run_id)
            .cloned()
            .collect()
    }

    /// Most recently accepted event.
    pub fn last(&self) -> Option<Arc<Event>> {
        self.ledger.lock().events.last().cloned()
    }

    /// Most recently accepted event of one run.
    pub fn last_in_run(&self, run_id: &str) -> Option<Arc<Event>> {
        self.ledger
            .lock()
            .events
            .iter()
            .rev()
            .find(|event| event.run_id() == run_id)
            .cloned()
    }

    /// Ids already accepted for one run.
    pub fn known_ids(&self, run_id: &str) -> HashSet<EventId> {
        self.ledger
            .lock()
            .ids_in(run_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Accepted events matching `filter`, in acceptance order.
    pub fn select<F: EventFilter + ?Sized>(&self, filter: &F) -> Vec<Arc<Event>> {
        self.ledger
            .lock()
            .events
            .iter()
            .filter(|event| filter.matches(event))
            .cloned()
            .collect()
    }

    /// Number of accepted events.
    pub fn len(&self) -> usize {
        self.ledger.lock().events.len()
    }

    /// True if nothing has been accepted yet.
    pub fn is_empty(&self) -> bool {
        self.ledger.lock().events.is_empty()
    }

    /// Iterates a snapshot taken at call time.
    pub fn iter(&self) -> std::vec::IntoIter<Arc<Event>> {
        self.all().into_iter()
    }
}

impl<'a> IntoIterator for &'a EventStore {
    type Item = Arc<Event>;
    type IntoIter = std::vec::IntoIter<Arc<Event>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
