//! The single write gateway.
//!
//! If an event did not pass through [`EventEmitter::emit`], it does not exist.

use ice_core::{Event, EventValidator};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::EventEmissionError;
use crate::store::EventStore;

/// Which accepted event the temporal check compares against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemporalScope {
    /// The last event accepted in any run. Time never goes backwards
    /// anywhere in the store.
    #[default]
    Global,
    /// The last event accepted in the same run. Runs are independent clocks.
    PerRun,
}

/// Options for an emitter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitterOptions {
    /// Scope of the temporal monotonicity check (default: global).
    pub temporal_scope: TemporalScope,
}

/// Validates events and records the accepted ones.
///
/// Several emitters may share one store across threads. The snapshot of
/// known ids and last timestamp, the validation, and the append all happen
/// under the store's lock, so concurrent emissions are serialized and never
/// validate against a stale view.
///
/// # Example
///
/// ```rust
/// use ice_core::Event;
/// use ice_store::{EventEmitter, EventStore};
/// use std::sync::Arc;
///
/// let store = Arc::new(EventStore::new());
/// let emitter = EventEmitter::new(Arc::clone(&store));
///
/// let event = Event::builder("e1", "run-1", "RunProvisioned", "runtime").build()?;
/// emitter.emit(event)?;
/// assert_eq!(store.len(), 1);
///
/// let forged = Event::builder("e2", "run-1", "RunCommitted", "agent:42").build()?;
/// assert!(emitter.emit(forged).is_err());
/// assert_eq!(store.len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct EventEmitter {
    store: Arc<EventStore>,
    options: EmitterOptions,
}

impl EventEmitter {
    /// Creates an emitter with default options.
    pub fn new(store: Arc<EventStore>) -> Self {
        Self::with_options(store, EmitterOptions::default())
    }

    /// Creates an emitter with explicit options.
    pub fn with_options(store: Arc<EventStore>, options: EmitterOptions) -> Self {
        Self { store, options }
    }

    /// Options in effect.
    pub fn options(&self) -> &EmitterOptions {
        &self.options
    }

    /// Read-only view of the backing store.
    pub fn store(&self) -> &EventStore {
        &self.store
    }

    /// Validates `event` and, only on success, appends it.
    ///
    /// # Errors
    ///
    /// Returns [`EventEmissionError`] carrying the rejecting stage. Nothing
    /// is appended on failure.
    pub fn emit(&self, event: Event) -> Result<Arc<Event>, EventEmissionError> {
        let mut ledger = self.store.lock();

        let empty = HashSet::new();
        let known_ids = ledger.ids_in(event.run_id()).unwrap_or(&empty);
        let last_timestamp = match self.options.temporal_scope {
            TemporalScope::Global => ledger.last_timestamp(),
            TemporalScope::PerRun => ledger.last_timestamp_in(event.run_id()),
        };

        if let Err(cause) = EventValidator::validate(&event, known_ids, last_timestamp) {
            tracing::warn!(
                event_id = event.event_id(),
                run_id = event.run_id(),
                event_type = event.event_type(),
                origin = event.origin(),
                reason = %cause,
                "event rejected"
            );
            return Err(EventEmissionError::new(&event, cause));
        }

        let accepted = ledger.append(event);
        tracing::debug!(
            event_id = accepted.event_id(),
            run_id = accepted.run_id(),
            event_type = accepted.event_type(),
            origin = accepted.origin(),
            integrity = %accepted.integrity(),
            "event accepted"
        );
        Ok(accepted)
    }
}
