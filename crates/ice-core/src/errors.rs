use thiserror::Error;

use crate::lifecycle::RunState;

/// Lookup failure against the closed taxonomy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyError {
    /// The event type is not part of the vocabulary.
    #[error("unknown event_type '{0}'")]
    UnknownEventType(String),
}

/// An event failed structural construction; the event never exists.
#[derive(Error, Debug)]
pub enum EventInvariantViolation {
    /// A required identifier field is empty.
    #[error("{0} is missing or empty")]
    EmptyField(&'static str),
    /// Timestamp could not be interpreted as a point in time.
    #[error("timestamp is not valid: {0}")]
    InvalidTimestamp(String),
    /// Payload is not a JSON object.
    #[error("payload must be a mapping")]
    PayloadNotMapping,
    /// Causality was supplied but holds no parents.
    #[error("causality must not be empty when present")]
    EmptyCausality,
    /// The fingerprint could not be computed.
    #[error("integrity computation failed: {0}")]
    Fingerprint(#[from] ice_canonical::FingerprintError),
    /// A transported record carries a fingerprint that does not match its fields.
    #[error("integrity mismatch: record claims {claimed}, fields hash to {computed}")]
    IntegrityMismatch {
        /// Fingerprint carried by the record.
        claimed: String,
        /// Fingerprint recomputed from the record's fields.
        computed: String,
    },
}

/// Rejection raised by one of the validator stages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Structural re-check failed.
    #[error("structural violation: {0}")]
    Structural(String),
    /// Event type is outside the closed taxonomy.
    #[error("taxonomy violation: unknown event_type '{event_type}'")]
    Taxonomy {
        /// Offending event type.
        event_type: String,
    },
    /// Origin may not emit this event type.
    #[error("authority violation: origin '{origin}' not authorized for event_type '{event_type}'")]
    Authority {
        /// Claimed origin.
        origin: String,
        /// Event type the origin tried to emit.
        event_type: String,
    },
    /// Timestamp goes backwards relative to the last accepted event.
    #[error("temporal violation: timestamp {timestamp} precedes last accepted {last}")]
    Temporal {
        /// Candidate timestamp (RFC 3339).
        timestamp: String,
        /// Last accepted timestamp (RFC 3339).
        last: String,
    },
    /// A declared causal parent is not known in the run.
    #[error("causality violation: unknown causal event_id '{parent}'")]
    Causality {
        /// Unknown parent id.
        parent: String,
    },
    /// The event id has already been accepted in the run.
    #[error("identity violation: event_id '{event_id}' already recorded in run '{run_id}'")]
    DuplicateEventId {
        /// Repeated event id.
        event_id: String,
        /// Run the id belongs to.
        run_id: String,
    },
}

/// The Run state machine rejected a transition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidStateTransition {
    /// The run is already terminated.
    #[error("run already TERMINATED, cannot transition to {attempted}")]
    AlreadyTerminated {
        /// Requested target, as given by the caller.
        attempted: String,
    },
    /// Target is not a known state.
    #[error("unknown state: {0}")]
    UnknownState(String),
    /// The edge is not part of the transition table.
    #[error("illegal transition: {from} -> {to}")]
    IllegalEdge {
        /// Current state.
        from: RunState,
        /// Requested state.
        to: RunState,
    },
    /// Finalize called from a non-conclusive state.
    #[error("cannot finalize run from state {from}")]
    CannotFinalize {
        /// Current state.
        from: RunState,
    },
}
