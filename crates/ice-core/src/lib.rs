//! Event authority kernel for the ICE runtime.
//!
//! This crate provides:
//! - The closed, versioned event taxonomy and its five categories
//! - The origin authority policy (who may emit which kind of fact)
//! - The immutable [`Event`] value with a deterministic integrity fingerprint
//! - The stateless [`EventValidator`] and its individual stages
//! - The [`RunStateMachine`] lifecycle guard
//!
//! Core invariants:
//! - Only kinds listed in [`taxonomy`] exist; there is no registration API
//! - Integrity is `sha256(canonical_bytes(fields))`, computed once at construction
//! - Validation is pure; it never mutates an event or any store
//! - Nothing escapes `TERMINATED`
//!
#![deny(missing_docs)]

/// Origin authorization policy.
pub mod authority;
/// Error types for core operations.
pub mod errors;
/// The event value type.
pub mod event;
/// Run lifecycle state machine.
pub mod lifecycle;
/// The closed event vocabulary.
pub mod taxonomy;
/// Validation stages.
pub mod validator;

pub use authority::{
    allowed_origins_for, is_origin_authorized, OriginClass, AGENT_PREFIX, RUNTIME_ORIGIN,
    SYSTEM_ORIGIN,
};
pub use errors::{EventInvariantViolation, InvalidStateTransition, TaxonomyError, ValidationError};
pub use event::{Event, EventBuilder, EventId, EventRecord, RunId};
pub use lifecycle::{RunState, RunStateMachine};
pub use taxonomy::{
    category_of, is_valid, vocabulary, CapabilityEvent, Category, CognitiveEvent, DomainEvent,
    EventKind, MemoryEvent, RuntimeEvent, TAXONOMY_VERSION,
};
pub use validator::EventValidator;
