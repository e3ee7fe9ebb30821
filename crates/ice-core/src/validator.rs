//! Stateless event validation.
//!
//! Each stage is a pure function over the event and the minimal context it
//! needs. [`EventValidator::validate`] runs them in a fixed order and stops
//! at the first rejection:
//!
//! 1. structure
//! 2. taxonomy
//! 3. authority
//! 4. temporal (no time travel)
//! 5. causality (parents must already be known in the run)
//! 6. identity (event id not yet used in the run)

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::authority::is_origin_authorized;
use crate::errors::ValidationError;
use crate::event::{Event, EventId};
use crate::taxonomy::is_valid;

/// Re-checks the structural invariants of an event.
///
/// The event type already enforces these; the validator does not rely on it.
pub fn check_structure(event: &Event) -> Result<(), ValidationError> {
    for (field, value) in [
        ("event_id", event.event_id()),
        ("run_id", event.run_id()),
        ("event_type", event.event_type()),
        ("origin", event.origin()),
    ] {
        if value.is_empty() {
            return Err(ValidationError::Structural(format!("{} must not be empty", field)));
        }
    }

    if matches!(event.causality(), Some(parents) if parents.is_empty()) {
        return Err(ValidationError::Structural(
            "causality must not be empty when present".to_string(),
        ));
    }

    match event.verify_integrity() {
        Ok(true) => Ok(()),
        Ok(false) => Err(ValidationError::Structural(
            "integrity does not match event fields".to_string(),
        )),
        Err(e) => Err(ValidationError::Structural(format!(
            "integrity could not be recomputed: {}",
            e
        ))),
    }
}

/// The event type must exist in the closed taxonomy.
pub fn check_taxonomy(event: &Event) -> Result<(), ValidationError> {
    if !is_valid(event.event_type()) {
        return Err(ValidationError::Taxonomy {
            event_type: event.event_type().to_string(),
        });
    }
    Ok(())
}

/// The origin must be authorized for the event type.
pub fn check_authority(event: &Event) -> Result<(), ValidationError> {
    if !is_origin_authorized(event.origin(), event.event_type()) {
        return Err(ValidationError::Authority {
            origin: event.origin().to_string(),
            event_type: event.event_type().to_string(),
        });
    }
    Ok(())
}

/// The event may not precede the last accepted timestamp. Equal is fine.
pub fn check_temporal(
    event: &Event,
    last_timestamp: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    match last_timestamp {
        Some(last) if event.timestamp() < last => Err(ValidationError::Temporal {
            timestamp: event.timestamp().to_rfc3339(),
            last: last.to_rfc3339(),
        }),
        _ => Ok(()),
    }
}

/// Every declared parent must already be accepted in the event's run.
pub fn check_causality(
    event: &Event,
    known_event_ids: &HashSet<EventId>,
) -> Result<(), ValidationError> {
    let Some(parents) = event.causality() else {
        return Ok(());
    };

    match parents.iter().find(|p| !known_event_ids.contains(p.as_str())) {
        Some(parent) => Err(ValidationError::Causality {
            parent: parent.clone(),
        }),
        None => Ok(()),
    }
}

/// The event id must not already be accepted in the event's run.
pub fn check_identity(
    event: &Event,
    known_event_ids: &HashSet<EventId>,
) -> Result<(), ValidationError> {
    if known_event_ids.contains(event.event_id()) {
        return Err(ValidationError::DuplicateEventId {
            event_id: event.event_id().to_string(),
            run_id: event.run_id().to_string(),
        });
    }
    Ok(())
}

/// Composes every stage into one pass/fail decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventValidator;

impl EventValidator {
    /// Validates `event` against the ids already accepted for its run and
    /// the last accepted timestamp (`None` only before the first event).
    ///
    /// Has no side effects; the first failing stage is returned.
    pub fn validate(
        event: &Event,
        known_event_ids: &HashSet<EventId>,
        last_timestamp: Option<DateTime<Utc>>,
    ) -> Result<(), ValidationError> {
        check_structure(event)?;
        check_taxonomy(event)?;
        check_authority(event)?;
        check_temporal(event, last_timestamp)?;
        check_causality(event, known_event_ids)?;
        check_identity(event, known_event_ids)?;
        Ok(())
    }
}
