//! Error types for emission.

use ice_core::{Event, ValidationError};
use thiserror::Error;

/// An event was refused by the emitter and was not recorded.
///
/// Wraps whichever validator stage rejected the event. A rejection is a
/// permanent fact about that attempt; retrying the same event cannot succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("event '{event_id}' in run '{run_id}' rejected: {cause}")]
pub struct EventEmissionError {
    event_id: String,
    run_id: String,
    #[source]
    cause: ValidationError,
}

impl EventEmissionError {
    pub(crate) fn new(event: &Event, cause: ValidationError) -> Self {
        Self {
            event_id: event.event_id().to_string(),
            run_id: event.run_id().to_string(),
            cause,
        }
    }

    /// Id of the rejected event.
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    /// Run of the rejected event.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Validator stage that rejected the event.
    pub fn cause(&self) -> &ValidationError {
        &self.cause
    }
}
