//! Who may emit what.
//!
//! | Category   | Authorized origins                                   |
//! |------------|------------------------------------------------------|
//! | Runtime    | `runtime`                                            |
//! | Domain     | `runtime`                                            |
//! | Memory     | `runtime`                                            |
//! | Cognitive  | `agent:*`                                            |
//! | Capability | `runtime`, except `CapabilityRequested` (`agent:*`)  |
//!
//! Agents never assert runtime, domain or memory facts, and never grant,
//! use or revoke capabilities; they may only request one.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::TaxonomyError;
use crate::taxonomy::{category_of, CapabilityEvent, Category};

/// The runtime itself.
pub const RUNTIME_ORIGIN: &str = "runtime";
/// Host-level system origin. Recognised, but no category authorizes it.
pub const SYSTEM_ORIGIN: &str = "system";
/// Prefix of every agent origin (`agent:<id>`).
pub const AGENT_PREFIX: &str = "agent:";

/// Class of origins permitted for an event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginClass {
    /// Exactly `runtime`.
    Runtime,
    /// Any `agent:`-prefixed origin.
    Agent,
}

impl OriginClass {
    /// Returns true if `origin` falls in this class.
    pub fn admits(self, origin: &str) -> bool {
        match self {
            OriginClass::Runtime => origin == RUNTIME_ORIGIN,
            OriginClass::Agent => origin.starts_with(AGENT_PREFIX),
        }
    }

    /// Display form used in diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            OriginClass::Runtime => RUNTIME_ORIGIN,
            OriginClass::Agent => AGENT_PREFIX,
        }
    }
}

impl fmt::Display for OriginClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const RUNTIME_ONLY: &[OriginClass] = &[OriginClass::Runtime];
const AGENT_ONLY: &[OriginClass] = &[OriginClass::Agent];

fn classes_for(category: Category, event_type: &str) -> &'static [OriginClass] {
    match category {
        Category::Runtime | Category::Domain | Category::Memory => RUNTIME_ONLY,
        Category::Cognitive => AGENT_ONLY,
        Category::Capability
            if event_type == CapabilityEvent::CapabilityRequested.as_str() =>
        {
            AGENT_ONLY
        }
        Category::Capability => RUNTIME_ONLY,
    }
}

/// Returns true if `origin` may emit `event_type`.
///
/// Types outside the taxonomy are never authorized.
pub fn is_origin_authorized(origin: &str, event_type: &str) -> bool {
    match category_of(event_type) {
        Ok(category) => classes_for(category, event_type)
            .iter()
            .any(|class| class.admits(origin)),
        Err(_) => false,
    }
}

/// Returns the origin classes permitted for `event_type`.
pub fn allowed_origins_for(event_type: &str) -> Result<&'static [OriginClass], TaxonomyError> {
    let category = category_of(event_type)?;
    Ok(classes_for(category, event_type))
}
