//! The closed event taxonomy.
//!
//! An event type that is not listed here does not exist: it cannot be
//! validated, emitted, or stored. There is no registration hook; adding a
//! kind means editing this file and bumping [`TAXONOMY_VERSION`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::TaxonomyError;

/// Version of the event vocabulary.
pub const TAXONOMY_VERSION: u32 = 1;

/// Canonical category of an event kind.
///
/// A category carries no semantics of its own; it keys the authority policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Run lifecycle and runtime authority facts.
    Runtime,
    /// Reasoning surface of agents.
    Cognitive,
    /// External effects (IO, tasks, notifications).
    Domain,
    /// Memory lifecycle.
    Memory,
    /// Capability permission lifecycle.
    Capability,
}

impl Category {
    /// Every category, in vocabulary order.
    pub const ALL: [Category; 5] = [
        Category::Runtime,
        Category::Cognitive,
        Category::Domain,
        Category::Memory,
        Category::Capability,
    ];

    /// Lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Runtime => "runtime",
            Category::Cognitive => "cognitive",
            Category::Domain => "domain",
            Category::Memory => "memory",
            Category::Capability => "capability",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! event_kinds {
    ($name:ident, $category:ident, $doc:expr, [$($variant:ident),+ $(,)?]) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[doc = concat!("`", stringify!($variant), "`")]
                $variant,
            )+
        }

        impl $name {
            /// Every kind of this category.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Category shared by every kind of this enum.
            pub const CATEGORY: Category = Category::$category;

            /// Wire name of the kind.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant),)+
                }
            }

            /// Exact-match lookup; no normalization, no fallback.
            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $(stringify!($variant) => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl From<$name> for EventKind {
            fn from(kind: $name) -> Self {
                EventKind::$category(kind)
            }
        }
    };
}

event_kinds!(
    RuntimeEvent,
    Runtime,
    "Run lifecycle and authority facts.",
    [
        RunProvisioned,
        ResourcesAllocated,
        ContextResolved,
        MemoryMounted,
        CapabilitiesBound,
        ValidationStarted,
        ValidationPassed,
        ValidationFailed,
        RunCommitted,
        RunAborted,
        AbortReasonDeclared,
        ResourcesReleased,
        RunTerminated,
    ]
);

event_kinds!(
    CognitiveEvent,
    Cognitive,
    "Reasoning facts asserted by agents.",
    [
        InferenceStep,
        DecisionProposed,
        HypothesisGenerated,
        UncertaintyDeclared,
        PlanStepProposed,
    ]
);

event_kinds!(
    DomainEvent,
    Domain,
    "External and business facts.",
    [
        FileRead,
        FileWritten,
        TaskStarted,
        TaskCompleted,
        APIRequestExecuted,
        UserNotificationSent,
        WorkflowAdvanced,
    ]
);

event_kinds!(
    MemoryEvent,
    Memory,
    "Memory lifecycle facts.",
    [
        MemoryPromoted,
        MemoryExpired,
        MemoryDeprecated,
        MemorySuperseded,
        MemoryInvalidated,
    ]
);

event_kinds!(
    CapabilityEvent,
    Capability,
    "Capability permission facts.",
    [
        CapabilityRequested,
        CapabilityGranted,
        CapabilityUsed,
        CapabilityRevoked,
        CapabilityExpired,
    ]
);

/// A legal event kind, tagged with its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Runtime category.
    Runtime(RuntimeEvent),
    /// Cognitive category.
    Cognitive(CognitiveEvent),
    /// Domain category.
    Domain(DomainEvent),
    /// Memory category.
    Memory(MemoryEvent),
    /// Capability category.
    Capability(CapabilityEvent),
}

impl EventKind {
    /// Resolves a wire name against the whole vocabulary.
    pub fn parse(value: &str) -> Option<Self> {
        RuntimeEvent::parse(value)
            .map(EventKind::from)
            .or_else(|| CognitiveEvent::parse(value).map(EventKind::from))
            .or_else(|| DomainEvent::parse(value).map(EventKind::from))
            .or_else(|| MemoryEvent::parse(value).map(EventKind::from))
            .or_else(|| CapabilityEvent::parse(value).map(EventKind::from))
    }

    /// Category of this kind.
    pub const fn category(self) -> Category {
        match self {
            EventKind::Runtime(_) => Category::Runtime,
            EventKind::Cognitive(_) => Category::Cognitive,
            EventKind::Domain(_) => Category::Domain,
            EventKind::Memory(_) => Category::Memory,
            EventKind::Capability(_) => Category::Capability,
        }
    }

    /// Wire name of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::Runtime(k) => k.as_str(),
            EventKind::Cognitive(k) => k.as_str(),
            EventKind::Domain(k) => k.as_str(),
            EventKind::Memory(k) => k.as_str(),
            EventKind::Capability(k) => k.as_str(),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Iterates the whole vocabulary, category by category.
pub fn vocabulary() -> impl Iterator<Item = EventKind> {
    RuntimeEvent::ALL
        .iter()
        .copied()
        .map(EventKind::from)
        .chain(CognitiveEvent::ALL.iter().copied().map(EventKind::from))
        .chain(DomainEvent::ALL.iter().copied().map(EventKind::from))
        .chain(MemoryEvent::ALL.iter().copied().map(EventKind::from))
        .chain(CapabilityEvent::ALL.iter().copied().map(EventKind::from))
}

/// Returns true if `event_type` belongs to the vocabulary.
pub fn is_valid(event_type: &str) -> bool {
    EventKind::parse(event_type).is_some()
}

/// Returns the category of `event_type`.
///
/// Unknown types are an error, never a default category.
pub fn category_of(event_type: &str) -> Result<Category, TaxonomyError> {
    EventKind::parse(event_type)
        .map(EventKind::category)
        .ok_or_else(|| TaxonomyError::UnknownEventType(event_type.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_kind_belongs_to_exactly_one_category() {
        let mut seen = HashSet::new();
        for kind in vocabulary() {
            assert!(seen.insert(kind.as_str()), "{} listed twice", kind);
            let hits = Category::ALL
                .iter()
                .filter(|c| category_of(kind.as_str()) == Ok(**c))
                .count();
            assert_eq!(hits, 1);
        }
        assert_eq!(seen.len(), 35);
    }

    #[test]
    fn lookup_is_exact() {
        assert!(is_valid("RunCommitted"));
        assert!(!is_valid("runcommitted"));
        assert!(!is_valid(" RunCommitted"));
        assert!(!is_valid(""));
    }

    #[test]
    fn unknown_type_has_no_category() {
        assert_eq!(
            category_of("NotARealEvent"),
            Err(TaxonomyError::UnknownEventType("NotARealEvent".into()))
        );
    }

    #[test]
    fn category_constants_match_wrapped_kind() {
        assert_eq!(
            EventKind::from(CapabilityEvent::CapabilityRequested).category(),
            CapabilityEvent::CATEGORY
        );
        assert_eq!(
            category_of("APIRequestExecuted"),
            Ok(Category::Domain)
        );
    }
}
