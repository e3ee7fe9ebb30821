//! Event filtering API for selective reads.

use chrono::{DateTime, Utc};
use ice_core::{category_of, Category, Event};

/// Trait for filtering events during reads.
pub trait EventFilter {
    /// Returns true if the event matches the filter criteria.
    fn matches(&self, event: &Event) -> bool;
}

/// Filter by event type.
#[derive(Debug, Clone)]
pub struct EventTypeFilter {
    /// Event type to match (e.g., "RunCommitted").
    pub event_type: String,
}

impl EventFilter for EventTypeFilter {
    fn matches(&self, event: &Event) -> bool {
        event.event_type() == self.event_type
    }
}

/// Filter by taxonomy category.
#[derive(Debug, Clone, Copy)]
pub struct CategoryFilter {
    /// Category to match.
    pub category: Category,
}

impl EventFilter for CategoryFilter {
    fn matches(&self, event: &Event) -> bool {
        category_of(event.event_type()).is_ok_and(|c| c == self.category)
    }
}

/// Filter by exact origin.
#[derive(Debug, Clone)]
pub struct OriginFilter {
    /// Origin to match.
    pub origin: String,
}

impl EventFilter for OriginFilter {
    fn matches(&self, event: &Event) -> bool {
        event.origin() == self.origin
    }
}

/// Filter by time range.
#[derive(Debug, Clone)]
pub struct TimeRangeFilter {
    /// Include events at or after this instant.
    pub after: Option<DateTime<Utc>>,
    /// Include events at or before this instant.
    pub before: Option<DateTime<Utc>>,
}

impl EventFilter for TimeRangeFilter {
    fn matches(&self, event: &Event) -> bool {
        let ts = event.timestamp();
        if matches!(self.after, Some(after) if ts < after) {
            return false;
        }
        if matches!(self.before, Some(before) if ts > before) {
            return false;
        }
        true
    }
}

/// Composite filter: all filters must match (AND).
pub struct AndFilter {
    /// Filters to combine with AND logic.
    pub filters: Vec<Box<dyn EventFilter>>,
}

impl EventFilter for AndFilter {
    fn matches(&self, event: &Event) -> bool {
        self.filters.iter().all(|f| f.matches(event))
    }
}

/// Composite filter: any filter must match (OR).
pub struct OrFilter {
    /// Filters to combine with OR logic.
    pub filters: Vec<Box<dyn EventFilter>>,
}

impl EventFilter for OrFilter {
    fn matches(&self, event: &Event) -> bool {
        self.filters.iter().any(|f| f.matches(event))
    }
}
