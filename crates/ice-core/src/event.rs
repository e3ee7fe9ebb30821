//! The event value type.
//!
//! An [`Event`] records a fact that has already happened. It is built once,
//! its integrity fingerprint is derived during construction, and it is never
//! mutated afterwards: there are no setters, and every field is private.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use ice_canonical::{compute_fingerprint, Canonicalizer, Fingerprint, FingerprintError};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::errors::EventInvariantViolation;

/// Years whose RFC 3339 form has exactly four digits and parses back.
const RECORDABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Opaque event identifier, unique within a run.
pub type EventId = String;
/// Run identifier.
pub type RunId = String;

/// Exactly the fields covered by the fingerprint, keyed as on the wire.
#[derive(Serialize)]
struct CanonicalFields<'a> {
    event_id: &'a str,
    run_id: &'a str,
    event_type: &'a str,
    timestamp: String,
    origin: &'a str,
    payload: &'a Map<String, Value>,
    causality: Option<&'a [EventId]>,
}

/// Immutable record of one fact.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    event_id: EventId,
    run_id: RunId,
    event_type: String,
    timestamp: DateTime<Utc>,
    origin: String,
    payload: Map<String, Value>,
    causality: Option<Vec<EventId>>,
    integrity: Fingerprint,
}

impl Event {
    /// Constructs an event, normalizing the timestamp to UTC and deriving
    /// its integrity fingerprint.
    ///
    /// # Errors
    ///
    /// Returns [`EventInvariantViolation`] if any identifier is empty or
    /// `causality` is present but empty, or if the UTC year of `timestamp`
    /// falls outside 0000-9999. No partially built event escapes.
    pub fn new<Tz: TimeZone>(
        event_id: impl Into<EventId>,
        run_id: impl Into<RunId>,
        event_type: impl Into<String>,
        timestamp: DateTime<Tz>,
        origin: impl Into<String>,
        payload: Map<String, Value>,
        causality: Option<Vec<EventId>>,
    ) -> Result<Self, EventInvariantViolation> {
        let event_id = event_id.into();
        let run_id = run_id.into();
        let event_type = event_type.into();
        let origin = origin.into();

        for (field, value) in [
            ("event_id", &event_id),
            ("run_id", &run_id),
            ("event_type", &event_type),
            ("origin", &origin),
        ] {
            if value.is_empty() {
                return Err(EventInvariantViolation::EmptyField(field));
            }
        }

        if matches!(&causality, Some(parents) if parents.is_empty()) {
            return Err(EventInvariantViolation::EmptyCausality);
        }

        let timestamp = timestamp.with_timezone(&Utc);
        if !RECORDABLE_YEARS.contains(&timestamp.year()) {
            return Err(EventInvariantViolation::InvalidTimestamp(format!(
                "{}: year outside 0000-9999",
                timestamp.to_rfc3339()
            )));
        }

        let integrity = fingerprint_of(
            &event_id,
            &run_id,
            &event_type,
            &timestamp,
            &origin,
            &payload,
            causality.as_deref(),
        )?;

        Ok(Self {
            event_id,
            run_id,
            event_type,
            timestamp,
            origin,
            payload,
            causality,
            integrity,
        })
    }

    /// Starts a builder for the required identity fields.
    pub fn builder(
        event_id: impl Into<EventId>,
        run_id: impl Into<RunId>,
        event_type: impl Into<String>,
        origin: impl Into<String>,
    ) -> EventBuilder {
        EventBuilder {
            event_id: event_id.into(),
            run_id: run_id.into(),
            event_type: event_type.into(),
            origin: origin.into(),
            timestamp: None,
            payload: Value::Object(Map::new()),
            causality: None,
        }
    }

    /// Rebuilds an event from a transported record.
    ///
    /// Every construction invariant is enforced again. When the record
    /// carries an `integrity` value, it must equal the fingerprint of the
    /// record's fields.
    pub fn from_record(record: EventRecord) -> Result<Self, EventInvariantViolation> {
        let timestamp = DateTime::parse_from_rfc3339(&record.timestamp)
            .map_err(|e| EventInvariantViolation::InvalidTimestamp(format!("{}: {}", record.timestamp, e)))?;
        let Value::Object(payload) = record.payload else {
            return Err(EventInvariantViolation::PayloadNotMapping);
        };

        let event = Self::new(
            record.event_id,
            record.run_id,
            record.event_type,
            timestamp,
            record.origin,
            payload,
            record.causality,
        )?;

        if let Some(claimed) = record.integrity {
            if claimed != event.integrity.as_str() {
                return Err(EventInvariantViolation::IntegrityMismatch {
                    claimed,
                    computed: event.integrity.to_string(),
                });
            }
        }

        Ok(event)
    }

    /// Event identifier.
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    /// Owning run.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Event type name.
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// UTC timestamp.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Emitting authority.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Fact-specific data.
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Declared causal parents, if any.
    pub fn causality(&self) -> Option<&[EventId]> {
        self.causality.as_deref()
    }

    /// Integrity fingerprint derived at construction.
    pub fn integrity(&self) -> &Fingerprint {
        &self.integrity
    }

    /// Recomputes the fingerprint and compares it with the stored one.
    pub fn verify_integrity(&self) -> Result<bool, FingerprintError> {
        let computed = fingerprint_of(
            &self.event_id,
            &self.run_id,
            &self.event_type,
            &self.timestamp,
            &self.origin,
            &self.payload,
            self.causality.as_deref(),
        )?;
        Ok(computed == self.integrity)
    }

    /// Transport/audit form, in canonical field order.
    pub fn to_record(&self) -> EventRecord {
        EventRecord {
            event_id: self.event_id.clone(),
            run_id: self.run_id.clone(),
            event_type: self.event_type.clone(),
            timestamp: self.timestamp.to_rfc3339(),
            origin: self.origin.clone(),
            payload: Value::Object(self.payload.clone()),
            causality: self.causality.clone(),
            integrity: Some(self.integrity.to_string()),
        }
    }

    /// Transport/audit form as a JSON value.
    pub fn to_json(&self) -> Value {
        let causality = match &self.causality {
            Some(parents) => Value::Array(parents.iter().cloned().map(Value::String).collect()),
            None => Value::Null,
        };

        let mut map = Map::new();
        map.insert("event_id".into(), Value::String(self.event_id.clone()));
        map.insert("run_id".into(), Value::String(self.run_id.clone()));
        map.insert("event_type".into(), Value::String(self.event_type.clone()));
        map.insert("timestamp".into(), Value::String(self.timestamp.to_rfc3339()));
        map.insert("origin".into(), Value::String(self.origin.clone()));
        map.insert("payload".into(), Value::Object(self.payload.clone()));
        map.insert("causality".into(), causality);
        map.insert("integrity".into(), Value::String(self.integrity.to_string()));
        Value::Object(map)
    }
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

fn fingerprint_of(
    event_id: &str,
    run_id: &str,
    event_type: &str,
    timestamp: &DateTime<Utc>,
    origin: &str,
    payload: &Map<String, Value>,
    causality: Option<&[EventId]>,
) -> Result<Fingerprint, FingerprintError> {
    let fields = CanonicalFields {
        event_id,
        run_id,
        event_type,
        timestamp: timestamp.to_rfc3339(),
        origin,
        payload,
        causality,
    };
    compute_fingerprint(&fields, &Canonicalizer::new())
}

/// Serializable form of an event, as exported to and read back from audit logs.
///
/// Records are untrusted input: turn one back into an [`Event`] with
/// [`Event::from_record`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event identifier.
    pub event_id: String,
    /// Owning run.
    pub run_id: String,
    /// Event type name.
    pub event_type: String,
    /// RFC 3339 timestamp.
    pub timestamp: String,
    /// Emitting authority.
    pub origin: String,
    /// Fact-specific data; must be an object.
    pub payload: Value,
    /// Causal parents.
    #[serde(default)]
    pub causality: Option<Vec<EventId>>,
    /// Claimed fingerprint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrity: Option<String>,
}

/// Step-by-step construction of an [`Event`].
#[derive(Debug, Clone)]
pub struct EventBuilder {
    event_id: EventId,
    run_id: RunId,
    event_type: String,
    origin: String,
    timestamp: Option<DateTime<Utc>>,
    payload: Value,
    causality: Option<Vec<EventId>>,
}

impl EventBuilder {
    /// Sets the timestamp (defaults to now).
    pub fn timestamp<Tz: TimeZone>(mut self, timestamp: DateTime<Tz>) -> Self {
        self.timestamp = Some(timestamp.with_timezone(&Utc));
        self
    }

    /// Sets the payload; it must be a JSON object.
    pub fn payload(mut self, payload: impl Into<Value>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Declares causal parents.
    pub fn caused_by<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<EventId>,
    {
        self.causality = Some(parents.into_iter().map(Into::into).collect());
        self
    }

    /// Validates and builds the event.
    pub fn build(self) -> Result<Event, EventInvariantViolation> {
        let Value::Object(payload) = self.payload else {
            return Err(EventInvariantViolation::PayloadNotMapping);
        };
        Event::new(
            self.event_id,
            self.run_id,
            self.event_type,
            self.timestamp.unwrap_or_else(Utc::now),
            self.origin,
            payload,
            self.causality,
        )
    }
}
