//! Append-only event storage and the single emission gateway for ICE runs.
//!
//! This crate provides:
//! - [`EventStore`], the in-memory ledger of accepted events (read-only API)
//! - [`EventEmitter`], the only component able to append to it
//! - [`EmitterOptions`] to pick the scope of the temporal check
//! - Event filtering API for selective reads
//!
//! The append operation is crate-private: outside this crate, the only way
//! an event enters a store is through [`EventEmitter::emit`].

#![deny(missing_docs)]

/// Single write gateway.
pub mod emitter;
/// Error types for emission.
pub mod error;
/// Event filtering API.
pub mod filter;
/// Append-only ledger.
pub mod store;

pub use emitter::{EmitterOptions, EventEmitter, TemporalScope};
pub use error::EventEmissionError;
pub use filter::{
    AndFilter, CategoryFilter, EventFilter, EventTypeFilter, OrFilter, OriginFilter,
    TimeRangeFilter,
};
pub use store::EventStore;
