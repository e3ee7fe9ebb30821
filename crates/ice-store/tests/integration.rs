use chrono::{DateTime, Duration, TimeZone, Utc};
use ice_core::{Category, Event, ValidationError};
use ice_store::{
    AndFilter, CategoryFilter, EmitterOptions, EventEmitter, EventStore, EventTypeFilter,
    OriginFilter, TemporalScope, TimeRangeFilter,
};
use serde_json::json;
use std::sync::Arc;
use std::thread;

fn make_timestamp(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(secs)
}

fn make_event(id: &str, run: &str, kind: &str, origin: &str, secs: i64) -> Event {
    Event::builder(id, run, kind, origin)
        .timestamp(make_timestamp(secs))
        .payload(json!({ "seq": secs }))
        .build()
        .unwrap()
}

fn make_emitter() -> (Arc<EventStore>, EventEmitter) {
    let store = Arc::new(EventStore::new());
    let emitter = EventEmitter::new(Arc::clone(&store));
    (store, emitter)
}

#[test]
fn test_unknown_event_type_never_appends() {
    let (store, emitter) = make_emitter();
    let err = emitter
        .emit(make_event("e1", "run-1", "NotARealEvent", "runtime", 0))
        .unwrap_err();
    assert!(matches!(err.cause(), ValidationError::Taxonomy { .. }));
    assert_eq!(err.event_id(), "e1");
    assert_eq!(err.run_id(), "run-1");
    assert!(store.is_empty());
}

#[test]
fn test_agent_cannot_assert_runtime_fact() {
    let (store, emitter) = make_emitter();
    let err = emitter
        .emit(make_event("e1", "run-1", "RunCommitted", "agent:42", 0))
        .unwrap_err();
    assert!(matches!(err.cause(), ValidationError::Authority { .. }));
    assert_eq!(store.len(), 0);
}

#[test]
fn test_only_agents_request_capabilities() {
    let (store, emitter) = make_emitter();
    emitter
        .emit(make_event("e1", "run-1", "CapabilityRequested", "agent:42", 0))
        .unwrap();

    let err = emitter
        .emit(make_event("e2", "run-1", "CapabilityRequested", "runtime", 1))
        .unwrap_err();
    assert!(matches!(err.cause(), ValidationError::Authority { .. }));

    emitter
        .emit(make_event("e3", "run-1", "CapabilityGranted", "runtime", 2))
        .unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn test_unknown_parent_is_rejected() {
    let (store, emitter) = make_emitter();
    let orphan = Event::builder("e2", "run-1", "InferenceStep", "agent:1")
        .timestamp(make_timestamp(0))
        .caused_by(["e-missing"])
        .build()
        .unwrap();
    let err = emitter.emit(orphan).unwrap_err();
    assert_eq!(
        err.cause(),
        &ValidationError::Causality {
            parent: "e-missing".into()
        }
    );
    assert!(store.is_empty());
}

#[test]
fn test_known_parent_is_accepted() {
    let (store, emitter) = make_emitter();
    emitter
        .emit(make_event("e1", "run-1", "RunProvisioned", "runtime", 0))
        .unwrap();
    let child = Event::builder("e2", "run-1", "InferenceStep", "agent:1")
        .timestamp(make_timestamp(1))
        .caused_by(["e1"])
        .build()
        .unwrap();
    let accepted = emitter.emit(child).unwrap();
    assert_eq!(accepted.causality(), Some(&["e1".to_string()][..]));
    assert_eq!(store.len(), 2);
}

#[test]
fn test_parent_from_other_run_is_unknown() {
    let (_store, emitter) = make_emitter();
    emitter
        .emit(make_event("e1", "run-A", "RunProvisioned", "runtime", 0))
        .unwrap();
    let child = Event::builder("e2", "run-B", "InferenceStep", "agent:1")
        .timestamp(make_timestamp(1))
        .caused_by(["e1"])
        .build()
        .unwrap();
    let err = emitter.emit(child).unwrap_err();
    assert!(matches!(err.cause(), ValidationError::Causality { .. }));
}

#[test]
fn test_no_time_travel() {
    let (store, emitter) = make_emitter();
    emitter
        .emit(make_event("e1", "run-1", "TaskStarted", "runtime", 10))
        .unwrap();

    let err = emitter
        .emit(make_event("e2", "run-1", "TaskStarted", "runtime", 9))
        .unwrap_err();
    assert!(matches!(err.cause(), ValidationError::Temporal { .. }));

    emitter
        .emit(make_event("e3", "run-1", "TaskStarted", "runtime", 10))
        .unwrap();
    emitter
        .emit(make_event("e4", "run-1", "TaskStarted", "runtime", 11))
        .unwrap();
    assert_eq!(store.len(), 3);
}

#[test]
fn test_global_scope_spans_runs() {
    let (_store, emitter) = make_emitter();
    assert_eq!(emitter.options().temporal_scope, TemporalScope::Global);
    emitter
        .emit(make_event("a1", "run-A", "TaskStarted", "runtime", 10))
        .unwrap();
    let err = emitter
        .emit(make_event("b1", "run-B", "TaskStarted", "runtime", 5))
        .unwrap_err();
    assert!(matches!(err.cause(), ValidationError::Temporal { .. }));
}

#[test]
fn test_per_run_scope_isolates_clocks() {
    let store = Arc::new(EventStore::new());
    let emitter = EventEmitter::with_options(
        Arc::clone(&store),
        EmitterOptions {
            temporal_scope: TemporalScope::PerRun,
        },
    );
    emitter
        .emit(make_event("a1", "run-A", "TaskStarted", "runtime", 10))
        .unwrap();
    emitter
        .emit(make_event("b1", "run-B", "TaskStarted", "runtime", 5))
        .unwrap();
    let err = emitter
        .emit(make_event("a2", "run-A", "TaskCompleted", "runtime", 6))
        .unwrap_err();
    assert!(matches!(err.cause(), ValidationError::Temporal { .. }));
    assert_eq!(store.len(), 2);
}

#[test]
fn test_duplicate_event_id_in_run_is_rejected() {
    let (store, emitter) = make_emitter();
    emitter
        .emit(make_event("e1", "run-1", "TaskStarted", "runtime", 0))
        .unwrap();
    let err = emitter
        .emit(make_event("e1", "run-1", "TaskCompleted", "runtime", 1))
        .unwrap_err();
    assert!(matches!(err.cause(), ValidationError::DuplicateEventId { .. }));

    // Same id in another run is a different fact.
    emitter
        .emit(make_event("e1", "run-2", "TaskStarted", "runtime", 2))
        .unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn test_append_only_order_and_by_run() {
    let (store, emitter) = make_emitter();
    let runs = ["A", "B", "A", "C", "B", "A"];
    for (i, run) in runs.iter().enumerate() {
        emitter
            .emit(make_event(&format!("e{}", i), run, "TaskStarted", "runtime", i as i64))
            .unwrap();
    }

    let all = store.all();
    assert_eq!(all.len(), runs.len());
    for (i, event) in all.iter().enumerate() {
        assert_eq!(event.event_id(), format!("e{}", i));
        assert_eq!(event.run_id(), runs[i]);
    }

    let a: Vec<_> = store.by_run("A").iter().map(|e| e.event_id().to_string()).collect();
    assert_eq!(a, ["e0", "e2", "e5"]);
    assert!(store.by_run("Z").is_empty());
    assert_eq!(store.last().unwrap().event_id(), "e5");
}

#[test]
fn test_emit_returns_stored_event() {
    let (store, emitter) = make_emitter();
    let accepted = emitter
        .emit(make_event("e1", "run-1", "RunProvisioned", "runtime", 0))
        .unwrap();
    assert!(Arc::ptr_eq(&accepted, &store.last().unwrap()));
    assert!(accepted.verify_integrity().unwrap());
}

#[test]
fn test_emitter_exposes_same_store() {
    let (store, emitter) = make_emitter();
    emitter
        .emit(make_event("e1", "run-1", "RunProvisioned", "runtime", 0))
        .unwrap();
    assert_eq!(emitter.store().len(), store.len());
}

#[test]
fn test_concurrent_emitters_keep_time_monotonic() {
    let store = Arc::new(EventStore::new());
    let mut handles = Vec::new();

    for worker in 0..8 {
        let emitter = EventEmitter::new(Arc::clone(&store));
        handles.push(thread::spawn(move || {
            let mut accepted = 0;
            for i in 0..50 {
                // Interleaved clocks: many of these will be late and refused.
                let secs = (i * 8 + (7 - worker)) as i64;
                let event = make_event(
                    &format!("w{}-{}", worker, i),
                    &format!("run-{}", worker % 3),
                    "TaskStarted",
                    "runtime",
                    secs,
                );
                if emitter.emit(event).is_ok() {
                    accepted += 1;
                }
            }
            accepted
        }));
    }

    let accepted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    let all = store.all();
    assert_eq!(all.len(), accepted);
    assert!(all.windows(2).all(|w| w[0].timestamp() <= w[1].timestamp()));
}

#[test]
fn test_concurrent_causal_chain_stays_consistent() {
    let store = Arc::new(EventStore::new());
    let root = EventEmitter::new(Arc::clone(&store));
    root.emit(make_event("root", "run-1", "RunProvisioned", "runtime", 0))
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let emitter = EventEmitter::new(Arc::clone(&store));
            thread::spawn(move || {
                for i in 0..25 {
                    let event = Event::builder(
                        format!("w{}-{}", worker, i),
                        "run-1",
                        "InferenceStep",
                        format!("agent:{}", worker),
                    )
                    .timestamp(make_timestamp(1))
                    .caused_by(["root"])
                    .build()
                    .unwrap();
                    emitter.emit(event).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(store.by_run("run-1").len(), 101);
    assert_eq!(store.known_ids("run-1").len(), 101);
}

#[test]
fn test_filters_select_subsets() {
    let (store, emitter) = make_emitter();
    emitter
        .emit(make_event("e1", "run-1", "RunProvisioned", "runtime", 0))
        .unwrap();
    emitter
        .emit(make_event("e2", "run-1", "InferenceStep", "agent:1", 1))
        .unwrap();
    emitter
        .emit(make_event("e3", "run-1", "InferenceStep", "agent:2", 2))
        .unwrap();
    emitter
        .emit(make_event("e4", "run-1", "FileWritten", "runtime", 3))
        .unwrap();

    let cognitive = store.select(&CategoryFilter {
        category: Category::Cognitive,
    });
    assert_eq!(cognitive.len(), 2);

    let by_type = store.select(&EventTypeFilter {
        event_type: "FileWritten".into(),
    });
    assert_eq!(by_type[0].event_id(), "e4");

    let window = store.select(&TimeRangeFilter {
        after: Some(make_timestamp(1)),
        before: Some(make_timestamp(2)),
    });
    assert_eq!(window.len(), 2);

    let combined = store.select(&AndFilter {
        filters: vec![
            Box::new(CategoryFilter {
                category: Category::Cognitive,
            }),
            Box::new(OriginFilter {
                origin: "agent:2".into(),
            }),
        ],
    });
    assert_eq!(combined.len(), 1);
    assert_eq!(combined[0].event_id(), "e3");
}
