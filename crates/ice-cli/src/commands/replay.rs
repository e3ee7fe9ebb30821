//! Replay command implementation.

use crate::input;
use crate::output;
use ice_core::{Event, EventRecord};
use ice_store::{EmitterOptions, EventEmitter, EventStore, EventTypeFilter, TemporalScope};
use std::sync::Arc;

pub struct ReplayArgs {
    pub file: String,
    pub per_run: bool,
    pub json: bool,
    pub event_type: Option<String>,
    pub strict: bool,
    pub max_events: Option<usize>,
}

pub fn run(args: ReplayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let lines = input::read_lines(&args.file, args.max_events)?;

    let options = EmitterOptions {
        temporal_scope: if args.per_run {
            TemporalScope::PerRun
        } else {
            TemporalScope::Global
        },
    };
    let store = Arc::new(EventStore::new());
    let emitter = EventEmitter::with_options(Arc::clone(&store), options);

    let mut rows = Vec::new();
    let mut rejected = 0usize;
    for line in lines {
        let (event_id, run_id) = match &line.record {
            Ok(record) => (record.event_id.clone(), record.run_id.clone()),
            Err(_) => ("?".to_string(), "?".to_string()),
        };

        match replay_record(&emitter, line.record) {
            Ok(event) => rows.push((
                line.number,
                event.event_id().to_string(),
                event.run_id().to_string(),
                "ACCEPTED",
                event.event_type().to_string(),
            )),
            Err(reason) => {
                rejected += 1;
                if args.json {
                    eprintln!("line {}: rejected: {}", line.number, reason);
                }
                rows.push((line.number, event_id, run_id, "REJECTED", reason));
            }
        }
    }

    tracing::info!(
        file = %args.file,
        accepted = store.len(),
        rejected,
        "replay finished"
    );

    if args.json {
        let accepted = match &args.event_type {
            Some(event_type) => store.select(&EventTypeFilter {
                event_type: event_type.clone(),
            }),
            None => store.all(),
        };
        for event in accepted {
            println!("{}", serde_json::to_string(event.as_ref())?);
        }
    } else {
        output::print_table_header(&[
            ("LINE", 6),
            ("EVENT_ID", 24),
            ("RUN_ID", 16),
            ("VERDICT", 9),
            ("DETAIL", 8),
        ]);
        for (number, event_id, run_id, verdict, detail) in &rows {
            println!(
                "{:<6} {:<24} {:<16} {:<9} {}",
                number,
                output::truncate(event_id, 24),
                output::truncate(run_id, 16),
                verdict,
                detail
            );
        }
        println!();
        println!("accepted {}, rejected {}", store.len(), rejected);
    }

    if args.strict && rejected > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn replay_record(
    emitter: &EventEmitter,
    record: Result<EventRecord, serde_json::Error>,
) -> Result<Arc<Event>, String> {
    let record = record.map_err(|e| format!("invalid record: {}", e))?;
    let event = Event::from_record(record).map_err(|e| e.to_string())?;
    emitter.emit(event).map_err(|e| e.cause().to_string())
}
