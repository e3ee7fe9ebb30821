//! Verify command implementation.

use crate::input;
use crate::output;
use ice_core::{Event, EventInvariantViolation};
use serde_json::json;

/// Outcome of checking one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Ok,
    Mismatch,
    Missing,
    Invalid,
}

impl Verdict {
    fn as_str(self) -> &'static str {
        match self {
            Verdict::Ok => "OK",
            Verdict::Mismatch => "MISMATCH",
            Verdict::Missing => "MISSING",
            Verdict::Invalid => "INVALID",
        }
    }
}

pub fn run(file: String, strict: bool, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let lines = input::read_lines(&file, None)?;

    let mut results = Vec::new();
    for line in lines {
        let (event_id, verdict, detail) = match line.record {
            Err(e) => ("?".to_string(), Verdict::Invalid, e.to_string()),
            Ok(record) => {
                let event_id = record.event_id.clone();
                let claimed = record.integrity.is_some();
                match Event::from_record(record) {
                    Ok(_) if !claimed => (event_id, Verdict::Missing, String::new()),
                    Ok(_) => (event_id, Verdict::Ok, String::new()),
                    Err(e @ EventInvariantViolation::IntegrityMismatch { .. }) => {
                        (event_id, Verdict::Mismatch, e.to_string())
                    }
                    Err(e) => (event_id, Verdict::Invalid, e.to_string()),
                }
            }
        };
        results.push((line.number, event_id, verdict, detail));
    }

    let all_ok = results.iter().all(|(_, _, verdict, _)| *verdict == Verdict::Ok);

    if json_output {
        let json_results: Vec<_> = results
            .iter()
            .map(|(number, id, verdict, detail)| {
                json!({
                    "line": number,
                    "event_id": id,
                    "verdict": verdict.as_str(),
                    "detail": detail,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json_results)?);
    } else {
        output::print_table_header(&[("LINE", 6), ("EVENT_ID", 36), ("VERDICT", 10)]);
        for (number, id, verdict, detail) in &results {
            println!(
                "{:<6} {:<36} {:<10} {}",
                number,
                output::truncate(id, 36),
                verdict.as_str(),
                detail
            );
        }
    }

    if strict && !all_ok {
        std::process::exit(1);
    }

    Ok(())
}
