use ice_canonical::{compute_fingerprint, Canonicalizer};
use serde_json::json;

fn main() {
    let canonicalizer = Canonicalizer::new();
    let record = json!({
        "event_id": "e-1",
        "run_id": "run-1",
        "event_type": "RunProvisioned",
        "timestamp": "2025-12-20T00:00:00+00:00",
        "origin": "runtime",
        "payload": {
            "value": 42
        },
        "causality": null
    });

    match canonicalizer.canonicalize_to_string(&record) {
        Ok(bytes) => println!("{}", bytes),
        Err(err) => {
            eprintln!("canonicalization failed: {}", err);
            std::process::exit(1);
        }
    }

    match compute_fingerprint(&record, &canonicalizer) {
        Ok(fp) => println!("{}", fp),
        Err(err) => {
            eprintln!("fingerprint failed: {}", err);
            std::process::exit(1);
        }
    }
}
