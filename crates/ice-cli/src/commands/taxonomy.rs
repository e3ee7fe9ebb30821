//! Taxonomy command implementation.

use crate::output;
use ice_core::{allowed_origins_for, vocabulary, TAXONOMY_VERSION};
use serde_json::json;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut rows = Vec::new();
    for kind in vocabulary() {
        let origins: Vec<String> = allowed_origins_for(kind.as_str())?
            .iter()
            .map(|class| class.to_string())
            .collect();
        rows.push((kind, origins));
    }

    if json {
        let entries: Vec<_> = rows
            .iter()
            .map(|(kind, origins)| {
                json!({
                    "event_type": kind.as_str(),
                    "category": kind.category(),
                    "origins": origins,
                })
            })
            .collect();
        let doc = json!({ "version": TAXONOMY_VERSION, "events": entries });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("taxonomy v{}", TAXONOMY_VERSION);
    output::print_table_header(&[("EVENT_TYPE", 24), ("CATEGORY", 12), ("ORIGINS", 10)]);
    for (kind, origins) in rows {
        println!(
            "{:<24} {:<12} {}",
            kind.as_str(),
            kind.category(),
            origins.join(",")
        );
    }
    Ok(())
}
