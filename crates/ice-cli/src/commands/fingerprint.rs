//! Fingerprint command implementation.

use crate::input;
use ice_canonical::Canonicalizer;
use ice_core::Event;

pub fn run(input: Option<String>, show_canonical: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut record = input::read_record(input)?;
    // Any claimed fingerprint is ignored; this command computes it.
    record.integrity = None;

    let event = Event::from_record(record)
        .map_err(|e| format!("Invalid event record: {}", e))?;

    if show_canonical {
        let mut value = event.to_json();
        if let Some(map) = value.as_object_mut() {
            map.remove("integrity");
        }
        let canonical = Canonicalizer::new()
            .canonicalize_to_string(&value)
            .map_err(|e| format!("Canonicalization failed: {}", e))?;
        println!("{}", canonical);
    }

    println!("{}", event.integrity());
    Ok(())
}
