//! Reading exported event records.

use ice_core::EventRecord;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use thiserror::Error;

/// Errors while reading input files.
#[derive(Error, Debug)]
pub enum InputError {
    /// File could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    /// Input is not a JSON event record.
    #[error("invalid event record: {0}")]
    Record(#[from] serde_json::Error),
}

/// One non-blank line of a JSON Lines export.
pub struct Line {
    /// 1-based line number.
    pub number: usize,
    /// Parsed record, or why it could not be parsed.
    pub record: Result<EventRecord, serde_json::Error>,
}

/// Reads every non-blank line of `path`, up to `max` records.
pub fn read_lines(path: &str, max: Option<usize>) -> Result<Vec<Line>, InputError> {
    let io_err = |source| InputError::Io {
        path: path.to_string(),
        source,
    };
    let reader = BufReader::new(File::open(path).map_err(io_err)?);

    let mut lines = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        if max.is_some_and(|max| lines.len() >= max) {
            break;
        }
        let line = line.map_err(io_err)?;
        if line.trim().is_empty() {
            continue;
        }
        lines.push(Line {
            number: idx + 1,
            record: serde_json::from_str(&line),
        });
    }
    Ok(lines)
}

/// Reads a single record from a file, or stdin when no path is given.
pub fn read_record(path: Option<String>) -> Result<EventRecord, InputError> {
    let text = match path {
        Some(path) => std::fs::read_to_string(&path).map_err(|source| InputError::Io {
            path,
            source,
        })?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|source| InputError::Io {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            buffer
        }
    };
    Ok(serde_json::from_str(&text)?)
}
