use canonical_json::to_string;
use serde_json::Value;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// Provided JSON could not be canonicalized.
    #[error("invalid JSON structure: {0}")]
    InvalidStructure(String),
    /// Generic failure reported by the encoder.
    #[error("other error: {0}")]
    Other(String),
}

/// Canonicalizer that emits deterministic bytes.
///
/// The output is RFC 8785 JSON: object members sorted by key, `,` and `:`
/// separators, no whitespace outside strings. Two structurally equal values
/// always produce identical bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Canonicalizer;

impl Canonicalizer {
    /// Creates a new canonicalizer.
    pub fn new() -> Self {
        Self
    }

    /// Produces canonical UTF-8 bytes for `value`.
    ///
    /// `serde_json::Number` cannot hold NaN or infinities, so every
    /// `Value` has a canonical form.
    pub fn canonicalize(&self, value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
        let canonical =
            to_string(value).map_err(|err| CanonicalizationError::Other(err.to_string()))?;
        Ok(canonical.into_bytes())
    }

    /// Produces the canonical encoding as a `String`.
    pub fn canonicalize_to_string(&self, value: &Value) -> Result<String, CanonicalizationError> {
        let bytes = self.canonicalize(value)?;
        String::from_utf8(bytes)
            .map_err(|err| CanonicalizationError::InvalidStructure(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_finite_floats_never_reach_the_encoder() {
        assert!(serde_json::Number::from_f64(f64::NAN).is_none());
        assert!(serde_json::Number::from_f64(f64::INFINITY).is_none());
        assert_eq!(serde_json::to_value(f64::NAN).unwrap(), Value::Null);

        let out = Canonicalizer::new()
            .canonicalize_to_string(&json!({"x": f64::NEG_INFINITY, "y": 1.5}))
            .unwrap();
        assert_eq!(out, r#"{"x":null,"y":1.5}"#);
    }

    #[test]
    fn nested_objects_are_sorted() {
        let canonicalizer = Canonicalizer::new();
        let value = json!({"z": {"b": true, "a": null}, "m": [3, 1]});
        let out = canonicalizer.canonicalize_to_string(&value).unwrap();
        assert_eq!(out, r#"{"m":[3,1],"z":{"a":null,"b":true}}"#);
    }
}
