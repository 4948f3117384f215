//! Matrix variables: `segment;key=value;key=v1,v2` path-segment parameters.

use percent_encoding::percent_decode_str;
use std::collections::BTreeMap;

/// A single path segment split into its path value and its matrix variables.
///
/// Parsing rules:
/// * The segment is split while still percent-encoded; every key and value is decoded
///   afterwards, so `%3B` and `%2C` stay inside a value.
/// * Everything before the first `;` is the path value.
/// * Each following `;`-separated piece is `key=value[,value...]`; repeated keys
///   accumulate values in the order they appear.
/// * A piece without `=` registers the key with no values.
/// * Empty pieces, empty keys and empty values are ignored.
/// * Keys and values are trimmed of surrounding whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatrixSegment {
    value: String,
    variables: BTreeMap<String, Vec<String>>,
}

impl MatrixSegment {
    /// Parses a raw, still percent-encoded path segment.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut pieces = raw.split(';');
        let value = decode(pieces.next().unwrap_or_default());
        let mut variables: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for piece in pieces {
            let (key, raw_values) = piece.split_once('=').unwrap_or((piece, ""));
            let key = decode(key);
            if key.is_empty() {
                continue;
            }

            let values = variables.entry(key).or_default();
            values.extend(raw_values.split(',').map(decode).filter(|v| !v.is_empty()));
        }

        Self { value, variables }
    }

    /// The path value preceding the first `;`.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// All values for `key`, in request order.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.variables.get(key).map(Vec::as_slice)
    }
}

fn decode(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().trim().to_owned()
}
