//! FILENAME: core/crosstab-engine/src/codec.rs
//! Axis key codec.
//!
//! Every row and column of a sub-table is identified by the values observed
//! for the variables of its group. Those (id, value) pairs are packed into one
//! flat string key so keys from differently shaped groups can share one axis,
//! and unpacked again once the table is assembled.
//!
//! Format: `id::value` pairs joined by `__`, e.g. `q1::1__q2::3`.
//! Backslash, ':' and '_' inside ids and values are escaped with a backslash,
//! so any id or value text survives the round trip.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

pub const PAIR_SEPARATOR: &str = "::";
pub const TOKEN_SEPARATOR: &str = "__";

/// One decoded `(variable id, value)` pair.
pub type LabelPair = (String, String);

/// Filler appended to shallower label paths.
pub fn filler() -> LabelPair {
    (String::new(), String::new())
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("empty key")]
    Empty,

    #[error("key '{0}' has a token without '::'")]
    MissingPairSeparator(String),

    #[error("key '{0}' has a token with more than one '::'")]
    RepeatedPairSeparator(String),

    #[error("key '{0}' has an invalid escape sequence")]
    InvalidEscape(String),
}

/// Encoded axis key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexKey(String);

impl IndexKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn decode(&self) -> Result<Vec<LabelPair>, DecodeError> {
        decode(&self.0)
    }
}

impl Display for IndexKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pairs each id with its aligned value and packs the pairs into one key.
/// Extra ids or values beyond the shorter side are ignored; a scalar is a
/// one-element slice.
pub fn encode<V, S>(values: &[V], ids: &[S]) -> IndexKey
where
    V: Display,
    S: AsRef<str>,
{
    let mut key = String::new();
    for (i, (id, value)) in ids.iter().zip(values).enumerate() {
        if i > 0 {
            key.push_str(TOKEN_SEPARATOR);
        }
        push_escaped(&mut key, id.as_ref());
        key.push_str(PAIR_SEPARATOR);
        push_escaped(&mut key, &value.to_string());
    }
    IndexKey(key)
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        if matches!(ch, '\\' | ':' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
}

/// Unpacks a key into its ordered `(id, value)` pairs.
pub fn decode(key: &str) -> Result<Vec<LabelPair>, DecodeError> {
    if key.is_empty() {
        return Err(DecodeError::Empty);
    }

    let mut pairs = Vec::new();
    let mut id = String::new();
    let mut value = String::new();
    let mut in_value = false;
    let mut chars = key.chars().peekable();

    while let Some(ch) = chars.next() {
        let literal = match ch {
            '\\' => match chars.next() {
                Some(escaped @ ('\\' | ':' | '_')) => escaped,
                _ => return Err(DecodeError::InvalidEscape(key.to_string())),
            },
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                if in_value {
                    return Err(DecodeError::RepeatedPairSeparator(key.to_string()));
                }
                in_value = true;
                continue;
            }
            '_' if chars.peek() == Some(&'_') => {
                chars.next();
                if !in_value {
                    return Err(DecodeError::MissingPairSeparator(key.to_string()));
                }
                pairs.push((std::mem::take(&mut id), std::mem::take(&mut value)));
                in_value = false;
                continue;
            }
            other => other,
        };

        if in_value {
            value.push(literal);
        } else {
            id.push(literal);
        }
    }

    if !in_value {
        return Err(DecodeError::MissingPairSeparator(key.to_string()));
    }
    pairs.push((id, value));
    Ok(pairs)
}

/// Pads every path to the longest one by appending filler pairs.
/// Existing entries keep their positions.
pub fn equalize_size(paths: Vec<Vec<LabelPair>>) -> Vec<Vec<LabelPair>> {
    let max_len = paths.iter().map(Vec::len).max().unwrap_or(0);
    paths
        .into_iter()
        .map(|mut path| {
            path.resize_with(max_len, filler);
            path
        })
        .collect()
}
