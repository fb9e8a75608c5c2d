//! FILENAME: core/survey/src/value.rs
//! PURPOSE: Defines the value a single respondent gave for a single variable.
//! CONTEXT: `Missing` is how "unanswered" is represented everywhere. Values
//! need a stable order so table axes come out sorted, and a canonical text
//! form so they can be embedded in axis keys.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One observed answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum DataValue {
    #[default]
    Missing,
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl DataValue {
    pub fn text(s: impl Into<String>) -> Self {
        DataValue::Text(s.into())
    }

    /// Unanswered. A NaN number counts as unanswered too.
    pub fn is_missing(&self) -> bool {
        match self {
            DataValue::Missing => true,
            DataValue::Number(n) => n.is_nan(),
            _ => false,
        }
    }

    /// Numeric view used for weights. Text is not coerced.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Number(n) if !n.is_nan() => Some(*n),
            DataValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Canonical text form of the value.
    pub fn display_value(&self) -> String {
        match self {
            DataValue::Missing => String::new(),
            DataValue::Number(n) => {
                // Format without unnecessary decimal places
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            DataValue::Text(s) => s.clone(),
            DataValue::Boolean(b) => {
                if *b { "TRUE" } else { "FALSE" }.to_string()
            }
        }
    }

    /// Total order: Missing < Number < Text < Boolean.
    /// NaN sorts after every other number.
    pub fn total_cmp(&self, other: &DataValue) -> Ordering {
        match (self, other) {
            (DataValue::Missing, DataValue::Missing) => Ordering::Equal,
            (DataValue::Missing, _) => Ordering::Less,
            (_, DataValue::Missing) => Ordering::Greater,

            (DataValue::Number(a), DataValue::Number(b)) => a.total_cmp(b),
            (DataValue::Number(_), _) => Ordering::Less,
            (_, DataValue::Number(_)) => Ordering::Greater,

            (DataValue::Text(a), DataValue::Text(b)) => a.cmp(b),
            (DataValue::Text(_), _) => Ordering::Less,
            (_, DataValue::Text(_)) => Ordering::Greater,

            (DataValue::Boolean(a), DataValue::Boolean(b)) => a.cmp(b),
        }
    }
}

impl std::fmt::Display for DataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_value())
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            DataValue::Missing
        } else {
            DataValue::Number(value)
        }
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        DataValue::Number(value as f64)
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::Text(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::Text(value)
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Boolean(value)
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(DataValue::Missing, Into::into)
    }
}
