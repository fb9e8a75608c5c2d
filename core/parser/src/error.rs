//! FILENAME: core/parser/src/error.rs

use crate::parser::ParseError;
use crate::table_spec::Axis;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpecError {
    #[error("Expected at least 2 'by'-separated segments (rows by columns), found {0}")]
    TooFewSegments(usize),

    #[error("Expected at most 3 'by'-separated segments, found {0}")]
    TooManySegments(usize),

    #[error("Invalid {axis} segment '{segment}': {source}")]
    Parse {
        axis: Axis,
        segment: String,
        #[source]
        source: ParseError,
    },
}

/// Non-fatal findings reported alongside a successfully parsed TableSpec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecWarning {
    /// Segments after the third were discarded.
    ExtraSegmentsDropped { found: usize, dropped: Vec<String> },
}

impl std::fmt::Display for SpecWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecWarning::ExtraSegmentsDropped { found, dropped } => write!(
                f,
                "{} segments defined, only 3 are supported; dropped: {}",
                found,
                dropped.join(" | ")
            ),
        }
    }
}
