//! FILENAME: core/parser/src/segments.rs
//! PURPOSE: Top-level entry points: splits text on " by " and parses each segment.
//! CONTEXT: Segment 1 becomes rows, 2 columns and 3 (optional) the additional axis.

use crate::error::{SpecError, SpecWarning};
use crate::expand::expand;
use crate::parser::parse_segment;
use crate::table_spec::{Axis, GroupSpec, TableSpec};

const MAX_SEGMENTS: usize = 3;

/// Splits on the keyword "by" (any case) surrounded by single literal spaces.
/// Matches do not overlap: "a by by b" splits into "a" and "by b".
pub fn split_segments(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut segments = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i + 4 <= bytes.len() {
        if bytes[i] == b' '
            && bytes[i + 1].eq_ignore_ascii_case(&b'b')
            && bytes[i + 2].eq_ignore_ascii_case(&b'y')
            && bytes[i + 3] == b' '
        {
            segments.push(&text[start..i]);
            i += 4;
            start = i;
        } else {
            i += 1;
        }
    }
    segments.push(&text[start..]);
    segments
}

/// Parses a table description, logging any soft warnings.
pub fn parse(text: &str) -> Result<TableSpec, SpecError> {
    parse_with_warnings(text).map(|(spec, _)| spec)
}

/// Parses a table description and hands soft warnings back to the caller.
pub fn parse_with_warnings(text: &str) -> Result<(TableSpec, Vec<SpecWarning>), SpecError> {
    let segments = split_segments(text);

    if segments.len() < 2 {
        return Err(SpecError::TooFewSegments(segments.len()));
    }

    let mut warnings = Vec::new();
    if segments.len() > MAX_SEGMENTS {
        let warning = SpecWarning::ExtraSegmentsDropped {
            found: segments.len(),
            dropped: segments[MAX_SEGMENTS..]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };
        log::warn!("table description '{}': {}", text, warning);
        warnings.push(warning);
    }

    let rows = parse_axis(Axis::Rows, segments[0])?;
    let columns = parse_axis(Axis::Columns, segments[1])?;
    let additional_axis = match segments.get(2) {
        Some(segment) => Some(parse_axis(Axis::AdditionalAxis, segment)?),
        None => None,
    };

    Ok((
        TableSpec {
            rows,
            columns,
            additional_axis,
        },
        warnings,
    ))
}

/// Like `parse`, but more than three segments is an error instead of a warning.
pub fn parse_strict(text: &str) -> Result<TableSpec, SpecError> {
    let found = split_segments(text).len();
    if found > MAX_SEGMENTS {
        return Err(SpecError::TooManySegments(found));
    }
    parse(text)
}

fn parse_axis(axis: Axis, segment: &str) -> Result<Vec<GroupSpec>, SpecError> {
    let ast = parse_segment(segment).map_err(|source| SpecError::Parse {
        axis,
        segment: segment.trim().to_string(),
        source,
    })?;
    Ok(expand(&ast))
}
