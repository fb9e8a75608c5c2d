//! FILENAME: core/parser/src/table_spec.rs
//! PURPOSE: The structured table description produced by the parser.
//! CONTEXT: A TableSpec can also be built directly, bypassing the text
//! grammar. Once built it is treated as an immutable snapshot of one report
//! request.

use serde::{Deserialize, Serialize};

/// One nested ("drill-down") combination of variables for one axis.
/// Order is significant: the first id is the outermost level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupSpec {
    ids: Vec<String>,
}

impl GroupSpec {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GroupSpec {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn single(id: impl Into<String>) -> Self {
        GroupSpec { ids: vec![id.into()] }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.ids.iter()
    }

    /// Appends another group after this one, keeping positional order.
    pub fn concat(&self, other: &GroupSpec) -> GroupSpec {
        let mut ids = Vec::with_capacity(self.ids.len() + other.ids.len());
        ids.extend_from_slice(&self.ids);
        ids.extend_from_slice(&other.ids);
        GroupSpec { ids }
    }
}

impl<S: Into<String>> FromIterator<S> for GroupSpec {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        GroupSpec::new(iter)
    }
}

impl From<Vec<&str>> for GroupSpec {
    fn from(ids: Vec<&str>) -> Self {
        GroupSpec::new(ids)
    }
}

impl From<Vec<String>> for GroupSpec {
    fn from(ids: Vec<String>) -> Self {
        GroupSpec { ids }
    }
}

impl<'a> IntoIterator for &'a GroupSpec {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

impl std::fmt::Display for GroupSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.ids.join(" > "))
    }
}

/// Which axis of the table a segment describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Rows,
    Columns,
    AdditionalAxis,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Rows => write!(f, "rows"),
            Axis::Columns => write!(f, "columns"),
            Axis::AdditionalAxis => write!(f, "additional axis"),
        }
    }
}

/// Rows, columns and the optional third axis, each an ordered list of groups.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableSpec {
    pub rows: Vec<GroupSpec>,
    pub columns: Vec<GroupSpec>,
    #[serde(default)]
    pub additional_axis: Option<Vec<GroupSpec>>,
}

impl TableSpec {
    pub fn new(rows: Vec<GroupSpec>, columns: Vec<GroupSpec>) -> Self {
        TableSpec {
            rows,
            columns,
            additional_axis: None,
        }
    }

    pub fn with_additional_axis(mut self, axis: Vec<GroupSpec>) -> Self {
        self.additional_axis = Some(axis);
        self
    }

    /// Groups for the given axis. The additional axis is empty when absent.
    pub fn groups(&self, axis: Axis) -> &[GroupSpec] {
        match axis {
            Axis::Rows => &self.rows,
            Axis::Columns => &self.columns,
            Axis::AdditionalAxis => self.additional_axis.as_deref().unwrap_or(&[]),
        }
    }

    /// Distinct variable ids across all axes, first-seen order.
    pub fn variable_ids(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for axis in [Axis::Rows, Axis::Columns, Axis::AdditionalAxis] {
            for id in self.groups(axis).iter().flat_map(|g| g.iter()) {
                if !seen.contains(&id.as_str()) {
                    seen.push(id.as_str());
                }
            }
        }
        seen
    }

    /// Distinct variable ids used by the row groups, first-seen order.
    pub fn row_variable_ids(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for id in self.rows.iter().flat_map(|g| g.iter()) {
            if !seen.contains(&id.as_str()) {
                seen.push(id.as_str());
            }
        }
        seen
    }
}
