//! FILENAME: core/crosstab-engine/src/result.rs
//! Crosstab Result - The assembled table.
//!
//! Rows and columns are labelled by paths of `(variable id, value)` pairs,
//! padded to the same depth on each axis. The last row is the base row,
//! holding the weighted respondent total of every column.
//!
//! Values are raw: mapping ids and codes to human-readable labels is a
//! separate step (`row_display_labels` / `column_display_labels`).

use serde::{Deserialize, Serialize};
use survey::{SurveyStructure, VariableDefinition};

use crate::codec::LabelPair;
use crate::definition::{StatisticType, TableMetadata, BASE_MARKER, TOTAL_MARKER};
use crate::error::{CrosstabError, CrosstabWarning};

// ============================================================================
// AXIS LABELS
// ============================================================================

/// What an axis entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// A value combination of the group at `group` (declaration order).
    Data { group: usize },
    /// The total column.
    Total,
    /// The base row.
    Base,
}

/// Label of one row or column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLabel {
    /// `(id, value)` pairs, outermost first, right-padded with empty pairs.
    pub path: Vec<LabelPair>,

    pub kind: EntryKind,

    /// Statistic the row holds. Always `Count` on columns and on the base row.
    pub statistic: StatisticType,
}

impl AxisLabel {
    /// Flat tuple `id, value, id, value, ...`.
    pub fn flatten(&self) -> Vec<&str> {
        self.path
            .iter()
            .flat_map(|(id, value)| [id.as_str(), value.as_str()])
            .collect()
    }

    pub fn is_base(&self) -> bool {
        self.kind == EntryKind::Base
    }

    /// Number of real (non-filler) pairs.
    pub fn depth(&self) -> usize {
        self.path
            .iter()
            .take_while(|(id, value)| !(id.is_empty() && value.is_empty()))
            .count()
    }
}

// ============================================================================
// RESULT
// ============================================================================

/// A weighted crosstab. `cells[row][column]` is `None` where the row and
/// column combination was never observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrosstabResult {
    pub rows: Vec<AxisLabel>,
    pub columns: Vec<AxisLabel>,
    pub cells: Vec<Vec<Option<f64>>>,

    /// Statistic held by the data rows.
    pub statistic: StatisticType,

    pub metadata: TableMetadata,

    pub warnings: Vec<CrosstabWarning>,
}

impl CrosstabResult {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<f64> {
        self.cells.get(row).and_then(|r| r.get(column)).copied().flatten()
    }

    pub fn base_row_index(&self) -> Option<usize> {
        self.rows.iter().rposition(AxisLabel::is_base)
    }

    /// Weighted respondent total per column.
    pub fn base_row(&self) -> Option<&[Option<f64>]> {
        self.base_row_index().map(|idx| self.cells[idx].as_slice())
    }

    /// Column positions belonging to the data group at `group`.
    pub fn column_group(&self, group: usize) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind == EntryKind::Data { group })
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Finds a row by its flat label prefix, e.g. `["q1", "2"]`.
    pub fn find_row(&self, prefix: &[&str]) -> Option<usize> {
        self.rows
            .iter()
            .position(|r| r.flatten().starts_with(prefix))
    }

    /// Finds a column by its flat label prefix.
    pub fn find_column(&self, prefix: &[&str]) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.flatten().starts_with(prefix))
    }

    /// Column percentages: every data cell divided by its column's base.
    ///
    /// Returns a new table; the base row is copied unchanged. A zero or
    /// missing base gives `None`. Converting twice is rejected.
    pub fn as_cpct(&self) -> Result<CrosstabResult, CrosstabError> {
        if self.statistic == StatisticType::ColumnPercent {
            return Err(CrosstabError::AlreadyConverted);
        }
        let base_idx = self.base_row_index().ok_or(CrosstabError::MissingBaseRow)?;
        let base = &self.cells[base_idx];

        let cells = self
            .cells
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                if row_idx == base_idx {
                    return row.clone();
                }
                row.iter()
                    .zip(base)
                    .map(|(value, base)| match (value, base) {
                        (Some(value), Some(base)) if *base != 0.0 => Some(value / base),
                        _ => None,
                    })
                    .collect()
            })
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|label| {
                let mut label = label.clone();
                if !label.is_base() {
                    label.statistic = StatisticType::ColumnPercent;
                }
                label
            })
            .collect();

        Ok(CrosstabResult {
            rows,
            columns: self.columns.clone(),
            cells,
            statistic: StatisticType::ColumnPercent,
            metadata: self.metadata.clone(),
            warnings: self.warnings.clone(),
        })
    }

    /// Row labels with ids and codes replaced by variable and value labels.
    pub fn row_display_labels(&self, structure: &SurveyStructure) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|label| display_path(&label.path, structure))
            .collect()
    }

    /// Column labels with ids and codes replaced by variable and value labels.
    pub fn column_display_labels(&self, structure: &SurveyStructure) -> Vec<Vec<String>> {
        self.columns
            .iter()
            .map(|label| display_path(&label.path, structure))
            .collect()
    }
}

fn display_path(path: &[LabelPair], structure: &SurveyStructure) -> Vec<String> {
    let mut out = Vec::with_capacity(path.len() * 2);
    for (id, value) in path {
        if id == BASE_MARKER || id == TOTAL_MARKER {
            out.push(id.clone());
            out.push(value.clone());
            continue;
        }
        match find_variable(structure, id) {
            Some(variable) => {
                let variable_label = if variable.label.is_empty() {
                    id.clone()
                } else {
                    variable.label.clone()
                };
                out.push(variable_label);
                out.push(variable.value_label(value).unwrap_or(value).to_string());
            }
            None => {
                out.push(id.clone());
                out.push(value.clone());
            }
        }
    }
    out
}

/// Looks the id up directly, then among the children of aggregated questions.
fn find_variable<'a>(structure: &'a SurveyStructure, id: &str) -> Option<&'a VariableDefinition> {
    structure.get_variable_by_id(id).or_else(|| {
        structure
            .iter()
            .flat_map(|question| question.children.iter())
            .find(|child| child.id == id)
    })
}
