//! FILENAME: core/survey/src/dataset.rs
//! PURPOSE: Columnar respondent data: one column per variable, one entry per respondent.
//! CONTEXT: The crosstab engine reads whole columns at a time, so values are
//! stored column-major with a name index for O(1) lookup.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{SurveyError, SurveyResult};
use crate::value::DataValue;

/// A named column of respondent values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub values: Vec<DataValue>,
}

/// Rectangular respondent table.
///
/// Serialized as its columns; deserializing rebuilds the name index and
/// re-checks column lengths.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "DatasetRecord", into = "DatasetRecord")]
pub struct Dataset {
    columns: Vec<Column>,
    index: FxHashMap<String, usize>,
    respondents: usize,
}

/// Wire form of a Dataset. The respondent count keeps a dataset without
/// columns intact.
#[derive(Serialize, Deserialize)]
struct DatasetRecord {
    columns: Vec<Column>,
    #[serde(default)]
    respondents: Option<usize>,
}

impl TryFrom<DatasetRecord> for Dataset {
    type Error = SurveyError;

    fn try_from(record: DatasetRecord) -> SurveyResult<Self> {
        let mut dataset = Dataset::new();
        for column in record.columns {
            dataset.add_column(column.id, column.values)?;
        }

        match (dataset.columns.first(), record.respondents) {
            (None, Some(respondents)) => dataset.respondents = respondents,
            (Some(first), Some(respondents)) if respondents != dataset.respondents => {
                return Err(SurveyError::ColumnLengthMismatch {
                    column: first.id.clone(),
                    expected: respondents,
                    actual: dataset.respondents,
                });
            }
            _ => {}
        }
        Ok(dataset)
    }
}

impl From<Dataset> for DatasetRecord {
    fn from(dataset: Dataset) -> Self {
        DatasetRecord {
            columns: dataset.columns,
            respondents: Some(dataset.respondents),
        }
    }
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a dataset from row-major data. Every row must be as wide as `headers`.
    pub fn from_rows<H, R>(headers: &[H], rows: R) -> SurveyResult<Self>
    where
        H: AsRef<str>,
        R: IntoIterator<Item = Vec<DataValue>>,
    {
        let mut columns: Vec<Vec<DataValue>> = vec![Vec::new(); headers.len()];

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != headers.len() {
                return Err(SurveyError::RowWidthMismatch {
                    row: row_idx,
                    expected: headers.len(),
                    actual: row.len(),
                });
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }

        let mut dataset = Dataset::new();
        for (header, values) in headers.iter().zip(columns) {
            dataset.add_column(header.as_ref(), values)?;
        }
        Ok(dataset)
    }

    /// Adds a column. The first column fixes the respondent count.
    pub fn add_column(&mut self, id: impl Into<String>, values: Vec<DataValue>) -> SurveyResult<()> {
        let id = id.into();
        if id.is_empty() {
            return Err(SurveyError::EmptyVariableId);
        }
        if self.index.contains_key(&id) {
            return Err(SurveyError::DuplicateColumn(id));
        }
        if !self.columns.is_empty() && values.len() != self.respondents {
            return Err(SurveyError::ColumnLengthMismatch {
                column: id,
                expected: self.respondents,
                actual: values.len(),
            });
        }

        self.respondents = values.len();
        self.index.insert(id.clone(), self.columns.len());
        self.columns.push(Column { id, values });
        Ok(())
    }

    pub fn column(&self, id: &str) -> Option<&[DataValue]> {
        self.index
            .get(id)
            .map(|&idx| self.columns[idx].values.as_slice())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn column_ids(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.id.as_str())
    }

    pub fn respondent_count(&self) -> usize {
        self.respondents
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}
