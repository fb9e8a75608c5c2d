//! FILENAME: core/survey/src/variable.rs
//! PURPOSE: Metadata describing one survey variable and its value labels.
//! CONTEXT: Value labels keep insertion order because questionnaires list
//! answer options in a meaningful order. Aggregated (hierarchical) variables
//! carry the split variables they were built from as children.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{SurveyError, SurveyResult};

// ============================================================================
// VALUE LABELS
// ============================================================================

/// Ordered value-code -> label mapping.
/// Stored as an ordered list plus a code index, like an interning table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<(String, String)>", into = "Vec<(String, String)>")]
pub struct ValueLabels {
    entries: Vec<(String, String)>,
    positions: FxHashMap<String, usize>,
}

impl ValueLabels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a label. A replaced code keeps its original position.
    /// Returns the previous label, if any.
    pub fn insert(&mut self, code: impl Into<String>, label: impl Into<String>) -> Option<String> {
        let code = code.into();
        let label = label.into();

        if let Some(&pos) = self.positions.get(&code) {
            return Some(std::mem::replace(&mut self.entries[pos].1, label));
        }

        self.positions.insert(code.clone(), self.entries.len());
        self.entries.push((code, label));
        None
    }

    /// Merges `other` into `self`; on a code collision the label from `other` wins.
    pub fn merge(&mut self, other: &ValueLabels) {
        for (code, label) in other.iter() {
            self.insert(code, label);
        }
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.positions
            .get(code)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.positions.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(c, l)| (c.as_str(), l.as_str()))
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }
}

// Order matters for equality: two mappings with the same pairs in a different
// order describe different questionnaires.
impl PartialEq for ValueLabels {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<C: Into<String>, L: Into<String>> FromIterator<(C, L)> for ValueLabels {
    fn from_iter<I: IntoIterator<Item = (C, L)>>(iter: I) -> Self {
        let mut labels = ValueLabels::new();
        for (code, label) in iter {
            labels.insert(code, label);
        }
        labels
    }
}

impl From<Vec<(String, String)>> for ValueLabels {
    fn from(entries: Vec<(String, String)>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<ValueLabels> for Vec<(String, String)> {
    fn from(labels: ValueLabels) -> Self {
        labels.entries
    }
}

// ============================================================================
// VARIABLE DEFINITION
// ============================================================================

/// Describes one variable (or, once aggregated, one question).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDefinition {
    /// Unique id; matches the dataset column name.
    pub id: String,

    /// Semantic storage type, e.g. "int", "float", "string".
    pub variable_type: Option<String>,

    /// Human-readable question text.
    pub label: String,

    /// Ordered value -> label mapping.
    pub values: ValueLabels,

    /// Split variables merged into this one. Empty unless aggregated.
    pub children: Vec<VariableDefinition>,

    /// Question kind, e.g. "radio", "checkbox".
    pub survey_type: Option<String>,
}

impl VariableDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        VariableDefinition {
            id: id.into(),
            variable_type: None,
            label: String::new(),
            values: ValueLabels::new(),
            children: Vec::new(),
            survey_type: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_type(mut self, variable_type: impl Into<String>) -> Self {
        self.variable_type = Some(variable_type.into());
        self
    }

    pub fn with_survey_type(mut self, survey_type: impl Into<String>) -> Self {
        self.survey_type = Some(survey_type.into());
        self
    }

    pub fn with_value(mut self, code: impl Into<String>, label: impl Into<String>) -> Self {
        self.values.insert(code, label);
        self
    }

    pub fn with_values(mut self, values: ValueLabels) -> Self {
        self.values = values;
        self
    }

    pub fn is_aggregated(&self) -> bool {
        !self.children.is_empty()
    }

    /// Label for a value code, if one is defined.
    pub fn value_label(&self, code: &str) -> Option<&str> {
        self.values.get(code)
    }

    /// Validated constructor for an untyped record (a JSON object).
    ///
    /// Accepted keys: `id` (required), `type`, `label`, `values` (object or
    /// list of `[code, label]` pairs), `children`, `survey_type`. Unknown keys
    /// are rejected.
    pub fn from_record(record: &serde_json::Value) -> SurveyResult<Self> {
        let raw: VariableRecord = serde_json::from_value(record.clone())?;
        raw.try_into()
    }
}

impl std::fmt::Display for VariableDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

// ============================================================================
// UNTYPED RECORDS
// ============================================================================

/// Wire shape of a variable record before validation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct VariableRecord {
    id: String,
    #[serde(default, rename = "type")]
    variable_type: Option<String>,
    #[serde(default)]
    label: String,
    #[serde(default)]
    values: Option<RecordValues>,
    #[serde(default)]
    children: Vec<serde_json::Value>,
    #[serde(default)]
    survey_type: Option<String>,
}

/// Value labels may arrive as an object or as ordered pairs. Codes may be
/// numbers or strings; numbers are stored in their display form.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordValues {
    Pairs(Vec<(serde_json::Value, String)>),
    Map(serde_json::Map<String, serde_json::Value>),
}

impl TryFrom<VariableRecord> for VariableDefinition {
    type Error = SurveyError;

    fn try_from(raw: VariableRecord) -> Result<Self, Self::Error> {
        let id = raw.id.trim().to_string();
        if id.is_empty() {
            return Err(SurveyError::EmptyVariableId);
        }

        let mut values = ValueLabels::new();
        match raw.values {
            Some(RecordValues::Pairs(pairs)) => {
                for (code, label) in pairs {
                    values.insert(code_to_string(&id, &code)?, label);
                }
            }
            Some(RecordValues::Map(map)) => {
                for (code, label) in map {
                    let label = label.as_str().ok_or_else(|| {
                        SurveyError::InvalidRecord(format!(
                            "variable '{}': label for value '{}' is not a string",
                            id, code
                        ))
                    })?;
                    values.insert(code, label);
                }
            }
            None => {}
        }

        let children = raw
            .children
            .iter()
            .map(VariableDefinition::from_record)
            .collect::<SurveyResult<Vec<_>>>()?;

        Ok(VariableDefinition {
            id,
            variable_type: raw.variable_type,
            label: raw.label,
            values,
            children,
            survey_type: raw.survey_type,
        })
    }
}

fn code_to_string(id: &str, code: &serde_json::Value) -> SurveyResult<String> {
    match code {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(if *b { "TRUE" } else { "FALSE" }.to_string()),
        other => Err(SurveyError::InvalidRecord(format!(
            "variable '{}': unsupported value code {}",
            id, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_variable() {
        let variable = VariableDefinition::new("a1")
            .with_label("q2@3_label")
            .with_value("11", "a1_a");

        assert_eq!(variable.id, "a1");
        assert_eq!(variable.label, "q2@3_label");
        assert_eq!(variable.value_label("11"), Some("a1_a"));
        assert!(!variable.is_aggregated());
    }

    #[test]
    fn value_labels_keep_position_on_replace() {
        let mut labels = ValueLabels::new();
        labels.insert("1", "one");
        labels.insert("2", "two");
        assert_eq!(labels.insert("1", "uno"), Some("one".to_string()));

        let pairs: Vec<_> = labels.iter().collect();
        assert_eq!(pairs, vec![("1", "uno"), ("2", "two")]);
    }

    #[test]
    fn value_labels_merge_last_write_wins() {
        let mut left: ValueLabels = vec![("1", "a"), ("2", "b")].into_iter().collect();
        let right: ValueLabels = vec![("2", "B"), ("3", "c")].into_iter().collect();
        left.merge(&right);

        let pairs: Vec<_> = left.iter().collect();
        assert_eq!(pairs, vec![("1", "a"), ("2", "B"), ("3", "c")]);
    }

    #[test]
    fn from_record_accepts_pairs_and_maps() {
        let variable = VariableDefinition::from_record(&json!({
            "id": "q1",
            "type": "int",
            "label": "Gender",
            "values": [[1, "Male"], [2, "Female"]],
            "survey_type": "radio"
        }))
        .unwrap();

        assert_eq!(variable.variable_type.as_deref(), Some("int"));
        assert_eq!(variable.values.codes().collect::<Vec<_>>(), vec!["1", "2"]);
        assert_eq!(variable.survey_type.as_deref(), Some("radio"));

        let variable = VariableDefinition::from_record(&json!({
            "id": "q2",
            "values": {"11": "yes"}
        }))
        .unwrap();
        assert_eq!(variable.value_label("11"), Some("yes"));
    }

    #[test]
    fn from_record_rejects_bad_input() {
        assert!(matches!(
            VariableDefinition::from_record(&json!({"id": "  "})),
            Err(SurveyError::EmptyVariableId)
        ));
        assert!(matches!(
            VariableDefinition::from_record(&json!({"id": "q1", "colour": "red"})),
            Err(SurveyError::Json(_))
        ));
        assert!(matches!(
            VariableDefinition::from_record(&json!({"label": "no id"})),
            Err(SurveyError::Json(_))
        ));
        assert!(matches!(
            VariableDefinition::from_record(&json!({"id": "q1", "values": {"1": 5}})),
            Err(SurveyError::InvalidRecord(_))
        ));
    }

    #[test]
    fn from_record_builds_children() {
        let variable = VariableDefinition::from_record(&json!({
            "id": "a1",
            "children": [{"id": "a1_1"}, {"id": "a1_2"}]
        }))
        .unwrap();
        assert!(variable.is_aggregated());
        assert_eq!(variable.children[1].id, "a1_2");
    }
}
