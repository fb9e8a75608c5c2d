//! FILENAME: core/survey/src/structure.rs
//! PURPOSE: Ordered registry of variable definitions for one survey.
//! CONTEXT: Long-lived metadata. Mutated only through `add_variable` and
//! `remove`; `to_hierarchical` (see hierarchy.rs) derives a new registry.

use rustc_hash::FxHashMap;

use crate::error::{SurveyError, SurveyResult};
use crate::variable::VariableDefinition;

/// Separator between a question id and its option suffix, e.g. `q5_3`.
pub const DEFAULT_SEPARATOR: &str = "_";

/// Outcome of `SurveyStructure::add_variable`.
#[derive(Debug, Clone, PartialEq)]
pub enum Upsert {
    Inserted,
    /// An existing definition with the same id was replaced; holds the old one.
    Replaced(VariableDefinition),
}

impl Upsert {
    pub fn is_replaced(&self) -> bool {
        matches!(self, Upsert::Replaced(_))
    }
}

/// Survey variables in declared order, with id lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyStructure {
    variables: Vec<VariableDefinition>,
    index: FxHashMap<String, usize>,
    is_hierarchical: bool,
    separator: String,
}

impl Default for SurveyStructure {
    fn default() -> Self {
        Self::new()
    }
}

impl SurveyStructure {
    pub fn new() -> Self {
        SurveyStructure {
            variables: Vec::new(),
            index: FxHashMap::default(),
            is_hierarchical: false,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub(crate) fn hierarchical(separator: impl Into<String>) -> Self {
        SurveyStructure {
            is_hierarchical: true,
            separator: separator.into(),
            ..Self::new()
        }
    }

    /// Bulk construction from typed definitions. Later duplicates replace earlier ones.
    pub fn from_list<I>(variables: I) -> Self
    where
        I: IntoIterator<Item = VariableDefinition>,
    {
        let mut structure = SurveyStructure::new();
        for variable in variables {
            structure.add_variable(variable);
        }
        structure
    }

    /// Bulk construction from untyped JSON records, validated one by one.
    pub fn from_records(records: &[serde_json::Value]) -> SurveyResult<Self> {
        let variables = records
            .iter()
            .map(VariableDefinition::from_record)
            .collect::<SurveyResult<Vec<_>>>()?;
        Ok(Self::from_list(variables))
    }

    pub fn is_hierarchical(&self) -> bool {
        self.is_hierarchical
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Adds a variable. An existing id is replaced (and moves to the end of the
    /// declared order); the replacement is logged and reported to the caller.
    pub fn add_variable(&mut self, variable: VariableDefinition) -> Upsert {
        let outcome = match self.remove(&variable.id) {
            Ok(previous) => {
                log::warn!("Variable {} was overwritten", variable.id);
                Upsert::Replaced(previous)
            }
            Err(_) => Upsert::Inserted,
        };

        self.index.insert(variable.id.clone(), self.variables.len());
        self.variables.push(variable);
        outcome
    }

    pub fn get_variable_by_id(&self, id: &str) -> Option<&VariableDefinition> {
        self.index.get(id).map(|&idx| &self.variables[idx])
    }

    /// Like `get_variable_by_id`, but a missing id is an error.
    pub fn variable(&self, id: &str) -> SurveyResult<&VariableDefinition> {
        self.get_variable_by_id(id)
            .ok_or_else(|| SurveyError::UnknownVariable(id.to_string()))
    }

    pub fn get_all_variables_ids(&self) -> Vec<&str> {
        self.variables.iter().map(|v| v.id.as_str()).collect()
    }

    pub fn remove(&mut self, id: &str) -> SurveyResult<VariableDefinition> {
        let idx = self
            .index
            .remove(id)
            .ok_or_else(|| SurveyError::UnknownVariable(id.to_string()))?;
        let removed = self.variables.remove(idx);

        for position in self.index.values_mut() {
            if *position > idx {
                *position -= 1;
            }
        }
        Ok(removed)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VariableDefinition> {
        self.variables.iter()
    }
}

impl<'a> IntoIterator for &'a SurveyStructure {
    type Item = &'a VariableDefinition;
    type IntoIter = std::slice::Iter<'a, VariableDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.iter()
    }
}
