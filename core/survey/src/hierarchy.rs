//! FILENAME: core/survey/src/hierarchy.rs
//! PURPOSE: Collapses split multiple-choice variables into one logical question.
//! CONTEXT: Survey exports store a checkbox question as one column per option
//! (`q2_1`, `q2_2`, ...). Grouping ids by the part before the separator gives
//! back the question (`q2`), whose children are the option variables and whose
//! value labels are the union of theirs.
//!
//! Example with separator "_":
//!   q1, q2_1, q2_2, q2_3  -->  q1 { q1 }, q2 { q2_1, q2_2, q2_3 }

use rustc_hash::FxHashMap;

use crate::structure::SurveyStructure;
use crate::variable::VariableDefinition;

impl SurveyStructure {
    /// Builds the hierarchical form of this structure without modifying it.
    ///
    /// Ids listed in `convert_exceptions` are kept whole instead of being cut at
    /// the separator. An already hierarchical structure is returned as a copy.
    pub fn to_hierarchical(&self, convert_exceptions: Option<&[&str]>) -> SurveyStructure {
        if self.is_hierarchical() {
            return self.clone();
        }

        let exceptions = convert_exceptions.unwrap_or(&[]);

        // Question ids in first-seen order, each with its member variables.
        let mut order: Vec<&str> = Vec::new();
        let mut members: FxHashMap<&str, Vec<&VariableDefinition>> = FxHashMap::default();

        for variable in self.iter() {
            let question_id = question_id(&variable.id, self.separator(), exceptions);
            members
                .entry(question_id)
                .or_insert_with(|| {
                    order.push(question_id);
                    Vec::new()
                })
                .push(variable);
        }

        let mut hierarchical = SurveyStructure::hierarchical(self.separator());

        for question_id in order {
            let group = &members[question_id];
            let seed = group[0];

            let mut question = VariableDefinition {
                id: question_id.to_string(),
                variable_type: seed.variable_type.clone(),
                label: seed.label.clone(),
                values: seed.values.clone(),
                children: seed.children.clone(),
                survey_type: seed.survey_type.clone(),
            };

            for variable in group {
                question.children.push((*variable).clone());
                question.values.merge(&variable.values);
            }

            log::debug!(
                "question {} aggregates {} variable(s)",
                question.id,
                group.len()
            );
            hierarchical.add_variable(question);
        }

        hierarchical
    }
}

/// The part of `variable_id` before the first separator, or the whole id for
/// exceptions and ids without a separator.
fn question_id<'a>(variable_id: &'a str, separator: &str, exceptions: &[&str]) -> &'a str {
    if separator.is_empty() || exceptions.contains(&variable_id) {
        return variable_id;
    }
    variable_id
        .split_once(separator)
        .map_or(variable_id, |(question, _)| question)
}
