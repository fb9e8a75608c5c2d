//! FILENAME: core/survey/src/lib.rs
//! PURPOSE: Main library entry point for the survey data model.
//! CONTEXT: Re-exports the respondent dataset, variable metadata and the
//! survey structure registry used by the crosstab engine.

pub mod dataset;
pub mod error;
pub mod hierarchy;
pub mod structure;
pub mod value;
pub mod variable;

// Re-export commonly used types at the crate root
pub use dataset::{Column, Dataset};
pub use error::{SurveyError, SurveyResult};
pub use structure::{SurveyStructure, Upsert, DEFAULT_SEPARATOR};
pub use value::DataValue;
pub use variable::{ValueLabels, VariableDefinition};
