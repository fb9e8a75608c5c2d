//! FILENAME: core/crosstab-engine/src/lib.rs
//! Crosstab subsystem for survey reporting.
//!
//! This crate turns a parsed TableSpec and a respondent dataset
//! into a weighted crosstab. It depends on `parser` for TableSpec and on
//! `survey` for the dataset and variable metadata.
//!
//! Layers:
//! - `definition`: Serializable options (what the report asks for)
//! - `codec`: Axis key encoding (HOW keys are shared across groups)
//! - `result`: Assembled table (WHAT we return)
//! - `engine`: Calculation engine (HOW we aggregate)

pub mod codec;
pub mod definition;
pub mod engine;
pub mod error;
pub mod result;

pub use codec::{decode, encode, equalize_size, DecodeError, IndexKey, LabelPair};
pub use definition::*;
pub use engine::{build_crosstab, build_crosstab_from_expression, CrosstabCalculator};
pub use error::{ConfigurationError, CrosstabError, CrosstabWarning};
pub use result::{AxisLabel, CrosstabResult, EntryKind};
