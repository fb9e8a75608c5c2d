//! FILENAME: core/crosstab-engine/src/error.rs

use parser::{Axis, SpecError, SpecWarning};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::definition::StatisticType;

#[derive(Error, Debug)]
pub enum CrosstabError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error("Column percentages were already applied to this table")]
    AlreadyConverted,

    #[error("Table has no base row")]
    MissingBaseRow,
}

/// Problems with the table request, detected before any aggregation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Rows are empty")]
    EmptyRows,

    #[error("Columns are empty")]
    EmptyColumns,

    #[error("Group {index} on {axis} has no variables")]
    EmptyGroup { axis: Axis, index: usize },

    #[error("Variable \"{0}\" is not defined in the dataset")]
    UnknownVariable(String),

    #[error("Weight variable \"{0}\" is not defined in the dataset")]
    UnknownWeight(String),
}

/// Non-fatal findings surfaced with a finished table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrosstabWarning {
    /// The expression had more than three segments; the extra ones were ignored.
    ExtraSegmentsDropped { found: usize, dropped: Vec<String> },
    /// The third axis was requested; it is ignored.
    AdditionalAxisUnsupported,
    /// A statistic that is only a configuration placeholder was requested.
    StatisticNotComputed(StatisticType),
    /// An axis key could not be decoded; its row or column was dropped.
    UndecodableKey { key: String, reason: String },
}

impl std::fmt::Display for CrosstabWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrosstabWarning::ExtraSegmentsDropped { found, dropped } => write!(
                f,
                "{} segments defined, only 3 are supported; dropped: {}",
                found,
                dropped.join(" | ")
            ),
            CrosstabWarning::AdditionalAxisUnsupported => {
                write!(f, "Additional axis is not supported now")
            }
            CrosstabWarning::StatisticNotComputed(statistic) => {
                write!(f, "Statistic {:?} is not computed", statistic)
            }
            CrosstabWarning::UndecodableKey { key, reason } => {
                write!(f, "Dropped undecodable key '{}': {}", key, reason)
            }
        }
    }
}

impl From<SpecWarning> for CrosstabWarning {
    fn from(warning: SpecWarning) -> Self {
        match warning {
            SpecWarning::ExtraSegmentsDropped { found, dropped } => {
                CrosstabWarning::ExtraSegmentsDropped { found, dropped }
            }
        }
    }
}
