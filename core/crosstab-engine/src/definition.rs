//! FILENAME: core/crosstab-engine/src/definition.rs
//! Crosstab Definition - The serializable configuration.
//!
//! This module contains the options that accompany a TableSpec when a
//! crosstab is requested. These structures are designed to be:
//! - Serializable (report definitions are stored as JSON)
//! - Filled from partial input (every field has a default)
//! - Immutable snapshots of user intent

use serde::{Deserialize, Serialize};

// ============================================================================
// RESERVED MARKERS
// ============================================================================

/// Variable slot of the base row label.
pub const BASE_MARKER: &str = "$BASE$";

/// Variable slot of the total column label.
pub const TOTAL_MARKER: &str = "$TOTAL$";

// ============================================================================
// STATISTICS
// ============================================================================

/// Statistic a table row holds.
///
/// Only `Count` is computed by the engine; `ColumnPercent` is derived from it
/// afterwards by `CrosstabResult::as_cpct`. Requesting anything else in
/// `CrosstabOptions::statistics` produces a warning and no extra rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StatisticType {
    #[default]
    Count,
    ColumnPercent,
    Mean,
    Median,
    StdDev,
    Variance,
    SamplingError,
}

impl StatisticType {
    /// Reserved marker carried by rows of this statistic.
    pub fn marker(&self) -> &'static str {
        match self {
            StatisticType::Count => "$COUNT$",
            StatisticType::ColumnPercent => "$CPCT$",
            StatisticType::Mean => "$MEAN$",
            StatisticType::Median => "$MEDIAN$",
            StatisticType::StdDev => "$STD$",
            StatisticType::Variance => "$VAR$",
            StatisticType::SamplingError => "$SAMPLING_ERROR$",
        }
    }
}

// ============================================================================
// OPTIONS
// ============================================================================

/// Options for one crosstab evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrosstabOptions {
    /// Variable holding respondent weights. `None` weighs everyone as 1.
    pub weight: Option<String>,

    /// Whether to prepend a total column spanning all respondents.
    pub column_total: bool,

    /// Statistics requested for data rows.
    pub statistics: Vec<StatisticType>,

    // Display-only metadata, copied to the result untouched.
    pub title: String,
    pub subtitle: String,
    pub footer: String,
    pub corner: String,
}

impl Default for CrosstabOptions {
    fn default() -> Self {
        CrosstabOptions {
            weight: None,
            column_total: true,
            statistics: vec![StatisticType::Count],
            title: String::new(),
            subtitle: String::new(),
            footer: String::new(),
            corner: String::new(),
        }
    }
}

impl CrosstabOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weight(mut self, weight: impl Into<String>) -> Self {
        self.weight = Some(weight.into());
        self
    }

    pub fn with_column_total(mut self, column_total: bool) -> Self {
        self.column_total = column_total;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_statistics(mut self, statistics: Vec<StatisticType>) -> Self {
        self.statistics = statistics;
        self
    }
}

/// Display metadata carried from the options to the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub title: String,
    pub subtitle: String,
    pub footer: String,
    pub corner: String,
}

impl From<&CrosstabOptions> for TableMetadata {
    fn from(options: &CrosstabOptions) -> Self {
        TableMetadata {
            title: options.title.clone(),
            subtitle: options.subtitle.clone(),
            footer: options.footer.clone(),
            corner: options.corner.clone(),
        }
    }
}
