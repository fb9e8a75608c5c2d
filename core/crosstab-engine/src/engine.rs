//! FILENAME: core/crosstab-engine/src/engine.rs
//! Crosstab Engine - Turns a TableSpec and a Dataset into a CrosstabResult.
//!
//! Algorithm:
//! 1. Validate the request (groups, variable references, weight)
//! 2. Resolve each respondent's effective weight; respondents that answered
//!    no row variable are excluded
//! 3. Intern one axis key per respondent and group (GroupKeyCache)
//! 4. One pass over respondents accumulates every (row group x column group)
//!    sub-table, the per-column-group bases and the total column
//! 5. Lay out the axes (declared group order, keys sorted by value) and fill
//!    the cell grid; the base row goes last
//! 6. Decode keys into label paths and pad each axis to a uniform depth

use parser::{Axis, GroupSpec, TableSpec};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::cmp::Ordering;
use survey::{DataValue, Dataset};

use crate::codec::{encode, equalize_size, IndexKey, LabelPair};
use crate::definition::{CrosstabOptions, StatisticType, TableMetadata, BASE_MARKER, TOTAL_MARKER};
use crate::error::{ConfigurationError, CrosstabError, CrosstabWarning};
use crate::result::{AxisLabel, CrosstabResult, EntryKind};

/// Interned key id, local to one group.
pub type KeyId = u32;

/// Value tuple of one key. Groups rarely nest more than a few variables.
type KeyValues = SmallVec<[DataValue; 4]>;

// ============================================================================
// GROUP KEY CACHE
// ============================================================================

/// Interned axis keys of one group, with each respondent's key.
///
/// A respondent has a key only when included and when every variable of the
/// group is answered.
#[derive(Debug, Default)]
struct GroupKeyCache {
    /// Key id per respondent.
    respondent_keys: Vec<Option<KeyId>>,

    /// id -> encoded key
    keys: Vec<IndexKey>,

    /// id -> observed values, in group order
    values: Vec<KeyValues>,

    /// encoded key -> id
    key_to_id: FxHashMap<IndexKey, KeyId>,
}

impl GroupKeyCache {
    fn build(group: &GroupSpec, columns: &[&[DataValue]], weights: &[Option<f64>]) -> Self {
        let mut cache = GroupKeyCache {
            respondent_keys: Vec::with_capacity(weights.len()),
            ..Default::default()
        };

        for (respondent, weight) in weights.iter().enumerate() {
            if weight.is_none() {
                cache.respondent_keys.push(None);
                continue;
            }

            let values: KeyValues = columns.iter().map(|c| c[respondent].clone()).collect();
            if values.iter().any(DataValue::is_missing) {
                cache.respondent_keys.push(None);
                continue;
            }

            let id = cache.intern(encode(&values, group.ids()), values);
            cache.respondent_keys.push(Some(id));
        }

        cache
    }

    fn intern(&mut self, key: IndexKey, values: KeyValues) -> KeyId {
        if let Some(&id) = self.key_to_id.get(&key) {
            return id;
        }
        let id = self.keys.len() as KeyId;
        self.key_to_id.insert(key.clone(), id);
        self.keys.push(key);
        self.values.push(values);
        id
    }

    fn key_of(&self, respondent: usize) -> Option<KeyId> {
        self.respondent_keys[respondent]
    }

    fn key(&self, id: KeyId) -> &IndexKey {
        &self.keys[id as usize]
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    /// Ids ordered by their value tuples.
    fn sorted_ids(&self) -> Vec<KeyId> {
        let mut ids: Vec<KeyId> = (0..self.keys.len() as KeyId).collect();
        ids.sort_by(|&a, &b| {
            compare_values(&self.values[a as usize], &self.values[b as usize])
                .then_with(|| self.key(a).cmp(self.key(b)))
        });
        ids
    }
}

fn compare_values(a: &[DataValue], b: &[DataValue]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match x.total_cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

// ============================================================================
// AXIS LAYOUT
// ============================================================================

/// Where a laid-out axis entry reads its values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Data { group: usize, key: KeyId },
    Total,
    Base,
}

#[derive(Debug, Clone)]
struct AxisEntry {
    slot: Slot,
    key: IndexKey,
}

impl AxisEntry {
    fn kind(&self) -> EntryKind {
        match self.slot {
            Slot::Data { group, .. } => EntryKind::Data { group },
            Slot::Total => EntryKind::Total,
            Slot::Base => EntryKind::Base,
        }
    }
}

fn base_key() -> IndexKey {
    encode(&[StatisticType::Count.marker()], &[BASE_MARKER])
}

fn total_key() -> IndexKey {
    encode(&[""], &[TOTAL_MARKER])
}

// ============================================================================
// CROSSTAB CALCULATOR
// ============================================================================

/// The main calculation engine for crosstabs.
pub struct CrosstabCalculator<'a> {
    dataset: &'a Dataset,
    spec: &'a TableSpec,
    options: &'a CrosstabOptions,

    /// Effective weight per respondent; `None` excludes the respondent.
    weights: Vec<Option<f64>>,

    row_caches: Vec<GroupKeyCache>,
    col_caches: Vec<GroupKeyCache>,

    /// One sparse sub-table per (row group, column group), indexed
    /// `row_group * column_groups + column_group`.
    sub_tables: Vec<FxHashMap<(KeyId, KeyId), f64>>,

    /// Weighted base per column group and key.
    bases: Vec<FxHashMap<KeyId, f64>>,

    /// Weighted total column per row group and key.
    totals: Vec<FxHashMap<KeyId, f64>>,

    /// Row keys that received at least one observation, per row group.
    row_seen: Vec<Vec<bool>>,

    total_weight: f64,

    warnings: Vec<CrosstabWarning>,
}

impl<'a> CrosstabCalculator<'a> {
    pub fn new(dataset: &'a Dataset, spec: &'a TableSpec, options: &'a CrosstabOptions) -> Self {
        CrosstabCalculator {
            dataset,
            spec,
            options,
            weights: Vec::new(),
            row_caches: Vec::new(),
            col_caches: Vec::new(),
            sub_tables: Vec::new(),
            bases: Vec::new(),
            totals: Vec::new(),
            row_seen: Vec::new(),
            total_weight: 0.0,
            warnings: Vec::new(),
        }
    }

    /// Executes the full calculation.
    pub fn calculate(mut self) -> Result<CrosstabResult, CrosstabError> {
        // Step 1: Reject malformed requests before touching any data
        self.validate()?;
        self.collect_configuration_warnings();

        // Step 2: Inclusion and weights
        self.resolve_weights();

        // Step 3: Axis keys
        self.row_caches = self.build_caches(&self.spec.rows);
        self.col_caches = self.build_caches(&self.spec.columns);

        // Step 4: Accumulate
        self.accumulate();

        // Step 5 + 6: Lay out, fill and label
        Ok(self.assemble())
    }

    /// Checks group shapes and that every referenced variable exists.
    fn validate(&self) -> Result<(), ConfigurationError> {
        if self.spec.rows.is_empty() {
            return Err(ConfigurationError::EmptyRows);
        }
        if self.spec.columns.is_empty() {
            return Err(ConfigurationError::EmptyColumns);
        }

        for axis in [Axis::Rows, Axis::Columns, Axis::AdditionalAxis] {
            for (index, group) in self.spec.groups(axis).iter().enumerate() {
                if group.is_empty() {
                    return Err(ConfigurationError::EmptyGroup { axis, index });
                }
                if let Some(unknown) = group.iter().find(|id| !self.dataset.contains(id)) {
                    return Err(ConfigurationError::UnknownVariable(unknown.clone()));
                }
            }
        }

        if let Some(weight) = &self.options.weight {
            if !self.dataset.contains(weight) {
                return Err(ConfigurationError::UnknownWeight(weight.clone()));
            }
        }

        Ok(())
    }

    fn collect_configuration_warnings(&mut self) {
        if self.spec.additional_axis.is_some() {
            self.warn(CrosstabWarning::AdditionalAxisUnsupported);
        }

        let mut reported: Vec<StatisticType> = Vec::new();
        for &statistic in &self.options.statistics {
            if statistic != StatisticType::Count && !reported.contains(&statistic) {
                reported.push(statistic);
                self.warn(CrosstabWarning::StatisticNotComputed(statistic));
            }
        }
    }

    fn warn(&mut self, warning: CrosstabWarning) {
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    fn resolve_weights(&mut self) {
        let dataset = self.dataset;
        let respondents = dataset.respondent_count();
        let row_columns = self.columns_for(&self.spec.row_variable_ids());
        let weight_column = self
            .options
            .weight
            .as_deref()
            .and_then(|id| dataset.column(id));

        self.weights = (0..respondents)
            .map(|respondent| {
                let answered = row_columns.iter().any(|c| !c[respondent].is_missing());
                if !answered {
                    return None;
                }
                match weight_column {
                    Some(column) => column[respondent].as_f64(),
                    None => Some(1.0),
                }
            })
            .collect();

        let included = self.weights.iter().filter(|w| w.is_some()).count();
        log::debug!(
            "crosstab: {} of {} respondents included",
            included,
            respondents
        );
    }

    fn columns_for<S: AsRef<str>>(&self, ids: &[S]) -> Vec<&'a [DataValue]> {
        let dataset = self.dataset;
        ids.iter()
            .filter_map(|id| dataset.column(id.as_ref()))
            .collect()
    }

    fn build_caches(&self, groups: &[GroupSpec]) -> Vec<GroupKeyCache> {
        groups
            .iter()
            .map(|group| {
                let columns = self.columns_for(group.ids());
                GroupKeyCache::build(group, &columns, &self.weights)
            })
            .collect()
    }

    fn accumulate(&mut self) {
        let row_groups = self.row_caches.len();
        let col_groups = self.col_caches.len();

        self.sub_tables = vec![FxHashMap::default(); row_groups * col_groups];
        self.bases = vec![FxHashMap::default(); col_groups];
        self.totals = vec![FxHashMap::default(); row_groups];
        self.row_seen = self.row_caches.iter().map(|c| vec![false; c.len()]).collect();
        self.total_weight = 0.0;

        for (respondent, weight) in self.weights.iter().enumerate() {
            let Some(weight) = *weight else { continue };
            self.total_weight += weight;

            for (j, cache) in self.col_caches.iter().enumerate() {
                if let Some(col_key) = cache.key_of(respondent) {
                    *self.bases[j].entry(col_key).or_insert(0.0) += weight;
                }
            }

            for (i, row_cache) in self.row_caches.iter().enumerate() {
                let Some(row_key) = row_cache.key_of(respondent) else { continue };

                if self.options.column_total {
                    *self.totals[i].entry(row_key).or_insert(0.0) += weight;
                    self.row_seen[i][row_key as usize] = true;
                }

                for (j, col_cache) in self.col_caches.iter().enumerate() {
                    if let Some(col_key) = col_cache.key_of(respondent) {
                        *self.sub_tables[i * col_groups + j]
                            .entry((row_key, col_key))
                            .or_insert(0.0) += weight;
                        self.row_seen[i][row_key as usize] = true;
                    }
                }
            }
        }

        log::debug!(
            "crosstab: accumulated {} sub-table(s), total weight {}",
            self.sub_tables.len(),
            self.total_weight
        );
    }

    fn layout_columns(&self) -> Vec<AxisEntry> {
        let mut columns = Vec::new();
        if self.options.column_total {
            columns.push(AxisEntry {
                slot: Slot::Total,
                key: total_key(),
            });
        }
        for (group, cache) in self.col_caches.iter().enumerate() {
            for key in cache.sorted_ids() {
                columns.push(AxisEntry {
                    slot: Slot::Data { group, key },
                    key: cache.key(key).clone(),
                });
            }
        }
        columns
    }

    fn layout_rows(&self) -> Vec<AxisEntry> {
        let mut rows = Vec::new();
        for (group, cache) in self.row_caches.iter().enumerate() {
            for key in cache.sorted_ids() {
                if self.row_seen[group][key as usize] {
                    rows.push(AxisEntry {
                        slot: Slot::Data { group, key },
                        key: cache.key(key).clone(),
                    });
                }
            }
        }
        rows.push(AxisEntry {
            slot: Slot::Base,
            key: base_key(),
        });
        rows
    }

    fn cell_value(&self, row: Slot, column: Slot) -> Option<f64> {
        let col_groups = self.col_caches.len();
        match (row, column) {
            (Slot::Base, Slot::Total) => Some(self.total_weight),
            (Slot::Base, Slot::Data { group, key }) => self.bases[group].get(&key).copied(),
            (Slot::Data { group, key }, Slot::Total) => self.totals[group].get(&key).copied(),
            (
                Slot::Data { group: i, key: row_key },
                Slot::Data { group: j, key: col_key },
            ) => self.sub_tables[i * col_groups + j]
                .get(&(row_key, col_key))
                .copied(),
            // Total and Base only appear on their own axis
            (Slot::Total, _) | (_, Slot::Base) => None,
        }
    }

    fn assemble(mut self) -> CrosstabResult {
        let rows = self.layout_rows();
        let columns = self.layout_columns();

        let (rows, row_paths) = self.decode_axis(rows);
        let (columns, column_paths) = self.decode_axis(columns);

        let cells: Vec<Vec<Option<f64>>> = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| self.cell_value(row.slot, column.slot))
                    .collect()
            })
            .collect();

        let row_labels = labels(&rows, row_paths);
        let column_labels = labels(&columns, column_paths);

        log::debug!(
            "crosstab: assembled {} row(s) x {} column(s)",
            row_labels.len(),
            column_labels.len()
        );

        CrosstabResult {
            rows: row_labels,
            columns: column_labels,
            cells,
            statistic: StatisticType::Count,
            metadata: TableMetadata::from(self.options),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    /// Decodes every entry's key, dropping (and reporting) entries whose key
    /// cannot be decoded, then pads the surviving paths.
    fn decode_axis(
        &mut self,
        entries: Vec<AxisEntry>,
    ) -> (Vec<AxisEntry>, Vec<Vec<LabelPair>>) {
        let mut kept = Vec::with_capacity(entries.len());
        let mut paths = Vec::with_capacity(entries.len());

        for entry in entries {
            match entry.key.decode() {
                Ok(path) => {
                    paths.push(path);
                    kept.push(entry);
                }
                Err(err) => self.warn(CrosstabWarning::UndecodableKey {
                    key: entry.key.to_string(),
                    reason: err.to_string(),
                }),
            }
        }

        (kept, equalize_size(paths))
    }
}

fn labels(entries: &[AxisEntry], paths: Vec<Vec<LabelPair>>) -> Vec<AxisLabel> {
    entries
        .iter()
        .zip(paths)
        .map(|(entry, path)| AxisLabel {
            path,
            kind: entry.kind(),
            statistic: StatisticType::Count,
        })
        .collect()
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Builds a weighted crosstab for a TableSpec.
/// This is the main entry point for the calculation engine.
pub fn build_crosstab(
    dataset: &Dataset,
    spec: &TableSpec,
    options: &CrosstabOptions,
) -> Result<CrosstabResult, CrosstabError> {
    CrosstabCalculator::new(dataset, spec, options).calculate()
}

/// Parses a `rows by columns [by additional]` expression and builds its crosstab.
/// Warnings raised while parsing are carried on the result.
pub fn build_crosstab_from_expression(
    dataset: &Dataset,
    expression: &str,
    options: &CrosstabOptions,
) -> Result<CrosstabResult, CrosstabError> {
    let (spec, spec_warnings) = parser::parse_with_warnings(expression)?;
    let mut result = build_crosstab(dataset, &spec, options)?;

    // Parser warnings come first; they describe the request itself.
    let mut warnings: Vec<CrosstabWarning> =
        spec_warnings.into_iter().map(CrosstabWarning::from).collect();
    warnings.append(&mut result.warnings);
    result.warnings = warnings;
    Ok(result)
}
