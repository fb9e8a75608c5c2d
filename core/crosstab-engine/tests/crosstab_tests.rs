//! FILENAME: tests/crosstab_tests.rs
//! Integration tests for the crosstab pipeline, from expression text to labelled table.

use crosstab_engine::{
    build_crosstab, build_crosstab_from_expression, CrosstabError, CrosstabOptions,
    CrosstabResult, CrosstabWarning, EntryKind, StatisticType, BASE_MARKER, TOTAL_MARKER,
};
use parser::{parse, Axis, SpecError};
use survey::{DataValue, Dataset, SurveyStructure, VariableDefinition};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn n(value: f64) -> DataValue {
    DataValue::Number(value)
}

fn m() -> DataValue {
    DataValue::Missing
}

/// Six respondents: gender, age band, a two-option brand checkbox and a weight.
/// The last respondent skipped the gender question.
fn create_survey_dataset() -> Dataset {
    Dataset::from_rows(
        &["gender", "age", "b_1", "b_2", "w"],
        vec![
            vec![n(1.0), n(1.0), n(1.0), m(), n(1.0)],
            vec![n(1.0), n(2.0), n(1.0), n(1.0), n(2.0)],
            vec![n(2.0), n(1.0), m(), n(1.0), n(1.0)],
            vec![n(2.0), n(2.0), n(1.0), m(), n(0.5)],
            vec![n(2.0), n(1.0), m(), m(), n(1.5)],
            vec![m(), n(2.0), n(1.0), n(1.0), n(1.0)],
        ],
    )
    .unwrap()
}

fn create_survey_structure() -> SurveyStructure {
    SurveyStructure::from_list(vec![
        VariableDefinition::new("gender")
            .with_label("Gender")
            .with_value("1", "Male")
            .with_value("2", "Female"),
        VariableDefinition::new("age")
            .with_label("Age band")
            .with_value("1", "18-34")
            .with_value("2", "35+"),
        VariableDefinition::new("b_1")
            .with_label("Brand A")
            .with_value("1", "Selected"),
        VariableDefinition::new("b_2")
            .with_label("Brand B")
            .with_value("1", "Selected"),
    ])
}

fn cell_at(result: &CrosstabResult, row: &[&str], column: &[&str]) -> Option<f64> {
    let row = result.find_row(row).expect("row exists");
    let column = result.find_column(column).expect("column exists");
    result.cell(row, column)
}

fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("cell has a value");
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

// ============================================================================
// COUNTS AND BASES
// ============================================================================

#[test]
fn test_unweighted_table_with_total_column() {
    let dataset = create_survey_dataset();
    let result =
        build_crosstab_from_expression(&dataset, "gender by age", &CrosstabOptions::default())
            .unwrap();

    assert_eq!(result.columns[0].kind, EntryKind::Total);
    assert_eq!(result.row_count(), 3);
    assert_eq!(result.column_count(), 3);

    assert_eq!(cell_at(&result, &["gender", "1"], &[TOTAL_MARKER]), Some(2.0));
    assert_eq!(cell_at(&result, &["gender", "1"], &["age", "1"]), Some(1.0));
    assert_eq!(cell_at(&result, &["gender", "2"], &["age", "1"]), Some(2.0));
    assert_eq!(cell_at(&result, &["gender", "2"], &["age", "2"]), Some(1.0));

    // The respondent without a gender answer counts nowhere
    assert_eq!(
        result.base_row(),
        Some(&[Some(5.0), Some(3.0), Some(2.0)][..])
    );
}

#[test]
fn test_weighted_table() {
    let dataset = create_survey_dataset();
    let options = CrosstabOptions::new().with_weight("w");
    let result = build_crosstab_from_expression(&dataset, "gender by age", &options).unwrap();

    assert_close(cell_at(&result, &["gender", "1"], &[TOTAL_MARKER]), 3.0);
    assert_close(cell_at(&result, &["gender", "1"], &["age", "2"]), 2.0);
    assert_close(cell_at(&result, &["gender", "2"], &["age", "1"]), 2.5);
    assert_close(cell_at(&result, &["gender", "2"], &["age", "2"]), 0.5);

    let base = result.base_row().unwrap();
    assert_close(base[0], 6.0);
    assert_close(base[1], 3.5);
    assert_close(base[2], 2.5);
}

#[test]
fn test_stacked_columns_have_their_own_bases() {
    let dataset = create_survey_dataset();
    let options = CrosstabOptions::new().with_column_total(false);
    let result = build_crosstab_from_expression(&dataset, "gender by age + b_1", &options).unwrap();

    let columns: Vec<Vec<&str>> = result.columns.iter().map(|c| c.flatten()).collect();
    assert_eq!(
        columns,
        vec![vec!["age", "1"], vec!["age", "2"], vec!["b_1", "1"]]
    );
    assert_eq!(cell_at(&result, &["gender", "1"], &["b_1", "1"]), Some(2.0));
    assert_eq!(cell_at(&result, &["gender", "2"], &["b_1", "1"]), Some(1.0));
    assert_eq!(
        result.base_row(),
        Some(&[Some(3.0), Some(2.0), Some(3.0)][..])
    );
}

#[test]
fn test_stacked_rows_widen_inclusion() {
    let dataset = create_survey_dataset();
    let result = build_crosstab_from_expression(
        &dataset,
        "gender + age by b_1 + b_2",
        &CrosstabOptions::default(),
    )
    .unwrap();

    let kinds: Vec<EntryKind> = result.rows.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EntryKind::Data { group: 0 },
            EntryKind::Data { group: 0 },
            EntryKind::Data { group: 1 },
            EntryKind::Data { group: 1 },
            EntryKind::Base,
        ]
    );

    // The respondent without gender answered age, so it is included here
    assert_eq!(cell_at(&result, &["age", "2"], &["b_2", "1"]), Some(2.0));
    assert_eq!(
        result.base_row(),
        Some(&[Some(6.0), Some(4.0), Some(3.0)][..])
    );
}

#[test]
fn test_nested_columns_and_label_padding() {
    let dataset = create_survey_dataset();
    let result =
        build_crosstab_from_expression(&dataset, "gender by age + age > b_1", &CrosstabOptions::default())
            .unwrap();

    assert!(result.columns.iter().all(|c| c.path.len() == 2));
    assert!(result.rows.iter().all(|r| r.path.len() == 1));
    assert_eq!(result.columns[0].flatten(), vec![TOTAL_MARKER, "", "", ""]);
    assert_eq!(result.columns[1].flatten(), vec!["age", "1", "", ""]);
    assert_eq!(result.columns[1].depth(), 1);

    let nested = result.column_group(1);
    let nested: Vec<Vec<&str>> = nested.iter().map(|&i| result.columns[i].flatten()).collect();
    assert_eq!(
        nested,
        vec![vec!["age", "1", "b_1", "1"], vec!["age", "2", "b_1", "1"]]
    );
    assert_eq!(
        cell_at(&result, &["gender", "2"], &["age", "2", "b_1", "1"]),
        Some(1.0)
    );
    assert_eq!(cell_at(&result, &["gender", "2"], &["age", "1", "b_1", "1"]), None);
}

#[test]
fn test_base_row_closes_every_table() {
    let dataset = create_survey_dataset();
    for expression in [
        "gender by age",
        "gender + age by b_1",
        "gender > age by (b_1 + b_2) > age",
    ] {
        let result =
            build_crosstab_from_expression(&dataset, expression, &CrosstabOptions::default())
                .unwrap();
        let last = result.rows.last().unwrap();
        assert!(last.is_base(), "{}", expression);
        assert_eq!(last.path[0], (BASE_MARKER.to_string(), "$COUNT$".to_string()));
        assert_eq!(result.rows.iter().filter(|r| r.is_base()).count(), 1);
        assert_eq!(result.base_row_index(), Some(result.row_count() - 1));
    }
}

// ============================================================================
// COLUMN PERCENTAGES
// ============================================================================

#[test]
fn test_column_percentages() {
    let dataset = create_survey_dataset();
    let options = CrosstabOptions::new().with_weight("w");
    let counts = build_crosstab_from_expression(&dataset, "gender by age", &options).unwrap();
    let cpct = counts.as_cpct().unwrap();

    assert_eq!(cpct.statistic, StatisticType::ColumnPercent);
    assert_close(cell_at(&cpct, &["gender", "1"], &[TOTAL_MARKER]), 0.5);
    assert_close(cell_at(&cpct, &["gender", "1"], &["age", "1"]), 1.0 / 3.5);
    assert_close(cell_at(&cpct, &["gender", "2"], &["age", "2"]), 0.5 / 2.5);
    assert_eq!(cpct.base_row(), counts.base_row());

    assert!(matches!(cpct.as_cpct(), Err(CrosstabError::AlreadyConverted)));
}

#[test]
fn test_column_percentages_sum_to_one_per_column() {
    let dataset = create_survey_dataset();
    let cpct = build_crosstab_from_expression(&dataset, "gender by age", &CrosstabOptions::default())
        .unwrap()
        .as_cpct()
        .unwrap();

    let base_idx = cpct.base_row_index().unwrap();
    for column in 0..cpct.column_count() {
        let sum: f64 = (0..base_idx).filter_map(|row| cpct.cell(row, column)).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }
}

// ============================================================================
// LABELS
// ============================================================================

#[test]
fn test_display_labels_from_structure() {
    let dataset = create_survey_dataset();
    let structure = create_survey_structure().to_hierarchical(None);
    let result =
        build_crosstab_from_expression(&dataset, "gender by b_1", &CrosstabOptions::default())
            .unwrap();

    let rows = result.row_display_labels(&structure);
    assert_eq!(rows[0], vec!["Gender", "Male"]);
    assert_eq!(rows[1], vec!["Gender", "Female"]);

    // b_1 lives under the aggregated question "b"
    let columns = result.column_display_labels(&structure);
    assert_eq!(columns[0], vec![TOTAL_MARKER, ""]);
    assert_eq!(columns[1], vec!["Brand A", "Selected"]);
}

#[test]
fn test_display_labels_fall_back_to_raw_values() {
    let dataset = create_survey_dataset();
    let result =
        build_crosstab_from_expression(&dataset, "gender by age", &CrosstabOptions::default())
            .unwrap();

    let rows = result.row_display_labels(&SurveyStructure::new());
    assert_eq!(rows[0], vec!["gender", "1"]);
}

// ============================================================================
// CONFIGURATION AND ERRORS
// ============================================================================

#[test]
fn test_programmatic_spec_matches_expression() {
    let dataset = create_survey_dataset();
    let options = CrosstabOptions::default();
    let from_text = build_crosstab_from_expression(&dataset, "gender by age + b_1", &options).unwrap();
    let from_spec = build_crosstab(&dataset, &parse("gender by age + b_1").unwrap(), &options).unwrap();
    assert_eq!(from_text, from_spec);
}

#[test]
fn test_options_from_partial_json() {
    let options: CrosstabOptions =
        serde_json::from_str(r#"{"weight": "w", "title": "Brand use"}"#).unwrap();

    assert_eq!(options.weight.as_deref(), Some("w"));
    assert!(options.column_total);
    assert_eq!(options.statistics, vec![StatisticType::Count]);

    let dataset = create_survey_dataset();
    let result = build_crosstab_from_expression(&dataset, "gender by b_2", &options).unwrap();
    assert_eq!(result.metadata.title, "Brand use");
}

#[test]
fn test_dropped_segments_are_reported_on_result() {
    let dataset = create_survey_dataset();
    let result = build_crosstab_from_expression(
        &dataset,
        "gender by age by b_1 by b_2",
        &CrosstabOptions::default(),
    )
    .unwrap();

    assert_eq!(
        result.warnings,
        vec![
            CrosstabWarning::ExtraSegmentsDropped {
                found: 4,
                dropped: vec!["b_2".to_string()],
            },
            CrosstabWarning::AdditionalAxisUnsupported,
        ]
    );
    assert!(result.warnings[0].to_string().contains("b_2"));
}

#[test]
fn test_crosstab_on_deserialized_dataset() {
    let dataset = create_survey_dataset();
    let json = serde_json::to_string(&dataset).unwrap();
    let restored: Dataset = serde_json::from_str(&json).unwrap();

    let options = CrosstabOptions::new().with_weight("w");
    let expected = build_crosstab_from_expression(&dataset, "gender by age", &options).unwrap();
    let actual = build_crosstab_from_expression(&restored, "gender by age", &options).unwrap();
    assert_eq!(actual, expected);
}

#[test]
fn test_parse_error_is_reported_with_axis() {
    let dataset = create_survey_dataset();
    let err = build_crosstab_from_expression(&dataset, "gender by (age", &CrosstabOptions::default())
        .unwrap_err();

    match err {
        CrosstabError::Spec(SpecError::Parse { axis, .. }) => assert_eq!(axis, Axis::Columns),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_unknown_variable_aborts() {
    let dataset = create_survey_dataset();
    let err = build_crosstab_from_expression(&dataset, "gender by income", &CrosstabOptions::default())
        .unwrap_err();
    assert!(err.to_string().contains("income"));
}
