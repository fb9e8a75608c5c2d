//! FILENAME: core/parser/src/tests.rs
//! PURPOSE: Consolidated unit tests for the parser crate.

use crate::ast::GroupExpr;
use crate::error::{SpecError, SpecWarning};
use crate::expand::expand;
use crate::lexer::Lexer;
use crate::parser::parse_segment;
use crate::segments::{parse, parse_strict, parse_with_warnings, split_segments};
use crate::table_spec::{Axis, GroupSpec, TableSpec};
use crate::token::Token;

fn groups(ids: &[&[&str]]) -> Vec<GroupSpec> {
    ids.iter().map(|g| GroupSpec::new(g.iter().copied())).collect()
}

// ========================================
// LEXER TESTS
// ========================================

#[test]
fn lexer_tokenizes_operators() {
    let mut lexer = Lexer::new("( q1 + q2 ) > q3");

    assert_eq!(lexer.next_token(), Token::LParen);
    assert_eq!(lexer.next_token(), Token::Identifier("q1".to_string()));
    assert_eq!(lexer.next_token(), Token::Plus);
    assert_eq!(lexer.next_token(), Token::Identifier("q2".to_string()));
    assert_eq!(lexer.next_token(), Token::RParen);
    assert_eq!(lexer.next_token(), Token::GreaterThan);
    assert_eq!(lexer.next_token(), Token::Identifier("q3".to_string()));
    assert_eq!(lexer.next_token(), Token::EOF);
}

#[test]
fn lexer_keeps_dots_underscores_and_leading_digits() {
    let tokens = Lexer::new("a1_2 wave.2020 1q").tokenize();
    assert_eq!(
        tokens,
        vec![
            Token::Identifier("a1_2".to_string()),
            Token::Identifier("wave.2020".to_string()),
            Token::Identifier("1q".to_string()),
            Token::EOF,
        ]
    );
}

#[test]
fn lexer_recognizes_keyword_in_any_case() {
    let tokens = Lexer::new("by BY bY By").tokenize();
    assert_eq!(
        tokens,
        vec![Token::By, Token::By, Token::By, Token::By, Token::EOF]
    );
}

#[test]
fn lexer_does_not_treat_prefix_as_keyword() {
    let mut lexer = Lexer::new("byte by_1 q.by");
    assert_eq!(lexer.next_token(), Token::Identifier("byte".to_string()));
    assert_eq!(lexer.next_token(), Token::Identifier("by_1".to_string()));
    assert_eq!(lexer.next_token(), Token::Identifier("q.by".to_string()));
}

#[test]
fn lexer_reports_illegal_characters() {
    let mut lexer = Lexer::new("q1 * q2");
    assert_eq!(lexer.next_token(), Token::Identifier("q1".to_string()));
    assert_eq!(lexer.next_token(), Token::Illegal('*'));
}

// ========================================
// PARSER TESTS - AST
// ========================================

#[test]
fn parser_parses_single_variable() {
    assert_eq!(parse_segment("q1").unwrap(), GroupExpr::variable("q1"));
}

#[test]
fn parser_builds_nest_and_add() {
    let expr = parse_segment("q1 + q2 > q3").unwrap();
    assert_eq!(
        expr,
        GroupExpr::Add(vec![
            GroupExpr::variable("q1"),
            GroupExpr::Nest(vec![GroupExpr::variable("q2"), GroupExpr::variable("q3")]),
        ])
    );
}

#[test]
fn parser_keeps_parenthesized_groups() {
    let expr = parse_segment("(q2 + q3) > q4").unwrap();
    assert_eq!(
        expr,
        GroupExpr::Nest(vec![
            GroupExpr::Group(Box::new(GroupExpr::Add(vec![
                GroupExpr::variable("q2"),
                GroupExpr::variable("q3"),
            ]))),
            GroupExpr::variable("q4"),
        ])
    );
    assert_eq!(expr.to_string(), "(q2 + q3) > q4");
    assert_eq!(expr.variables(), vec!["q2", "q3", "q4"]);
}

#[test]
fn parser_rejects_empty_segment() {
    let err = parse_segment("   ").unwrap_err();
    assert!(err.message.contains("Empty"));
}

#[test]
fn parser_rejects_unclosed_paren() {
    let err = parse_segment("(q1 + q2").unwrap_err();
    assert!(err.message.contains("')'"), "{}", err.message);
}

#[test]
fn parser_rejects_unopened_paren() {
    let err = parse_segment("q1 + q2)").unwrap_err();
    assert!(err.message.contains("Unbalanced"), "{}", err.message);
}

#[test]
fn parser_rejects_dangling_operator() {
    assert!(parse_segment("q1 +").is_err());
    assert!(parse_segment("> q1").is_err());
    assert!(parse_segment("q1 q2").is_err());
    assert!(parse_segment("()").is_err());
}

#[test]
fn parser_rejects_keyword_as_variable() {
    let err = parse_segment("q1 + by").unwrap_err();
    assert!(err.message.contains("Reserved keyword"));
}

// ========================================
// EXPANSION TESTS
// ========================================

#[test]
fn expand_single_variable_is_singleton_group() {
    assert_eq!(expand(&GroupExpr::variable("q1")), groups(&[&["q1"]]));
}

#[test]
fn expand_nested_group_inside_chain_is_flattened() {
    let expr = parse_segment("(q1 > q2) > q3").unwrap();
    assert_eq!(expand(&expr), groups(&[&["q1", "q2", "q3"]]));
}

#[test]
fn expand_multiplies_every_multi_valued_slot() {
    let expr = parse_segment("(a + b) > x > (c + d + e)").unwrap();
    assert_eq!(
        expand(&expr),
        groups(&[
            &["a", "x", "c"],
            &["a", "x", "d"],
            &["a", "x", "e"],
            &["b", "x", "c"],
            &["b", "x", "d"],
            &["b", "x", "e"],
        ])
    );
}

#[test]
fn expand_group_of_chains_inside_chain() {
    let expr = parse_segment("(a > b + c) > d").unwrap();
    assert_eq!(expand(&expr), groups(&[&["a", "b", "d"], &["c", "d"]]));
}

// ========================================
// SEGMENT SPLITTING
// ========================================

#[test]
fn split_segments_is_case_insensitive() {
    assert_eq!(split_segments("q1 BY q2 By q3"), vec!["q1", "q2", "q3"]);
}

#[test]
fn split_segments_requires_surrounding_spaces() {
    assert_eq!(split_segments("q1by q2"), vec!["q1by q2"]);
    assert_eq!(split_segments("byte by q2"), vec!["byte", "q2"]);
}

#[test]
fn split_segments_does_not_overlap() {
    assert_eq!(split_segments("a by by b"), vec!["a", "by b"]);
}

// ========================================
// TOP-LEVEL PARSE
// ========================================

#[test]
fn parse_simple() {
    let spec = parse("q1 by q2").unwrap();
    assert_eq!(spec.rows, groups(&[&["q1"]]));
    assert_eq!(spec.columns, groups(&[&["q2"]]));
    assert_eq!(spec.additional_axis, None);
}

#[test]
fn parse_simple_pads() {
    let spec = parse("q1 by (q2)").unwrap();
    assert_eq!(spec.rows, groups(&[&["q1"]]));
    assert_eq!(spec.columns, groups(&[&["q2"]]));
}

#[test]
fn parse_plus() {
    let spec = parse("q1 by q2 + q3").unwrap();
    assert_eq!(spec.columns, groups(&[&["q2"], &["q3"]]));
}

#[test]
fn parse_plus_pads() {
    let spec = parse("q1 by (q2 + q3)").unwrap();
    assert_eq!(spec.columns, groups(&[&["q2"], &["q3"]]));
}

#[test]
fn parse_simple_cross() {
    let spec = parse("q1 by q2 > q3").unwrap();
    assert_eq!(spec.columns, groups(&[&["q2", "q3"]]));

    let spec = parse("q1 by (q2 > q3)").unwrap();
    assert_eq!(spec.columns, groups(&[&["q2", "q3"]]));
}

#[test]
fn parse_cross_plus_pads() {
    let spec = parse("q1 by (q2 + q3) > q4").unwrap();
    assert_eq!(spec.columns, groups(&[&["q2", "q4"], &["q3", "q4"]]));
}

#[test]
fn parse_stacked_cross_plus_pads() {
    let spec = parse("q1 by q5 + (q2 + q3) > q4").unwrap();
    assert_eq!(spec.columns, groups(&[&["q5"], &["q2", "q4"], &["q3", "q4"]]));
}

#[test]
fn parse_multidim() {
    let spec = parse("q1 by q5 + (q2 + q3) > (q4 + q5) > q6 by q7").unwrap();
    assert_eq!(spec.rows, groups(&[&["q1"]]));
    assert_eq!(
        spec.columns,
        groups(&[
            &["q5"],
            &["q2", "q4", "q6"],
            &["q2", "q5", "q6"],
            &["q3", "q4", "q6"],
            &["q3", "q5", "q6"],
        ])
    );
    assert_eq!(spec.additional_axis, Some(groups(&[&["q7"]])));
}

#[test]
fn parse_stacked_rows() {
    let spec = parse("q1 + q2 > q3 by q4").unwrap();
    assert_eq!(spec.rows, groups(&[&["q1"], &["q2", "q3"]]));
}

#[test]
fn parse_is_deterministic() {
    let text = "a + (b + c) > d by (e + f) > g + h";
    assert_eq!(parse(text).unwrap(), parse(text).unwrap());
}

#[test]
fn parse_rejects_single_segment() {
    assert_eq!(parse("q1 + q2"), Err(SpecError::TooFewSegments(1)));
}

#[test]
fn parse_drops_segments_after_third() {
    let (spec, warnings) = parse_with_warnings("q1 by q2 by q3 by q4 by q5").unwrap();
    assert_eq!(spec.additional_axis, Some(groups(&[&["q3"]])));
    assert_eq!(
        warnings,
        vec![SpecWarning::ExtraSegmentsDropped {
            found: 5,
            dropped: vec!["q4".to_string(), "q5".to_string()],
        }]
    );
}

#[test]
fn parse_strict_rejects_extra_segments() {
    assert_eq!(
        parse_strict("q1 by q2 by q3 by q4"),
        Err(SpecError::TooManySegments(4))
    );
    assert!(parse_strict("q1 by q2 by q3").is_ok());
}

#[test]
fn parse_error_names_the_segment() {
    match parse("q1 by (q2 + q3") {
        Err(SpecError::Parse { axis, segment, .. }) => {
            assert_eq!(axis, Axis::Columns);
            assert_eq!(segment, "(q2 + q3");
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn parse_rejects_keyword_collision() {
    // " by " splits first, so the stray keyword lands inside the column segment.
    let err = parse("q1 by by").unwrap_err();
    assert!(matches!(err, SpecError::Parse { axis: Axis::Columns, .. }));
}

#[test]
fn table_spec_lists_variables_once() {
    let spec = parse("q1 + q2 > q1 by q3 > q2 by q4").unwrap();
    assert_eq!(spec.variable_ids(), vec!["q1", "q2", "q3", "q4"]);
    assert_eq!(spec.row_variable_ids(), vec!["q1", "q2"]);
}

#[test]
fn table_spec_can_be_built_directly() {
    let spec = TableSpec::new(groups(&[&["q1"]]), groups(&[&["q2"], &["q3", "q4"]]))
        .with_additional_axis(groups(&[&["q5"]]));
    assert_eq!(spec.groups(Axis::Columns).len(), 2);
    assert_eq!(spec.groups(Axis::AdditionalAxis)[0].ids(), ["q5".to_string()]);
}
