//! FILENAME: core/parser/src/lib.rs
//! PURPOSE: Library root for the table-expression parser.
//! CONTEXT: This module exposes the lexer, parser, AST and expansion components
//! needed to convert a table description such as `q1 by q2 + q3 > q4` into
//! row/column/additional-axis variable groups.
//!
//! PIPELINE: Text --> split on " by " --> Lexer --> Tokens --> Parser --> AST --> expand --> TableSpec
//!
//! SUPPORTED FEATURES:
//! - Variables: letters, digits, '_' and '.'
//! - Stacking: q1 + q2
//! - Nesting (drill-down): q1 > q2
//! - Parentheses for alternatives: (q1 + q2) > q3
//! - Up to three axes: rows by columns by additional axis

pub mod ast;
pub mod error;
pub mod expand;
pub mod lexer;
pub mod parser;
pub mod segments;
pub mod table_spec;
pub mod token;

// Register the separate tests module
#[cfg(test)]
mod tests;

// Re-export commonly used types for convenience
pub use ast::GroupExpr;
pub use error::{SpecError, SpecWarning};
pub use expand::expand;
pub use lexer::Lexer;
pub use parser::{parse_segment, ParseError, ParseResult, Parser};
pub use segments::{parse, parse_strict, parse_with_warnings, split_segments};
pub use table_spec::{Axis, GroupSpec, TableSpec};
pub use token::Token;
