//! FILENAME: core/parser/src/token.rs
//! PURPOSE: Token definitions for the table-expression lexer.
//! CONTEXT: Tokens are the atomic units produced by the lexer and consumed by the parser.

/// Tokens recognized by the table-expression lexer.
#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    /// Variable name: a run of letters, digits, '_' and '.'.
    Identifier(String),
    /// The reserved axis keyword "by" (any case). Only valid between segments,
    /// so seeing it inside a segment is always an error.
    By,

    // Operators
    Plus,
    GreaterThan,

    // Delimiters
    LParen,
    RParen,

    // Special
    EOF,
    Illegal(char),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Identifier(s) => write!(f, "{}", s),
            Token::By => write!(f, "by"),
            Token::Plus => write!(f, "+"),
            Token::GreaterThan => write!(f, ">"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::EOF => write!(f, "EOF"),
            Token::Illegal(c) => write!(f, "ILLEGAL({})", c),
        }
    }
}
