//! FILENAME: core/parser/src/parser.rs
//! PURPOSE: Recursive descent parser that converts a stream of Tokens into an AST.
//! CONTEXT: This is the second stage of the parsing pipeline. It takes tokens
//! from the Lexer and builds a GroupExpr tree for one expression segment.
//!
//! GRAMMAR:
//!   segment  --> add EOF
//!   add      --> cross ( "+" cross )*
//!   cross    --> atom ( ">" atom )*
//!   atom     --> IDENTIFIER | "(" add ")"

use crate::ast::GroupExpr;
use crate::lexer::Lexer;
use crate::token::Token;

/// Parser errors with descriptive messages.
#[derive(Debug, PartialEq, Clone)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;

/// The Parser struct holds the lexer and current token state.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current_token: Token,
    /// Open parentheses not yet closed, used for error messages.
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser from a segment string.
    /// Automatically advances to the first token.
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token();
        Parser {
            lexer,
            current_token,
            depth: 0,
        }
    }

    /// Parses the entire segment and returns the AST.
    pub fn parse(&mut self) -> ParseResult<GroupExpr> {
        if self.current_token == Token::EOF {
            return Err(ParseError::new("Empty expression"));
        }

        let expr = self.parse_add()?;

        match &self.current_token {
            Token::EOF => Ok(expr),
            Token::RParen => Err(ParseError::new("Unbalanced ')' without matching '('")),
            token => Err(ParseError::new(format!(
                "Unexpected token after expression: {}",
                token
            ))),
        }
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        self.current_token = self.lexer.next_token();
    }

    /// Parses stacked groups (+).
    fn parse_add(&mut self) -> ParseResult<GroupExpr> {
        let mut items = vec![self.parse_cross()?];

        while self.current_token == Token::Plus {
            self.advance();
            items.push(self.parse_cross()?);
        }

        Ok(collapse(items, GroupExpr::Add))
    }

    /// Parses drill-down chains (>).
    fn parse_cross(&mut self) -> ParseResult<GroupExpr> {
        let mut items = vec![self.parse_atom()?];

        while self.current_token == Token::GreaterThan {
            self.advance();
            items.push(self.parse_atom()?);
        }

        Ok(collapse(items, GroupExpr::Nest))
    }

    /// Parses a variable or a parenthesized sub-expression.
    fn parse_atom(&mut self) -> ParseResult<GroupExpr> {
        match self.current_token.clone() {
            Token::Identifier(name) => {
                self.advance();
                Ok(GroupExpr::Variable(name))
            }

            Token::LParen => {
                self.advance();
                self.depth += 1;
                let inner = self.parse_add()?;
                if self.current_token != Token::RParen {
                    return Err(ParseError::new(format!(
                        "Expected ')' to close group at depth {}, found {}",
                        self.depth, self.current_token
                    )));
                }
                self.advance();
                self.depth -= 1;
                Ok(GroupExpr::Group(Box::new(inner)))
            }

            Token::By => Err(ParseError::new(
                "Reserved keyword 'by' cannot be used as a variable name",
            )),

            Token::EOF if self.depth > 0 => Err(ParseError::new(format!(
                "Unexpected end of expression: {} unclosed '('",
                self.depth
            ))),

            Token::EOF => Err(ParseError::new("Unexpected end of expression")),

            Token::Illegal(ch) => Err(ParseError::new(format!("Illegal character: {}", ch))),

            token => Err(ParseError::new(format!("Unexpected token: {}", token))),
        }
    }
}

/// Single-item chains and sums are just their item.
fn collapse(mut items: Vec<GroupExpr>, wrap: fn(Vec<GroupExpr>) -> GroupExpr) -> GroupExpr {
    if items.len() == 1 {
        items.remove(0)
    } else {
        wrap(items)
    }
}

/// Convenience function to parse one segment directly.
pub fn parse_segment(input: &str) -> ParseResult<GroupExpr> {
    let mut parser = Parser::new(input);
    parser.parse()
}
