//! FILENAME: core/parser/src/lexer.rs
//! PURPOSE: Scans one expression segment and produces a stream of Tokens.
//! CONTEXT: This is the first stage of the parsing pipeline. It handles
//! whitespace skipping, variable names and the reserved "by" keyword.
//!
//! SUPPORTED OPERATORS:
//! - Single char: + > ( )

use crate::token::Token;
use std::iter::Peekable;
use std::str::Chars;

pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input: input.chars().peekable(),
        }
    }

    /// Advances the lexer and returns the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        match self.input.next() {
            Some('+') => Token::Plus,
            Some('>') => Token::GreaterThan,
            Some('(') => Token::LParen,
            Some(')') => Token::RParen,

            // Variable names may start with any name character, digits included
            // ("1q" and "2020.wave" are valid ids).
            Some(ch) if is_name_char(ch) => self.read_identifier(ch),

            None => Token::EOF,

            Some(ch) => Token::Illegal(ch),
        }
    }

    /// Collects every remaining token, including the trailing EOF.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token == Token::EOF;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.input.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.input.next();
        }
    }

    fn read_identifier(&mut self, first_char: char) -> Token {
        let mut ident = String::from(first_char);

        while let Some(&ch) = self.input.peek() {
            if is_name_char(ch) {
                ident.push(ch);
                self.input.next();
            } else {
                break;
            }
        }

        // The keyword is decided on the whole word, so "byte" or "by_1" stay names.
        if ident.eq_ignore_ascii_case("by") {
            Token::By
        } else {
            Token::Identifier(ident)
        }
    }
}

/// Returns true if `ch` can appear in a variable name.
fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '.'
}
