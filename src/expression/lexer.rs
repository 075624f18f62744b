//! Tokenizer for arithmetic expressions
//!
//! Whitespace is removed before scanning. The five operator characters and the
//! two parentheses are single-character tokens; every other run of characters
//! between them is one operand. There is no unary minus, so `-3` lexes as an
//! operator followed by an operand.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Operand,
    Operator,
    Parenthesis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
}

impl Token {
    pub fn operand(value: impl Into<String>) -> Self {
        Token {
            kind: TokenKind::Operand,
            value: value.into(),
        }
    }

    pub fn operator(op: char) -> Self {
        Token {
            kind: TokenKind::Operator,
            value: op.to_string(),
        }
    }

    pub fn parenthesis(paren: char) -> Self {
        Token {
            kind: TokenKind::Parenthesis,
            value: paren.to_string(),
        }
    }

    pub fn is_open_paren(&self) -> bool {
        self.kind == TokenKind::Parenthesis && self.value == "("
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Space separated token values, e.g. `3 4 2 * +`
pub fn join(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.value.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn is_operator_char(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '^')
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().filter(|c| !c.is_whitespace()).collect(),
            position: 0,
        }
    }

    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(c) = self.peek() {
            if is_operator_char(c) {
                self.position += 1;
                tokens.push(Token::operator(c));
            } else if c == '(' || c == ')' {
                self.position += 1;
                tokens.push(Token::parenthesis(c));
            } else {
                tokens.push(self.operand());
            }
        }
        tokens
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn operand(&mut self) -> Token {
        let start = self.position;
        while let Some(c) = self.peek() {
            if is_operator_char(c) || c == '(' || c == ')' {
                break;
            }
            self.position += 1;
        }
        Token::operand(self.input[start..self.position].iter().collect::<String>())
    }
}

/// Tokenize `input` in one call
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize()
}
