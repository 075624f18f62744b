//! Infix to postfix conversion and postfix evaluation
//!
//! Two stack machines over the same token stream:
//! - [`InfixConverter`] runs the shunting-yard algorithm, recording one step
//!   per stack or output mutation.
//! - [`PostfixEvaluator`] runs the evaluation stack, recording the operands
//!   popped for each operator and the result pushed back.
//!
//! Both animate their traces and refuse new work while one is playing. Both
//! highlight the position of the token being processed.

pub mod convert;
pub mod evaluate;
pub mod lexer;

use serde::Serialize;
use std::fmt;

pub use convert::{ConversionState, InfixConverter};
pub use evaluate::{EvaluationState, PostfixEvaluator};
pub use lexer::{join, tokenize, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Associativity {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '*' => Some(Operator::Multiply),
            '/' => Some(Operator::Divide),
            '^' => Some(Operator::Power),
            _ => None,
        }
    }

    /// Parse an operator token; `None` for anything but a single operator
    /// character
    pub fn from_token(token: &Token) -> Option<Self> {
        if token.kind != TokenKind::Operator {
            return None;
        }
        let mut chars = token.value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
            Operator::Power => '^',
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Subtract => 1,
            Operator::Multiply | Operator::Divide => 2,
            Operator::Power => 3,
        }
    }

    pub fn associativity(self) -> Associativity {
        match self {
            Operator::Power => Associativity::Right,
            _ => Associativity::Left,
        }
    }

    /// Whether `top`, sitting on the operator stack, must be popped before
    /// `self` is pushed
    pub fn yields_to(self, top: Operator) -> bool {
        match self.associativity() {
            Associativity::Left => top.precedence() >= self.precedence(),
            Associativity::Right => top.precedence() > self.precedence(),
        }
    }

    /// IEEE semantics: division by zero gives an infinity, not an error
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Operator::Add => a + b,
            Operator::Subtract => a - b,
            Operator::Multiply => a * b,
            Operator::Divide => a / b,
            Operator::Power => a.powf(b),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Render a value the way the step messages show it: integral values without
/// a fraction, infinities spelled out
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        format!("{}", value)
    }
}
