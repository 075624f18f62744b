//! Error types for the algorithm engines
//!
//! Almost every invalid request is a silent no-op: the engine refuses it
//! before touching any state and reports `false`/`None`. The exceptions are
//! the expression engine, whose malformed input is fatal for the conversion or
//! evaluation in progress, and polynomial products that leave the integer
//! range. Both are reported through [`EngineError`].

use thiserror::Error;

/// Fatal errors raised by the expression and polynomial engines
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Nothing to convert or evaluate
    #[error("Empty expression")]
    EmptyExpression,

    /// A binary operator found fewer than two operands on the stack
    #[error("Invalid postfix expression: operator '{operator}' at position {position} needs two operands, found {available}")]
    StackUnderflow {
        operator: char,
        position: usize,
        available: usize,
    },

    /// Evaluation finished with more (or fewer) than one value on the stack
    #[error("Invalid postfix expression: {count} values left on the stack")]
    LeftoverOperands { count: usize },

    /// An operand token that does not parse as a number
    #[error("Invalid operand '{token}' at position {position}")]
    InvalidOperand { token: String, position: usize },

    /// A token in operator position that is not one of `+ - * / ^`
    #[error("Unknown operator '{token}' at position {position}")]
    UnknownOperator { token: String, position: usize },

    /// `)` without a matching `(`, or `(` never closed
    #[error("Mismatched parenthesis at position {position}")]
    MismatchedParenthesis { position: usize },

    /// The product of two terms does not fit a coefficient or exponent
    #[error("Multiplying {left} by {right} overflows")]
    TermOverflow { left: String, right: String },

    /// Combining like terms pushed a coefficient out of range
    #[error("Coefficient of x^{exponent} overflows")]
    CoefficientOverflow { exponent: u32 },
}

impl EngineError {
    /// Token position the error refers to, when there is one
    pub fn position(&self) -> Option<usize> {
        match self {
            EngineError::StackUnderflow { position, .. }
            | EngineError::InvalidOperand { position, .. }
            | EngineError::UnknownOperator { position, .. }
            | EngineError::MismatchedParenthesis { position } => Some(*position),
            EngineError::EmptyExpression
            | EngineError::LeftoverOperands { .. }
            | EngineError::TermOverflow { .. }
            | EngineError::CoefficientOverflow { .. } => None,
        }
    }
}
