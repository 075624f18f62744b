// Shunting-yard conversion with a step per stack or output mutation

use super::lexer::{tokenize, Token, TokenKind};
use super::Operator;
use crate::constants::EXPRESSION_INTERVAL;
use crate::errors::EngineError;
use crate::snapshot::{Replay, Trace, Traced};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionState {
    pub stack: Vec<Token>,
    pub output: Vec<Token>,
    /// Token being processed; `None` while draining the stack at the end
    pub current: Option<Token>,
    pub position: usize,
}

struct Machine {
    stack: Vec<Token>,
    /// Token positions of the `(` entries on `stack`
    open_parens: Vec<usize>,
    output: Vec<Token>,
    steps: Trace<ConversionState, usize>,
}

impl Machine {
    fn record(&mut self, current: Option<&Token>, position: usize, message: String) {
        let state = ConversionState {
            stack: self.stack.clone(),
            output: self.output.clone(),
            current: current.cloned(),
            position,
        };
        self.steps.push(state, vec![position], message);
    }

    fn top_operator(&self) -> Option<Operator> {
        self.stack.last().and_then(Operator::from_token)
    }

    fn operator(&mut self, token: &Token, op: Operator, position: usize) {
        while let Some(top) = self.top_operator() {
            if !op.yields_to(top) {
                break;
            }
            if let Some(popped) = self.stack.pop() {
                self.output.push(popped);
            }
            self.record(
                Some(token),
                position,
                format!("Pop operator {} from stack to output", top),
            );
        }
        self.stack.push(token.clone());
        self.record(
            Some(token),
            position,
            format!("Push operator {} to stack", op),
        );
    }

    fn close_paren(&mut self, token: &Token, position: usize) -> Result<(), EngineError> {
        loop {
            match self.stack.last() {
                None => return Err(EngineError::MismatchedParenthesis { position }),
                Some(top) if top.is_open_paren() => break,
                Some(_) => {}
            }
            if let Some(popped) = self.stack.pop() {
                let message = format!("Pop operator {} from stack to output", popped.value);
                self.output.push(popped);
                self.record(Some(token), position, message);
            }
        }
        self.stack.pop();
        self.open_parens.pop();
        self.record(
            Some(token),
            position,
            "Remove opening parenthesis from stack".to_string(),
        );
        Ok(())
    }
}

/// Run the conversion, returning the postfix tokens and the recorded steps
pub fn to_postfix(
    tokens: &[Token],
) -> Result<(Vec<Token>, Trace<ConversionState, usize>), EngineError> {
    if tokens.is_empty() {
        return Err(EngineError::EmptyExpression);
    }

    let mut m = Machine {
        stack: Vec::new(),
        open_parens: Vec::new(),
        output: Vec::new(),
        steps: Trace::new(),
    };

    for (position, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Operand => {
                m.output.push(token.clone());
                m.record(
                    Some(token),
                    position,
                    format!("Add operand {} to output", token.value),
                );
            }
            TokenKind::Operator => {
                let op = Operator::from_token(token).ok_or_else(|| {
                    EngineError::UnknownOperator {
                        token: token.value.clone(),
                        position,
                    }
                })?;
                m.operator(token, op, position);
            }
            TokenKind::Parenthesis if token.is_open_paren() => {
                m.stack.push(token.clone());
                m.open_parens.push(position);
                m.record(
                    Some(token),
                    position,
                    "Push opening parenthesis to stack".to_string(),
                );
            }
            TokenKind::Parenthesis => m.close_paren(token, position)?,
        }
    }

    if let Some(&position) = m.open_parens.first() {
        return Err(EngineError::MismatchedParenthesis { position });
    }

    let end = tokens.len();
    while let Some(popped) = m.stack.pop() {
        let message = format!(
            "Pop remaining operator {} from stack to output",
            popped.value
        );
        m.output.push(popped);
        m.record(None, end, message);
    }

    Ok((m.output, m.steps))
}

/// Animated shunting-yard conversion
#[derive(Debug, Clone)]
pub struct InfixConverter {
    result: Vec<Token>,
    replay: Replay<ConversionState, usize>,
}

impl InfixConverter {
    pub fn new() -> Self {
        InfixConverter {
            result: Vec::new(),
            replay: Replay::new(EXPRESSION_INTERVAL),
        }
    }

    /// Postfix tokens of the last successful conversion
    pub fn result(&self) -> &[Token] {
        &self.result
    }

    /// Convert `expression` and start animating the trace. `Ok(None)` while
    /// a previous conversion is still playing; on error nothing changes.
    pub fn convert(&mut self, expression: &str) -> Result<Option<Vec<Token>>, EngineError> {
        if self.replay.in_flight() {
            debug!("conversion ignored: operation in flight");
            return Ok(None);
        }

        let tokens = tokenize(expression);
        let (output, steps) = to_postfix(&tokens)?;
        debug!(
            tokens = tokens.len(),
            steps = steps.len(),
            "infix conversion"
        );
        self.result = output.clone();
        self.replay.load(steps, true);
        Ok(Some(output))
    }
}

impl Default for InfixConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Traced for InfixConverter {
    type State = ConversionState;
    type Key = usize;

    fn replay(&self) -> &Replay<ConversionState, usize> {
        &self.replay
    }

    fn replay_mut(&mut self) -> &mut Replay<ConversionState, usize> {
        &mut self.replay
    }
}

#[cfg(test)]
mod tests {
    use super::super::lexer::join;
    use super::*;

    fn postfix(expression: &str) -> String {
        let (output, _) = to_postfix(&tokenize(expression)).unwrap();
        join(&output)
    }

    #[test]
    fn test_precedence() {
        assert_eq!(postfix("3+4*2"), "3 4 2 * +");
        assert_eq!(postfix("3*4+2"), "3 4 * 2 +");
        assert_eq!(postfix("8-3-2"), "8 3 - 2 -");
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(postfix("2^3^2"), "2 3 2 ^ ^");
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(postfix("(1+2)*3"), "1 2 + 3 *");
        assert_eq!(postfix("a*(b+c*d)-e"), "a b c d * + * e -");
    }

    #[test]
    fn test_step_messages() {
        let (_, steps) = to_postfix(&tokenize("(1+2)*3")).unwrap();
        let messages: Vec<&str> = steps.steps().iter().map(|s| s.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Push opening parenthesis to stack",
                "Add operand 1 to output",
                "Push operator + to stack",
                "Add operand 2 to output",
                "Pop operator + from stack to output",
                "Remove opening parenthesis from stack",
                "Push operator * to stack",
                "Add operand 3 to output",
                "Pop remaining operator * from stack to output",
            ]
        );
        let last = steps.last().unwrap();
        assert_eq!(last.state.position, 7);
        assert!(last.state.current.is_none());
    }

    #[test]
    fn test_mismatched_parentheses() {
        assert_eq!(
            to_postfix(&tokenize("1+2)")).unwrap_err(),
            EngineError::MismatchedParenthesis { position: 3 }
        );
        assert_eq!(
            to_postfix(&tokenize("(1+(2")).unwrap_err(),
            EngineError::MismatchedParenthesis { position: 0 }
        );
    }

    #[test]
    fn test_converter_animates_and_guards() {
        let mut converter = InfixConverter::new();
        let output = converter.convert("3+4*2").unwrap().unwrap();
        assert_eq!(join(&output), "3 4 2 * +");
        assert!(converter.replay().in_flight());
        assert_eq!(converter.convert("1+1"), Ok(None));

        converter.settle();
        assert!(converter.convert("").is_err());
        assert_eq!(join(converter.result()), "3 4 2 * +");
    }
}
