// Postfix evaluation stack machine

use super::lexer::{tokenize, Token, TokenKind};
use super::{format_number, Operator};
use crate::constants::EXPRESSION_INTERVAL;
use crate::errors::EngineError;
use crate::snapshot::{Replay, Trace, Traced};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationState {
    /// The value stack; for an operator step, the two operands just popped
    pub stack: Vec<f64>,
    pub current: Option<Token>,
    pub position: usize,
}

/// Decimal literal such as `12` or `2.5`; `inf`, `NaN` and exponents are not
/// operands
fn parse_operand(text: &str) -> Option<f64> {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if whole.len() + fraction.len() == 0 || !digits(whole) || !digits(fraction) {
        return None;
    }
    text.parse().ok()
}

/// Evaluate `tokens`, returning the value and the recorded steps.
///
/// Fails on a non-numeric operand, an operator with fewer than two values
/// available, or a final stack that does not hold exactly one value.
pub fn run(tokens: &[Token]) -> Result<(f64, Trace<EvaluationState, usize>), EngineError> {
    if tokens.is_empty() {
        return Err(EngineError::EmptyExpression);
    }

    let mut stack: Vec<f64> = Vec::new();
    let mut steps = Trace::new();

    for (position, token) in tokens.iter().enumerate() {
        let op = match token.kind {
            TokenKind::Operand => {
                let value =
                    parse_operand(&token.value).ok_or_else(|| EngineError::InvalidOperand {
                        token: token.value.clone(),
                        position,
                    })?;
                stack.push(value);
                steps.push(
                    EvaluationState {
                        stack: stack.clone(),
                        current: Some(token.clone()),
                        position,
                    },
                    vec![position],
                    format!("Push operand {} to stack", token.value),
                );
                continue;
            }
            _ => Operator::from_token(token).ok_or_else(|| EngineError::UnknownOperator {
                token: token.value.clone(),
                position,
            })?,
        };

        let (b, a) = match (stack.pop(), stack.pop()) {
            (Some(b), Some(a)) => (b, a),
            (popped, _) => {
                return Err(EngineError::StackUnderflow {
                    operator: op.symbol(),
                    position,
                    available: usize::from(popped.is_some()),
                })
            }
        };
        let result = op.apply(a, b);

        steps.push(
            EvaluationState {
                stack: vec![a, b],
                current: Some(token.clone()),
                position,
            },
            vec![position],
            format!(
                "Pop {} and {}, compute {} {} {} = {}",
                format_number(b),
                format_number(a),
                format_number(a),
                op,
                format_number(b),
                format_number(result)
            ),
        );
        stack.push(result);
        steps.push(
            EvaluationState {
                stack: stack.clone(),
                current: Some(token.clone()),
                position,
            },
            vec![position],
            format!("Push result {} to stack", format_number(result)),
        );
    }

    match stack.as_slice() {
        [value] => Ok((*value, steps)),
        _ => Err(EngineError::LeftoverOperands { count: stack.len() }),
    }
}

/// Animated postfix evaluation
#[derive(Debug, Clone)]
pub struct PostfixEvaluator {
    result: Option<f64>,
    replay: Replay<EvaluationState, usize>,
}

impl PostfixEvaluator {
    pub fn new() -> Self {
        PostfixEvaluator {
            result: None,
            replay: Replay::new(EXPRESSION_INTERVAL),
        }
    }

    /// Value of the last successful evaluation
    pub fn result(&self) -> Option<f64> {
        self.result
    }

    /// Evaluate and start animating. `Ok(None)` while a previous evaluation
    /// is still playing. An error clears the previous result and leaves no
    /// trace.
    pub fn evaluate(&mut self, tokens: &[Token]) -> Result<Option<f64>, EngineError> {
        if self.replay.in_flight() {
            debug!("evaluation ignored: operation in flight");
            return Ok(None);
        }

        let (value, steps) = match run(tokens) {
            Ok(done) => done,
            Err(e) => {
                debug!(error = %e, "postfix evaluation failed");
                self.result = None;
                self.replay.clear();
                return Err(e);
            }
        };
        debug!(value, steps = steps.len(), "postfix evaluation");
        self.result = Some(value);
        self.replay.load(steps, true);
        Ok(Some(value))
    }

    /// Evaluate a space separated postfix string such as `3 4 2 * +`
    pub fn evaluate_str(&mut self, postfix: &str) -> Result<Option<f64>, EngineError> {
        let tokens: Vec<Token> = postfix
            .split_whitespace()
            .flat_map(tokenize)
            .collect();
        self.evaluate(&tokens)
    }
}

impl Default for PostfixEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Traced for PostfixEvaluator {
    type State = EvaluationState;
    type Key = usize;

    fn replay(&self) -> &Replay<EvaluationState, usize> {
        &self.replay
    }

    fn replay_mut(&mut self) -> &mut Replay<EvaluationState, usize> {
        &mut self.replay
    }
}

#[cfg(test)]
mod tests {
    use super::super::convert::to_postfix;
    use super::*;

    fn eval(expression: &str) -> Result<f64, EngineError> {
        let (postfix, _) = to_postfix(&tokenize(expression))?;
        run(&postfix).map(|(value, _)| value)
    }

    #[test]
    fn test_evaluates_converted_expressions() {
        assert_eq!(eval("3+4*2"), Ok(11.0));
        assert_eq!(eval("(1+2)*3"), Ok(9.0));
        assert_eq!(eval("2^3^2"), Ok(512.0));
        assert_eq!(eval("7/2"), Ok(3.5));
    }

    #[test]
    fn test_division_by_zero_is_infinite() {
        assert_eq!(eval("1/0"), Ok(f64::INFINITY));
    }

    #[test]
    fn test_step_messages() {
        let mut evaluator = PostfixEvaluator::new();
        assert_eq!(evaluator.evaluate_str("6 2 -"), Ok(Some(4.0)));
        let steps = evaluator.replay().steps();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].message, "Push operand 6 to stack");
        assert_eq!(steps[2].message, "Pop 2 and 6, compute 6 - 2 = 4");
        assert_eq!(steps[2].state.stack, vec![6.0, 2.0]);
        assert_eq!(steps[3].message, "Push result 4 to stack");
        assert_eq!(steps[3].state.stack, vec![4.0]);
    }

    #[test]
    fn test_underflow_is_fatal() {
        let err = run(&tokenize("3+")).unwrap_err();
        assert_eq!(
            err,
            EngineError::StackUnderflow {
                operator: '+',
                position: 1,
                available: 1
            }
        );
    }

    #[test]
    fn test_leftover_operands_are_fatal() {
        let mut evaluator = PostfixEvaluator::new();
        let err = evaluator.evaluate_str("1 2").unwrap_err();
        assert_eq!(err, EngineError::LeftoverOperands { count: 2 });
        assert!(evaluator.result().is_none());
        assert!(evaluator.replay().is_empty());
    }

    #[test]
    fn test_invalid_operand() {
        let err = run(&[Token::operand("x")]).unwrap_err();
        assert_eq!(err.position(), Some(0));
        assert!(matches!(err, EngineError::InvalidOperand { .. }));
    }

    #[test]
    fn test_operands_are_decimal_literals() {
        assert_eq!(run(&[Token::operand("2.5")]).map(|(v, _)| v), Ok(2.5));
        for text in ["inf", "NaN", "infinity", "1e3", ".", "1.2.3"] {
            let err = run(&[Token::operand(text)]).unwrap_err();
            assert!(matches!(err, EngineError::InvalidOperand { .. }), "{}", text);
        }

        let mut evaluator = PostfixEvaluator::new();
        assert!(evaluator.evaluate_str("inf 1 +").is_err());
        assert!(evaluator.replay().is_empty());
    }

    #[test]
    fn test_evaluator_guards_while_playing() {
        let mut evaluator = PostfixEvaluator::new();
        evaluator.evaluate_str("1 2 +").unwrap();
        assert!(evaluator.replay().in_flight());
        assert_eq!(evaluator.evaluate_str("5"), Ok(None));
        evaluator.settle();
        assert_eq!(evaluator.evaluate_str("5"), Ok(Some(5.0)));
    }
}
