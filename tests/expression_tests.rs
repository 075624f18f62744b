// Integration tests for infix conversion and postfix evaluation

use dsviz::errors::EngineError;
use dsviz::expression::{join, InfixConverter, PostfixEvaluator};
use dsviz::snapshot::Traced;

fn convert(expression: &str) -> Result<String, EngineError> {
    let mut converter = InfixConverter::new();
    let output = converter.convert(expression)?.unwrap_or_default();
    Ok(join(&output))
}

#[test]
fn test_convert_then_evaluate() {
    let mut converter = InfixConverter::new();
    let postfix = converter.convert("3+4*2").unwrap().unwrap();
    let values: Vec<&str> = postfix.iter().map(|t| t.value.as_str()).collect();
    assert_eq!(values, vec!["3", "4", "2", "*", "+"]);

    let mut evaluator = PostfixEvaluator::new();
    assert_eq!(evaluator.evaluate(&postfix), Ok(Some(11.0)));
    assert_eq!(evaluator.result(), Some(11.0));
}

#[test]
fn test_whitespace_and_multi_digit_operands() {
    assert_eq!(convert(" 12 * ( 3 - 1 ) ").unwrap(), "12 3 1 - *");
    assert_eq!(convert("2^3^2").unwrap(), "2 3 2 ^ ^");
    assert_eq!(convert("10/5/2").unwrap(), "10 5 / 2 /");
}

#[test]
fn test_conversion_errors_carry_positions() {
    assert_eq!(convert(""), Err(EngineError::EmptyExpression));
    let err = convert("(1+2))").unwrap_err();
    assert_eq!(err.position(), Some(5));
}

#[test]
fn test_evaluation_errors() {
    let mut evaluator = PostfixEvaluator::new();
    assert!(matches!(
        evaluator.evaluate_str("1 +"),
        Err(EngineError::StackUnderflow { operator: '+', .. })
    ));
    assert_eq!(
        evaluator.evaluate_str("1 2 3 +"),
        Err(EngineError::LeftoverOperands { count: 2 })
    );
    assert!(evaluator.replay().is_empty());
    assert!(evaluator.evaluate_str("").is_err());
}

#[test]
fn test_animation_plays_through() {
    let mut converter = InfixConverter::new();
    converter.convert("1+2").unwrap();
    let replay = converter.replay_mut();
    assert!(replay.in_flight());
    let interval = replay.interval();
    replay.tick(interval * 10);
    assert!(replay.is_at_end());
    assert!(!replay.in_flight());

    let output = converter.convert("4*5").unwrap().unwrap();
    assert_eq!(join(&output), "4 5 *");
}
