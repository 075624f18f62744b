//! Polynomial multiplication over linked lists of terms
//!
//! Each polynomial is a singly linked chain of term nodes in descending
//! exponent order. Multiplication walks every pair of terms and records three
//! steps per pair: select, multiply, and add into the running result with
//! like exponents combined and zero terms dropped.

use crate::constants::POLYNOMIAL_INTERVAL;
use crate::errors::EngineError;
use crate::snapshot::{IdGen, NodeId, Replay, Trace, Traced};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Term {
    pub coefficient: i64,
    pub exponent: u32,
}

impl Term {
    pub fn new(coefficient: i64, exponent: u32) -> Self {
        Term {
            coefficient,
            exponent,
        }
    }

    /// `None` when the coefficient or exponent leaves its integer range
    pub fn checked_times(self, other: Term) -> Option<Term> {
        Some(Term {
            coefficient: self.coefficient.checked_mul(other.coefficient)?,
            exponent: self.exponent.checked_add(other.exponent)?,
        })
    }

    /// Parse one term such as `2x^2`, `-x`, `x^3` or `5`
    pub fn parse(text: &str) -> Option<Term> {
        let (coefficient_text, variable) = match text.find('x') {
            Some(at) => (&text[..at], Some(&text[at + 1..])),
            None => (text, None),
        };

        let coefficient = match (coefficient_text, variable) {
            ("", Some(_)) => 1,
            ("-", Some(_)) => -1,
            ("", None) => return None,
            (digits, _) => {
                let unsigned = digits.strip_prefix('-').unwrap_or(digits);
                if !unsigned.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                digits.parse().ok()?
            }
        };

        let exponent = match variable {
            None => 0,
            Some("") => 1,
            Some(rest) => {
                let digits = rest.strip_prefix('^')?;
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                digits.parse().ok()?
            }
        };
        Some(Term::new(coefficient, exponent))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exponent == 0 {
            return write!(f, "{}", self.coefficient);
        }
        match self.coefficient {
            1 => {}
            -1 => write!(f, "-")?,
            c => write!(f, "{}", c)?,
        }
        match self.exponent {
            1 => write!(f, "x"),
            e => write!(f, "x^{}", e),
        }
    }
}

/// Split on `+`, drop malformed terms, sort by descending exponent
pub fn parse_terms(input: &str) -> Vec<Term> {
    let mut terms: Vec<Term> = input
        .split('+')
        .filter_map(|part| Term::parse(part.trim()))
        .collect();
    terms.sort_by(|a, b| b.exponent.cmp(&a.exponent));
    terms
}

/// `2x^2 + 3x + 1`
pub fn format_terms(terms: &[Term]) -> String {
    terms
        .iter()
        .map(Term::to_string)
        .collect::<Vec<_>>()
        .join(" + ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TermNode {
    pub id: NodeId,
    pub term: Term,
    pub next: Option<NodeId>,
}

/// Singly linked chain of terms; `nodes[i]` has id `i`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Polynomial {
    pub head: Option<NodeId>,
    pub nodes: Vec<TermNode>,
}

impl Polynomial {
    pub fn from_terms(terms: &[Term]) -> Self {
        let mut ids = IdGen::new();
        let mut nodes: Vec<TermNode> = terms
            .iter()
            .map(|&term| TermNode {
                id: ids.next_id(),
                term,
                next: None,
            })
            .collect();
        for i in 1..nodes.len() {
            nodes[i - 1].next = Some(nodes[i].id);
        }
        Polynomial {
            head: nodes.first().map(|n| n.id),
            nodes,
        }
    }

    pub fn parse(input: &str) -> Self {
        Self::from_terms(&parse_terms(input))
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    fn get(&self, id: NodeId) -> Option<&TermNode> {
        self.nodes.get(id.0 as usize)
    }

    /// Nodes in link order
    pub fn iter(&self) -> impl Iterator<Item = &TermNode> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let node = self.get(cursor?)?;
            cursor = node.next;
            Some(node)
        })
    }

    pub fn terms(&self) -> Vec<Term> {
        self.iter().map(|n| n.term).collect()
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_terms(&self.terms()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepKind {
    SelectTerms,
    Multiply,
    AddToResult,
}

/// A highlighted node in one of the three polynomials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "polynomial", content = "node", rename_all = "lowercase")]
pub enum TermRef {
    First(NodeId),
    Second(NodeId),
    Result(NodeId),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolynomialState {
    pub kind: StepKind,
    pub term1: Term,
    pub term2: Term,
    pub product: Option<Term>,
    /// The result so far, as a linked chain
    pub result: Polynomial,
}

#[derive(Debug, Clone)]
pub struct PolynomialEngine {
    first: Polynomial,
    second: Polynomial,
    result: Polynomial,
    replay: Replay<PolynomialState, TermRef>,
}

impl PolynomialEngine {
    pub fn new() -> Self {
        PolynomialEngine {
            first: Polynomial::default(),
            second: Polynomial::default(),
            result: Polynomial::default(),
            replay: Replay::new(POLYNOMIAL_INTERVAL),
        }
    }

    pub fn first(&self) -> &Polynomial {
        &self.first
    }

    pub fn second(&self) -> &Polynomial {
        &self.second
    }

    pub fn result(&self) -> &Polynomial {
        &self.result
    }

    /// Replace both operands; input with no valid term is rejected
    pub fn set_operands(&mut self, first: &str, second: &str) -> bool {
        if self.replay.in_flight() {
            return false;
        }
        let (first, second) = (Polynomial::parse(first), Polynomial::parse(second));
        if first.is_empty() || second.is_empty() {
            debug!("polynomial operands ignored: no valid terms");
            return false;
        }
        self.first = first;
        self.second = second;
        self.result = Polynomial::default();
        self.replay.clear();
        true
    }

    /// (2x^2 + 3x + 1) * (x + 2)
    pub fn load_example(&mut self) -> bool {
        if self.replay.in_flight() {
            return false;
        }
        self.first = Polynomial::from_terms(&[Term::new(2, 2), Term::new(3, 1), Term::new(1, 0)]);
        self.second = Polynomial::from_terms(&[Term::new(1, 1), Term::new(2, 0)]);
        self.result = Polynomial::default();
        self.replay.clear();
        true
    }

    /// Multiply the operands term by term, recording the trace.
    ///
    /// `Ok(None)` while a previous product is playing or an operand is
    /// missing. An overflowing product clears the result and leaves no trace.
    pub fn multiply(&mut self) -> Result<Option<&Polynomial>, EngineError> {
        if self.replay.in_flight() || self.first.is_empty() || self.second.is_empty() {
            return Ok(None);
        }

        match self.product_trace() {
            Ok((result, steps)) => {
                debug!(result = %result, steps = steps.len(), "polynomial multiply");
                self.result = result;
                self.replay.load(steps, false);
                Ok(Some(&self.result))
            }
            Err(e) => {
                debug!(error = %e, "polynomial multiply failed");
                self.result = Polynomial::default();
                self.replay.clear();
                Err(e)
            }
        }
    }

    fn product_trace(
        &self,
    ) -> Result<(Polynomial, Trace<PolynomialState, TermRef>), EngineError> {
        let mut steps = Trace::new();
        // exponent -> coefficient
        let mut combined: BTreeMap<u32, i64> = BTreeMap::new();
        let mut result = Polynomial::default();

        for a in self.first.iter() {
            for b in self.second.iter() {
                let pair = vec![TermRef::First(a.id), TermRef::Second(b.id)];
                let product =
                    a.term
                        .checked_times(b.term)
                        .ok_or_else(|| EngineError::TermOverflow {
                            left: a.term.to_string(),
                            right: b.term.to_string(),
                        })?;

                steps.push(
                    PolynomialState {
                        kind: StepKind::SelectTerms,
                        term1: a.term,
                        term2: b.term,
                        product: None,
                        result: result.clone(),
                    },
                    pair.clone(),
                    format!("Selecting terms: {} and {}", a.term, b.term),
                );
                steps.push(
                    PolynomialState {
                        kind: StepKind::Multiply,
                        term1: a.term,
                        term2: b.term,
                        product: Some(product),
                        result: result.clone(),
                    },
                    pair.clone(),
                    format!("{} × {} = {}", a.term, b.term, product),
                );

                let coefficient = combined.entry(product.exponent).or_insert(0);
                *coefficient = coefficient.checked_add(product.coefficient).ok_or(
                    EngineError::CoefficientOverflow {
                        exponent: product.exponent,
                    },
                )?;
                let terms: Vec<Term> = combined
                    .iter()
                    .rev()
                    .filter(|&(_, &c)| c != 0)
                    .map(|(&e, &c)| Term::new(c, e))
                    .collect();
                result = Polynomial::from_terms(&terms);

                let mut highlighted = pair;
                if let Some(node) = result.iter().find(|n| n.term == product) {
                    highlighted.push(TermRef::Result(node.id));
                }
                steps.push(
                    PolynomialState {
                        kind: StepKind::AddToResult,
                        term1: a.term,
                        term2: b.term,
                        product: Some(product),
                        result: result.clone(),
                    },
                    highlighted,
                    format!(
                        "Adding {} to result, combined terms: {}",
                        product,
                        format_terms(&terms)
                    ),
                );
            }
        }

        Ok((result, steps))
    }
}

impl Default for PolynomialEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Traced for PolynomialEngine {
    type State = PolynomialState;
    type Key = TermRef;

    fn replay(&self) -> &Replay<PolynomialState, TermRef> {
        &self.replay
    }

    fn replay_mut(&mut self) -> &mut Replay<PolynomialState, TermRef> {
        &mut self.replay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_terms() {
        assert_eq!(
            parse_terms("3x + 1 + 2x^2"),
            vec![Term::new(2, 2), Term::new(3, 1), Term::new(1, 0)]
        );
        assert_eq!(parse_terms("-x^3 + x"), vec![Term::new(-1, 3), Term::new(1, 1)]);
        assert_eq!(parse_terms("2y + 4 + x^"), vec![Term::new(4, 0)]);
        assert!(parse_terms("").is_empty());
    }

    #[test]
    fn test_format_term() {
        assert_eq!(Term::new(2, 2).to_string(), "2x^2");
        assert_eq!(Term::new(1, 1).to_string(), "x");
        assert_eq!(Term::new(-1, 3).to_string(), "-x^3");
        assert_eq!(Term::new(5, 0).to_string(), "5");
        assert_eq!(Term::new(1, 0).to_string(), "1");
    }

    #[test]
    fn test_example_product() {
        let mut engine = PolynomialEngine::new();
        engine.load_example();
        let result = engine.multiply().unwrap().unwrap();
        assert_eq!(result.to_string(), "2x^3 + 7x^2 + 7x + 2");
        assert_eq!(engine.replay().len(), 18);

        let steps = engine.replay().steps();
        assert_eq!(steps[0].message, "Selecting terms: 2x^2 and x");
        assert_eq!(steps[1].message, "2x^2 × x = 2x^3");
        assert_eq!(
            steps[5].message,
            "Adding 4x^2 to result, combined terms: 2x^3 + 4x^2"
        );
        assert_eq!(steps[5].state.kind, StepKind::AddToResult);
        assert!(steps[5].highlighted.contains(&TermRef::Result(NodeId(1))));
    }

    #[test]
    fn test_zero_terms_drop_out() {
        let mut engine = PolynomialEngine::new();
        assert!(engine.set_operands("x + 1", "x + -1"));
        assert_eq!(engine.multiply().unwrap().unwrap().to_string(), "x^2 + -1");
    }

    #[test]
    fn test_rejects_empty_operands() {
        let mut engine = PolynomialEngine::new();
        assert!(!engine.set_operands("y", "x"));
        assert_eq!(engine.multiply(), Ok(None));
    }

    #[test]
    fn test_checked_times() {
        assert_eq!(Term::new(2, 1).checked_times(Term::new(-3, 2)), Some(Term::new(-6, 3)));
        assert_eq!(Term::new(i64::MAX, 1).checked_times(Term::new(2, 1)), None);
        assert_eq!(Term::new(1, u32::MAX).checked_times(Term::new(1, 1)), None);
    }

    #[test]
    fn test_overflowing_product_is_rejected() {
        let mut engine = PolynomialEngine::new();
        engine.load_example();
        engine.multiply().unwrap();

        assert!(engine.set_operands("9223372036854775807x", "2x"));
        assert_eq!(
            engine.multiply(),
            Err(EngineError::TermOverflow {
                left: "9223372036854775807x".to_string(),
                right: "2x".to_string(),
            })
        );
        assert!(engine.result().is_empty());
        assert!(engine.replay().is_empty());

        assert!(engine.set_operands("x^4000000000", "x^4000000000"));
        assert!(matches!(engine.multiply(), Err(EngineError::TermOverflow { .. })));
    }

    #[test]
    fn test_overflowing_sum_is_rejected() {
        let mut engine = PolynomialEngine::new();
        assert!(engine.set_operands("9223372036854775807x + 9223372036854775807", "x + 1"));
        assert_eq!(
            engine.multiply(),
            Err(EngineError::CoefficientOverflow { exponent: 1 })
        );
        assert!(engine.replay().is_empty());
    }

    #[test]
    fn test_linked_chain() {
        let poly = Polynomial::parse("x^2 + 2x + 3");
        assert_eq!(poly.head, Some(NodeId(0)));
        assert_eq!(poly.nodes[0].next, Some(NodeId(1)));
        assert_eq!(poly.nodes[2].next, None);
        assert_eq!(poly.terms().len(), 3);
    }
}
