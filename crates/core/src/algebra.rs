//! Tokenizer, shunting-yard parser, and numeric evaluator for the algebraic
//! expressions used by answer keys, plus the sampled equivalence test.

use std::collections::BTreeMap;

use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors raised while parsing or evaluating an expression.
///
/// These never escape the scoring path: equivalence folds every failure into
/// a `false` result.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("unexpected character '{0}' in expression")]
    UnexpectedChar(char),

    #[error("malformed number '{0}'")]
    MalformedNumber(String),

    #[error("unbalanced parentheses")]
    UnbalancedParens,

    #[error("unbound variable '{0}'")]
    UnboundVariable(String),

    #[error("malformed expression")]
    MalformedExpression,

    #[error("expression produced a non-finite result")]
    NonFiniteResult,
}

//
// ─── TOKENS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Op {
    fn precedence(self) -> u8 {
        match self {
            Op::Add | Op::Sub => 1,
            Op::Mul | Op::Div => 2,
            Op::Pow => 3,
        }
    }

    fn is_right_associative(self) -> bool {
        matches!(self, Op::Pow)
    }

    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Op::Add => lhs + rhs,
            Op::Sub => lhs - rhs,
            Op::Mul => lhs * rhs,
            Op::Div => lhs / rhs,
            Op::Pow => lhs.powf(rhs),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Op(Op),
    LParen,
    RParen,
}

//
// ─── TOKENIZER ─────────────────────────────────────────────────────────────────
//

fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c.is_ascii_digit() {
            let mut literal = String::new();
            let mut dots = 0usize;
            while let Some(&d) = chars.peek() {
                if d.is_ascii_digit() {
                    literal.push(d);
                    chars.next();
                } else if d == '.' {
                    dots += 1;
                    literal.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            if dots > 1 {
                return Err(ParseError::MalformedNumber(literal));
            }
            let value = literal
                .parse::<f64>()
                .map_err(|_| ParseError::MalformedNumber(literal))?;
            tokens.push(Token::Number(value));
        } else if c.is_ascii_alphabetic() {
            let mut name = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_ascii_alphanumeric() || d == '_' {
                    name.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::Ident(name));
        } else {
            chars.next();
            let token = match c {
                '(' => Token::LParen,
                ')' => Token::RParen,
                '+' => Token::Op(Op::Add),
                '-' => Token::Op(Op::Sub),
                '*' => Token::Op(Op::Mul),
                '/' => Token::Op(Op::Div),
                '^' => Token::Op(Op::Pow),
                other => return Err(ParseError::UnexpectedChar(other)),
            };
            tokens.push(token);
        }
    }

    Ok(tokens)
}

/// Rewrite unary minus as `0 - operand` before the shunting-yard pass.
///
/// A `-` that is the first token or immediately follows an operator or `(`
/// gets an implicit `0` operand inserted in front of it.
fn desugar_unary_minus(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        if token == Token::Op(Op::Sub) {
            let unary = matches!(out.last(), None | Some(Token::Op(_)) | Some(Token::LParen));
            if unary {
                out.push(Token::Number(0.0));
            }
        }
        out.push(token);
    }
    out
}

//
// ─── PARSER ────────────────────────────────────────────────────────────────────
//

/// Shunting-yard conversion from infix to postfix (Reverse Polish) order.
fn to_postfix(tokens: Vec<Token>) -> Result<Vec<Token>, ParseError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for token in tokens {
        match token {
            Token::Number(_) | Token::Ident(_) => output.push(token),
            Token::Op(op) => {
                while let Some(Token::Op(top)) = stack.last() {
                    let binds_tighter = top.precedence() > op.precedence()
                        || (top.precedence() == op.precedence() && !op.is_right_associative());
                    if !binds_tighter {
                        break;
                    }
                    output.push(stack.pop().expect("stack top was just inspected"));
                }
                stack.push(Token::Op(op));
            }
            Token::LParen => stack.push(Token::LParen),
            Token::RParen => loop {
                match stack.pop() {
                    Some(Token::LParen) => break,
                    Some(popped) => output.push(popped),
                    None => return Err(ParseError::UnbalancedParens),
                }
            },
        }
    }

    while let Some(popped) = stack.pop() {
        if popped == Token::LParen {
            return Err(ParseError::UnbalancedParens);
        }
        output.push(popped);
    }

    Ok(output)
}

//
// ─── EVALUATOR ─────────────────────────────────────────────────────────────────
//

fn eval_postfix(
    postfix: &[Token],
    bindings: &BTreeMap<String, f64>,
) -> Result<f64, ParseError> {
    let mut stack: Vec<f64> = Vec::new();

    for token in postfix {
        match token {
            Token::Number(value) => stack.push(*value),
            Token::Ident(name) => {
                let value = bindings
                    .get(name)
                    .ok_or_else(|| ParseError::UnboundVariable(name.clone()))?;
                stack.push(*value);
            }
            Token::Op(op) => {
                let rhs = stack.pop().ok_or(ParseError::MalformedExpression)?;
                let lhs = stack.pop().ok_or(ParseError::MalformedExpression)?;
                let result = op.apply(lhs, rhs);
                if !result.is_finite() {
                    return Err(ParseError::NonFiniteResult);
                }
                stack.push(result);
            }
            Token::LParen | Token::RParen => return Err(ParseError::MalformedExpression),
        }
    }

    match (stack.pop(), stack.is_empty()) {
        (Some(result), true) => Ok(result),
        _ => Err(ParseError::MalformedExpression),
    }
}

fn compile(expression: &str) -> Result<Vec<Token>, ParseError> {
    to_postfix(desugar_unary_minus(tokenize(expression)?))
}

/// Evaluate an expression with the given variable bindings.
///
/// # Errors
///
/// Returns `ParseError` for malformed input, unbound variables, or any
/// non-finite intermediate result (division by zero, out-of-domain `powf`).
pub fn evaluate(expression: &str, bindings: &BTreeMap<String, f64>) -> Result<f64, ParseError> {
    eval_postfix(&compile(expression)?, bindings)
}

//
// ─── EQUIVALENCE ───────────────────────────────────────────────────────────────
//

/// Deterministic sample points used by the equivalence test.
pub const SAMPLE_POINTS: [f64; 6] = [-2.0, -1.0, 0.0, 1.0, 2.0, 3.0];

/// Maximum pointwise difference tolerated between equivalent expressions.
pub const EQUIVALENCE_TOLERANCE: f64 = 1e-6;

/// Sample-based equivalence of two expressions over the given variables.
///
/// Every declared variable is bound to the same sample value simultaneously,
/// not per-variable Cartesian products. This is a deliberate simplification:
/// it cannot distinguish functions that agree whenever all variables are
/// equal but differ otherwise, and being sample-based it is never exact
/// symbolic equivalence. Any compile or evaluation failure yields `false`.
#[must_use]
pub fn equivalent(expected: &str, actual: &str, variables: &[String]) -> bool {
    let (Ok(lhs), Ok(rhs)) = (compile(expected), compile(actual)) else {
        return false;
    };

    for sample in SAMPLE_POINTS {
        let bindings: BTreeMap<String, f64> = variables
            .iter()
            .map(|name| (name.clone(), sample))
            .collect();
        let (Ok(a), Ok(b)) = (
            eval_postfix(&lhs, &bindings),
            eval_postfix(&rhs, &bindings),
        ) else {
            return false;
        };
        if (a - b).abs() > EQUIVALENCE_TOLERANCE {
            return false;
        }
    }

    true
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn bind(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), *value))
            .collect()
    }

    fn vars(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn evaluates_precedence_and_literals() {
        assert_eq!(evaluate("2+3*4", &bind(&[])).unwrap(), 14.0);
        assert_eq!(evaluate("(2+3)*4", &bind(&[])).unwrap(), 20.0);
        assert_eq!(evaluate("10/4", &bind(&[])).unwrap(), 2.5);
    }

    #[test]
    fn exponentiation_is_right_associative() {
        assert_eq!(evaluate("2^3^2", &bind(&[])).unwrap(), 512.0);
        assert_eq!(evaluate("2^2*3", &bind(&[])).unwrap(), 12.0);
    }

    #[test]
    fn unary_minus_desugars_to_zero_operand() {
        assert_eq!(evaluate("-4", &bind(&[])).unwrap(), -4.0);
        assert_eq!(evaluate("-x+1", &bind(&[("x", 2.0)])).unwrap(), -1.0);
        assert_eq!(evaluate("-(x+1)", &bind(&[("x", 2.0)])).unwrap(), -3.0);
        // 2*-3 desugars to 2*0-3, and * binds tighter than the inserted 0-,
        // so it reads as (2*0)-3.
        assert_eq!(evaluate("2*-3", &bind(&[])).unwrap(), -3.0);
        // -x^2 reads as -(x^2) because ^ binds tighter than the implicit 0-.
        assert_eq!(evaluate("-x^2", &bind(&[("x", 3.0)])).unwrap(), -9.0);
    }

    #[test]
    fn variables_resolve_from_bindings() {
        let result = evaluate("a*b + c_2", &bind(&[("a", 2.0), ("b", 3.0), ("c_2", 1.0)]));
        assert_eq!(result.unwrap(), 7.0);
    }

    #[test]
    fn unbound_variable_errors() {
        let err = evaluate("x+y", &bind(&[("x", 1.0)])).unwrap_err();
        assert_eq!(err, ParseError::UnboundVariable("y".into()));
    }

    #[test]
    fn tokenizer_rejects_malformed_input() {
        assert!(evaluate("2++", &bind(&[])).is_err());
        assert_eq!(
            evaluate("x&y", &bind(&[("x", 1.0), ("y", 1.0)])).unwrap_err(),
            ParseError::UnexpectedChar('&')
        );
        assert_eq!(
            evaluate("1.2.3", &bind(&[])).unwrap_err(),
            ParseError::MalformedNumber("1.2.3".into())
        );
    }

    #[test]
    fn mismatched_parens_error() {
        assert_eq!(
            evaluate("(1+2", &bind(&[])).unwrap_err(),
            ParseError::UnbalancedParens
        );
        assert_eq!(
            evaluate("1+2)", &bind(&[])).unwrap_err(),
            ParseError::UnbalancedParens
        );
    }

    #[test]
    fn non_finite_results_error() {
        assert_eq!(
            evaluate("1/0", &bind(&[])).unwrap_err(),
            ParseError::NonFiniteResult
        );
        // negative base with fractional exponent is NaN under powf
        assert_eq!(
            evaluate("(0-2)^0.5", &bind(&[])).unwrap_err(),
            ParseError::NonFiniteResult
        );
    }

    #[test]
    fn equivalent_accepts_algebraically_equal_forms() {
        assert!(equivalent("x^2", "x*x", &vars(&["x"])));
        assert!(equivalent("(x+1)^2", "x^2 + 2*x + 1", &vars(&["x"])));
        assert!(equivalent("2*x + y", "y + x + x", &vars(&["x", "y"])));
    }

    #[test]
    fn equivalent_rejects_differing_expressions() {
        assert!(!equivalent("x+1", "x+2", &vars(&["x"])));
        assert!(!equivalent("x^2", "x^3", &vars(&["x"])));
    }

    #[test]
    fn equivalent_is_false_on_compile_failure() {
        assert!(!equivalent("x+1", "x+", &vars(&["x"])));
        assert!(!equivalent("x&1", "x+1", &vars(&["x"])));
    }

    #[test]
    fn equivalent_is_false_when_a_sample_fails_to_evaluate() {
        // 1/x blows up at the 0 sample even against itself.
        assert!(!equivalent("1/x", "1/x", &vars(&["x"])));
    }

    #[test]
    fn equivalence_binds_all_variables_to_the_same_sample() {
        // Known limitation: x and y are indistinguishable because samples
        // never bind them to different values.
        assert!(equivalent("x", "y", &vars(&["x", "y"])));
    }
}
