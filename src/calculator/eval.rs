//! Flat four-operator expression evaluator
//!
//! Evaluates strings typed on the crafting-table keypad: non-negative decimal
//! literals, `+ - * /` and unary minus, no grouping. Evaluation runs in three
//! passes over a token list (unary-minus folding, `*`/`/`, then `+`/`-`).
//! Failures never escape [`evaluate`]; they collapse to [`ERROR_MARKER`].

use thiserror::Error;

/// Shown instead of a number when an expression cannot be evaluated.
pub const ERROR_MARKER: &str = "Err";

/// Why an expression could not be evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The input holds no numbers and no operators
    #[error("expression contains no numbers or operators")]
    NoTokens,
    /// An operator is missing an operand or sits where a number belongs
    #[error("syntax error in expression")]
    Syntax,
    /// The result is infinite or NaN (e.g. after a division by zero)
    #[error("expression does not evaluate to a finite number")]
    NonFinite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'+' => Some(Operator::Add),
            b'-' => Some(Operator::Sub),
            b'*' => Some(Operator::Mul),
            b'/' => Some(Operator::Div),
            _ => None,
        }
    }

    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Sub => lhs - rhs,
            Operator::Mul => lhs * rhs,
            // Any division by zero is +inf, including 0/0; the final check rejects it.
            Operator::Div => {
                if rhs == 0.0 {
                    f64::INFINITY
                } else {
                    lhs / rhs
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(f64),
    Op(Operator),
}

/// Evaluate an expression and format the result for display.
///
/// Returns the number as the keypad display shows it, or `"Err"`.
///
/// # Example
/// ```
/// use tascraft::calculator::evaluate;
/// assert_eq!(evaluate("2+3*4"), "14");
/// assert_eq!(evaluate("5*-3"), "-15");
/// assert_eq!(evaluate("10/0"), "Err");
/// ```
pub fn evaluate(input: &str) -> String {
    match try_evaluate(input) {
        Ok(value) => format_number(value),
        Err(_) => ERROR_MARKER.to_string(),
    }
}

/// Evaluate an expression, keeping the reason for a failure.
pub fn try_evaluate(input: &str) -> Result<f64, EvalError> {
    let tokens = tokenize(input);
    if tokens.is_empty() {
        return Err(EvalError::NoTokens);
    }

    let merged = fold_unary_minus(tokens)?;
    let products = reduce_products(merged)?;
    let result = reduce_sums(&products)?;

    if result.is_finite() {
        Ok(result)
    } else {
        Err(EvalError::NonFinite)
    }
}

/// Format a number the way the keypad display does.
///
/// Shortest round-trip decimal form; exponent form (`1e+21`, `1.5e-7`) for
/// magnitudes at or above 1e21 and below 1e-6. Negative zero prints as `0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{:e}", value);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        }
    } else {
        value.to_string()
    }
}

/// Split the input into numbers (`\d+(\.\d+)?`) and operators, dropping anything else.
fn tokenize(input: &str) -> Vec<Token> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i + 1 < bytes.len() && bytes[i] == b'.' && bytes[i + 1].is_ascii_digit() {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
            }
            // The slice is ASCII digits with at most one inner dot.
            if let Ok(value) = input[start..i].parse::<f64>() {
                tokens.push(Token::Num(value));
            }
            continue;
        }

        if let Some(op) = Operator::from_byte(bytes[i]) {
            tokens.push(Token::Op(op));
        }
        i += 1;
    }

    tokens
}

/// Fuse a leading `-`, or a `-` right after another operator, into the next number.
fn fold_unary_minus(tokens: Vec<Token>) -> Result<Vec<Token>, EvalError> {
    let mut merged = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter();

    while let Some(token) = iter.next() {
        let after_operator = matches!(merged.last(), None | Some(Token::Op(_)));
        if token == Token::Op(Operator::Sub) && after_operator {
            match iter.next() {
                Some(Token::Num(n)) => merged.push(Token::Num(-n)),
                _ => return Err(EvalError::Syntax),
            }
        } else {
            merged.push(token);
        }
    }

    Ok(merged)
}

/// First precedence pass: collapse every `*` and `/` with its neighbours.
fn reduce_products(tokens: Vec<Token>) -> Result<Vec<Token>, EvalError> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter();

    while let Some(token) = iter.next() {
        match token {
            Token::Op(op @ (Operator::Mul | Operator::Div)) => {
                let lhs = match out.pop() {
                    Some(Token::Num(n)) => n,
                    _ => return Err(EvalError::Syntax),
                };
                let rhs = match iter.next() {
                    Some(Token::Num(n)) => n,
                    _ => return Err(EvalError::Syntax),
                };
                out.push(Token::Num(op.apply(lhs, rhs)));
            }
            other => out.push(other),
        }
    }

    Ok(out)
}

/// Second precedence pass: left fold of `number (+|- number)*`.
fn reduce_sums(tokens: &[Token]) -> Result<f64, EvalError> {
    let mut iter = tokens.iter();

    let mut result = match iter.next() {
        Some(Token::Num(n)) => *n,
        Some(Token::Op(_)) => return Err(EvalError::Syntax),
        None => return Ok(0.0),
    };

    while let Some(token) = iter.next() {
        let rhs = match iter.next() {
            Some(Token::Num(n)) => *n,
            _ => return Err(EvalError::Syntax),
        };
        // anything other than + or - in operator position is skipped with its operand
        if let Token::Op(op @ (Operator::Add | Operator::Sub)) = token {
            result = op.apply(result, rhs);
        }
    }

    Ok(result)
}
