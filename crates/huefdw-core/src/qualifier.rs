// ── Qualifier evaluator ──
//
// Qualifiers arrive pre-parsed from the engine as (column, operator symbol,
// value). Evaluation is a pure function of the operator and both operands.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::column::parse_bool;
use crate::error::CoreError;

/// A comparison operator the evaluator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(ascii_case_insensitive)]
pub enum Operator {
    #[strum(serialize = "=")]
    Eq,
    #[strum(to_string = "<>", serialize = "!=")]
    Ne,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    Le,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    Ge,
    #[strum(serialize = "IN")]
    In,
    #[strum(serialize = "NOT IN")]
    NotIn,
    #[strum(to_string = "~~", serialize = "LIKE")]
    Like,
    #[strum(to_string = "!~~", serialize = "NOT LIKE")]
    NotLike,
    #[strum(to_string = "~~*", serialize = "ILIKE")]
    ILike,
    #[strum(to_string = "!~~*", serialize = "NOT ILIKE")]
    NotILike,
}

impl Operator {
    /// Parse an operator symbol, tolerating surrounding and repeated spaces
    /// (`"not  in"`).
    pub fn parse(symbol: &str) -> Result<Self, CoreError> {
        let normalized = symbol.split_whitespace().collect::<Vec<_>>().join(" ");
        normalized
            .parse()
            .map_err(|_| CoreError::UnsupportedOperator {
                symbol: symbol.to_owned(),
            })
    }

    /// The `LIKE` family, which matches text against a pattern.
    pub fn is_pattern(self) -> bool {
        matches!(self, Self::Like | Self::NotLike | Self::ILike | Self::NotILike)
    }

    /// Evaluate `lhs <op> rhs`.
    ///
    /// `null` on either side never matches, whatever the operator.
    pub fn apply(self, lhs: &Value, rhs: &Value) -> bool {
        if lhs.is_null() || rhs.is_null() {
            return false;
        }
        match self {
            Self::Eq => compare(lhs, rhs) == Some(Ordering::Equal),
            Self::Ne => compare(lhs, rhs).is_some_and(Ordering::is_ne),
            Self::Lt => ordered(lhs, rhs).is_some_and(Ordering::is_lt),
            Self::Le => ordered(lhs, rhs).is_some_and(Ordering::is_le),
            Self::Gt => ordered(lhs, rhs).is_some_and(Ordering::is_gt),
            Self::Ge => ordered(lhs, rhs).is_some_and(Ordering::is_ge),
            Self::In => members(rhs).any(|m| compare(lhs, m) == Some(Ordering::Equal)),
            Self::NotIn => members(rhs).all(|m| compare(lhs, m) != Some(Ordering::Equal)),
            Self::Like => like(lhs, rhs, false).unwrap_or(false),
            Self::NotLike => like(lhs, rhs, false).is_some_and(|m| !m),
            Self::ILike => like(lhs, rhs, true).unwrap_or(false),
            Self::NotILike => like(lhs, rhs, true).is_some_and(|m| !m),
        }
    }
}

/// One predicate pushed down by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Qualifier {
    pub column: String,
    pub operator: String,
    pub value: Value,
}

impl Qualifier {
    pub fn new(column: impl Into<String>, operator: impl Into<String>, value: Value) -> Self {
        Self {
            column: column.into(),
            operator: operator.into(),
            value,
        }
    }

    /// Shorthand for the most common qualifier.
    pub fn eq(column: impl Into<String>, value: Value) -> Self {
        Self::new(column, "=", value)
    }
}

/// `evaluate(operator, lhs, rhs)`.
pub fn evaluate(operator: &str, lhs: &Value, rhs: &Value) -> Result<bool, CoreError> {
    Ok(Operator::parse(operator)?.apply(lhs, rhs))
}

// ── Comparison ───────────────────────────────────────────────────────

/// Three-way comparison after coercing text to the other side's type.
///
/// Arrays and objects only ever compare equal or unequal.
fn compare(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs, rhs) {
        (Value::Null, _) | (_, Value::Null) => None,
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::String(s)) => {
            let b = parse_number(s)?;
            compare_numbers(a, &b)
        }
        (Value::String(_), Value::Number(_)) => compare(rhs, lhs).map(Ordering::reverse),
        (Value::Bool(a), Value::String(s)) => parse_bool(s).map(|b| a.cmp(&b)),
        (Value::String(_), Value::Bool(_)) => compare(rhs, lhs).map(Ordering::reverse),
        (Value::Array(_) | Value::Object(_), Value::String(s)) => {
            let parsed: Value = serde_json::from_str(s).ok()?;
            structural(lhs, &parsed)
        }
        (Value::String(_), Value::Array(_) | Value::Object(_)) => compare(rhs, lhs),
        (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => {
            structural(lhs, rhs)
        }
        _ => None,
    }
}

/// Like [`compare`], but refuses structural values so `<` and friends never
/// match arrays or objects.
fn ordered(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    if is_structural(lhs) || is_structural(rhs) {
        return None;
    }
    compare(lhs, rhs)
}

fn structural(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    if !is_structural(rhs) {
        return None;
    }
    // No ordering is defined; any non-equal pair is reported as `Less`.
    Some(if lhs == rhs {
        Ordering::Equal
    } else {
        Ordering::Less
    })
}

fn is_structural(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

fn compare_numbers(a: &serde_json::Number, b: &serde_json::Number) -> Option<Ordering> {
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => Some(x.cmp(&y)),
        _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

fn parse_number(raw: &str) -> Option<serde_json::Number> {
    let raw = raw.trim();
    raw.parse::<i64>()
        .map(serde_json::Number::from)
        .ok()
        .or_else(|| raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64))
}

/// Set members of an `IN` right-hand side. A scalar is a set of one.
fn members(rhs: &Value) -> Box<dyn Iterator<Item = &Value> + '_> {
    match rhs {
        Value::Array(items) => Box::new(items.iter().filter(|v| !v.is_null())),
        other => Box::new(std::iter::once(other)),
    }
}

// ── LIKE patterns ────────────────────────────────────────────────────

/// SQL `LIKE` with `%` and `_` wildcards and `\` escapes. `None` when
/// either side is not text.
fn like(lhs: &Value, rhs: &Value, case_insensitive: bool) -> Option<bool> {
    let text = match lhs {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    let pattern = rhs.as_str()?;
    let (text, pattern) = if case_insensitive {
        (text.to_lowercase(), pattern.to_lowercase())
    } else {
        (text, pattern.to_owned())
    };
    let text: Vec<char> = text.chars().collect();
    Some(like_match(&text, &tokenize(&pattern)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    /// `%`, with consecutive runs merged into one.
    AnyRun,
    /// `_`
    One,
    Literal(char),
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        let token = match c {
            '%' if tokens.last() == Some(&Token::AnyRun) => continue,
            '%' => Token::AnyRun,
            '_' => Token::One,
            '\\' => Token::Literal(chars.next().unwrap_or('\\')),
            other => Token::Literal(other),
        };
        tokens.push(token);
    }
    tokens
}

/// Iterative wildcard match. On a mismatch it retries from the last `%`,
/// one text position further, so the cost stays within O(text × pattern).
fn like_match(text: &[char], pattern: &[Token]) -> bool {
    let (mut t, mut p) = (0, 0);
    // (pattern index after the last `%`, text index it was tried against)
    let mut retry: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some(Token::AnyRun) => {
                p += 1;
                retry = Some((p, t));
                continue;
            }
            Some(Token::One) => {
                t += 1;
                p += 1;
                continue;
            }
            Some(Token::Literal(c)) if *c == text[t] => {
                t += 1;
                p += 1;
                continue;
            }
            _ => {}
        }
        match retry {
            Some((after, from)) => {
                p = after;
                t = from + 1;
                retry = Some((after, from + 1));
            }
            None => return false,
        }
    }
    pattern[p..].iter().all(|token| *token == Token::AnyRun)
}
