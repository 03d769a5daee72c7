//! Shared helpers for command handlers.

use serde_json::Value;

use huefdw_core::{Qualifier, ResourceKind};

use crate::cli::Kind;
use crate::error::CliError;

impl From<Kind> for ResourceKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Lights => Self::Lights,
            Kind::Sensors => Self::Sensors,
            Kind::Scenes => Self::Scenes,
            Kind::Config => Self::Config,
        }
    }
}

/// Word operators, longest first so `NOT IN` wins over `IN`.
const WORD_OPERATORS: &[&str] = &["NOT ILIKE", "NOT LIKE", "NOT IN", "ILIKE", "LIKE", "IN"];

/// Symbol operators, longest first so `>=` wins over `>`.
const SYMBOL_OPERATORS: &[&str] = &[
    "!~~*", "!~~", "~~*", "~~", "<>", "!=", ">=", "<=", "=", "<", ">",
];

/// Parse `"COLUMN OP VALUE"`, e.g. `"bri >= 100"` or `"light_id in 1,3"`.
///
/// The value is read as JSON when it parses (`100`, `true`, `"Hall"`),
/// otherwise taken as text. `IN` lists accept `1,3` or `[1,3]`.
pub fn parse_qualifier(raw: &str) -> Result<Qualifier, CliError> {
    let invalid = |reason: &str| CliError::Validation {
        field: "where".into(),
        reason: format!("{reason} in '{raw}'"),
    };

    let raw_trimmed = raw.trim_start();
    let split = raw_trimmed
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(raw_trimmed.len());
    let (column, rest) = raw_trimmed.split_at(split);
    if column.is_empty() {
        return Err(invalid("missing column"));
    }
    let rest = rest.trim_start();

    let (operator, value) = split_operator(rest).ok_or_else(|| invalid("missing operator"))?;
    let value = value.trim();
    if value.is_empty() {
        return Err(invalid("missing value"));
    }

    let is_list = matches!(operator.as_str(), "IN" | "NOT IN");
    let value = if is_list {
        parse_list(value)
    } else {
        parse_value(value)
    };
    Ok(Qualifier::new(column, operator, value))
}

fn split_operator(rest: &str) -> Option<(String, &str)> {
    let upper = rest.to_ascii_uppercase();
    for op in WORD_OPERATORS {
        let matched = upper.starts_with(op)
            && upper[op.len()..].starts_with(|c: char| c.is_whitespace() || c == '[');
        if matched {
            return Some(((*op).to_owned(), &rest[op.len()..]));
        }
    }
    SYMBOL_OPERATORS
        .iter()
        .find(|op| rest.starts_with(**op))
        .map(|op| ((*op).to_owned(), &rest[op.len()..]))
}

/// Parse `COLUMN=VALUE`. The value follows the same rules as qualifiers.
pub fn parse_assignment(raw: &str) -> Result<(String, Value), CliError> {
    let (column, value) = raw.split_once('=').ok_or_else(|| CliError::Validation {
        field: "set".into(),
        reason: format!("expected COLUMN=VALUE, got '{raw}'"),
    })?;
    let column = column.trim();
    if column.is_empty() {
        return Err(CliError::Validation {
            field: "set".into(),
            reason: format!("missing column in '{raw}'"),
        });
    }
    Ok((column.to_owned(), parse_value(value.trim())))
}

/// JSON when it parses, otherwise the raw text.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

fn parse_list(raw: &str) -> Value {
    if raw.starts_with('[') {
        if let Ok(list @ Value::Array(_)) = serde_json::from_str(raw) {
            return list;
        }
    }
    Value::Array(
        raw.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(parse_value)
            .collect(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn qualifier_with_symbol_operator() {
        let q = parse_qualifier("bri >= 100").unwrap();
        assert_eq!(q.column, "bri");
        assert_eq!(q.operator, ">=");
        assert_eq!(q.value, json!(100));

        let q = parse_qualifier("name<>Hall lamp").unwrap();
        assert_eq!(q.operator, "<>");
        assert_eq!(q.value, json!("Hall lamp"));
    }

    #[test]
    fn qualifier_with_word_operator() {
        let q = parse_qualifier("light_id not in 1, 3").unwrap();
        assert_eq!(q.operator, "NOT IN");
        assert_eq!(q.value, json!([1, 3]));

        let q = parse_qualifier("light_id IN [2,\"4\"]").unwrap();
        assert_eq!(q.operator, "IN");
        assert_eq!(q.value, json!([2, "4"]));

        let q = parse_qualifier("name ilike %desk%").unwrap();
        assert_eq!(q.operator, "ILIKE");
        assert_eq!(q.value, json!("%desk%"));
    }

    #[test]
    fn column_named_like_an_operator_prefix() {
        let q = parse_qualifier("internalipaddress = 10.0.0.2").unwrap();
        assert_eq!(q.column, "internalipaddress");
        assert_eq!(q.value, json!("10.0.0.2"));
    }

    #[test]
    fn malformed_qualifiers() {
        assert!(parse_qualifier("= 1").is_err());
        assert!(parse_qualifier("bri").is_err());
        assert!(parse_qualifier("bri >=").is_err());
        assert!(parse_qualifier("bri ?? 1").is_err());
    }

    #[test]
    fn assignments() {
        assert_eq!(parse_assignment("on=true").unwrap(), ("on".into(), json!(true)));
        assert_eq!(parse_assignment("hue = 25000").unwrap(), ("hue".into(), json!(25000)));
        assert_eq!(
            parse_assignment("name=Desk=left").unwrap(),
            ("name".into(), json!("Desk=left"))
        );
        assert!(parse_assignment("on").is_err());
        assert!(parse_assignment("=1").is_err());
    }
}
