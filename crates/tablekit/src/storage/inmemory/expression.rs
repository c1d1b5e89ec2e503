//! The subset of the expression language the in-memory service understands.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde_json::Value;
use tablekit_core::{Document, ServiceError, ServiceResult};

/// One clause of a condition expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Exists(String),
    NotExists(String),
    Equals(String, Value),
}

/// Sort key comparison of a key condition expression.
#[derive(Debug, Clone, PartialEq)]
pub enum SortCondition {
    Eq(Value),
    Lt(Value),
    Le(Value),
    Gt(Value),
    Ge(Value),
    Between(Value, Value),
    BeginsWith(String),
}

impl SortCondition {
    pub fn matches(&self, value: &Value) -> bool {
        let cmp = |other: &Value| compare_values(value, other);
        match self {
            SortCondition::Eq(v) => cmp(v) == Some(Ordering::Equal),
            SortCondition::Lt(v) => cmp(v) == Some(Ordering::Less),
            SortCondition::Le(v) => matches!(cmp(v), Some(Ordering::Less | Ordering::Equal)),
            SortCondition::Gt(v) => cmp(v) == Some(Ordering::Greater),
            SortCondition::Ge(v) => {
                matches!(cmp(v), Some(Ordering::Greater | Ordering::Equal))
            }
            SortCondition::Between(low, high) => {
                matches!(cmp(low), Some(Ordering::Greater | Ordering::Equal))
                    && matches!(cmp(high), Some(Ordering::Less | Ordering::Equal))
            }
            SortCondition::BeginsWith(prefix) => value
                .as_str()
                .is_some_and(|value| value.starts_with(prefix.as_str())),
        }
    }
}

/// A parsed key condition: partition key equality plus an optional sort key test.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyCondition {
    pub partition_key: String,
    pub partition_value: Value,
    pub sort: Option<(String, SortCondition)>,
}

/// Orders two scalar attribute values. Mixed or non-scalar types do not compare.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Splits an expression on its top-level `AND`s, keeping `BETWEEN x AND y` whole.
fn split_and(expression: &str) -> ServiceResult<Vec<String>> {
    let mut clauses = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut in_between = false;

    for token in expression.split_whitespace() {
        if token.eq_ignore_ascii_case("AND") && !in_between {
            clauses.push(current.join(" "));
            current.clear();
            continue;
        }
        if token.eq_ignore_ascii_case("AND") {
            in_between = false;
        } else if token.eq_ignore_ascii_case("BETWEEN") {
            in_between = true;
        }
        current.push(token);
    }
    clauses.push(current.join(" "));

    if clauses.iter().any(String::is_empty) {
        return Err(ServiceError::validation(format!(
            "Invalid expression: Syntax error; expression: {expression}"
        )));
    }

    Ok(clauses)
}

fn function_argument<'a>(clause: &'a str, function: &str) -> Option<&'a str> {
    clause
        .strip_prefix(function)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
        .map(str::trim)
}

fn lookup_value(placeholder: &str, values: Option<&Document>) -> ServiceResult<Value> {
    if !placeholder.starts_with(':') {
        return Err(ServiceError::validation(format!(
            "Invalid expression: unexpected operand: {placeholder}"
        )));
    }

    values
        .and_then(|values| values.get(placeholder))
        .cloned()
        .ok_or_else(|| {
            ServiceError::validation(format!(
                "An expression attribute value used in expression is not defined; attribute value: {placeholder}"
            ))
        })
}

fn resolve_name(path: &str, names: Option<&BTreeMap<String, String>>) -> ServiceResult<String> {
    if !path.starts_with('#') {
        return Ok(path.to_string());
    }

    names
        .and_then(|names| names.get(path))
        .cloned()
        .ok_or_else(|| {
            ServiceError::validation(format!(
                "An expression attribute name used in the document path is not defined; attribute name: {path}"
            ))
        })
}

/// Parses `attribute_exists(a) AND attribute_not_exists(b) AND c = :v`.
pub fn parse_condition(expression: &str, values: Option<&Document>) -> ServiceResult<Vec<Condition>> {
    split_and(expression)?
        .iter()
        .map(|clause| {
            if let Some(path) = function_argument(clause, "attribute_exists") {
                return Ok(Condition::Exists(path.to_string()));
            }
            if let Some(path) = function_argument(clause, "attribute_not_exists") {
                return Ok(Condition::NotExists(path.to_string()));
            }
            if let Some((path, placeholder)) = clause.split_once('=') {
                let path = path.trim();
                if !path.contains(|c: char| c.is_whitespace() || "<>!(".contains(c)) {
                    let value = lookup_value(placeholder.trim(), values)?;
                    return Ok(Condition::Equals(path.to_string(), value));
                }
            }
            Err(ServiceError::validation(format!(
                "Invalid ConditionExpression: unsupported clause: {clause}"
            )))
        })
        .collect()
}

/// Whether every clause holds for `item` (`None` when the item does not exist).
pub fn evaluate(conditions: &[Condition], item: Option<&Document>) -> bool {
    conditions.iter().all(|condition| match condition {
        Condition::Exists(path) => item.is_some_and(|item| item.contains_key(path)),
        Condition::NotExists(path) => !item.is_some_and(|item| item.contains_key(path)),
        Condition::Equals(path, value) => item.and_then(|item| item.get(path)) == Some(value),
    })
}

fn parse_sort_clause(
    clause: &str,
    names: Option<&BTreeMap<String, String>>,
    values: Option<&Document>,
) -> ServiceResult<(String, SortCondition)> {
    if let Some(arguments) = function_argument(clause, "begins_with") {
        let (path, placeholder) = arguments.split_once(',').ok_or_else(|| {
            ServiceError::validation(format!("Invalid KeyConditionExpression: {clause}"))
        })?;
        let prefix = lookup_value(placeholder.trim(), values)?;
        let prefix = prefix.as_str().ok_or_else(|| {
            ServiceError::validation("Invalid KeyConditionExpression: begins_with expects a string")
        })?;
        return Ok((
            resolve_name(path.trim(), names)?,
            SortCondition::BeginsWith(prefix.to_string()),
        ));
    }

    let tokens: Vec<&str> = clause.split_whitespace().collect();
    if let [path, between, low, and, high] = tokens.as_slice() {
        if between.eq_ignore_ascii_case("BETWEEN") && and.eq_ignore_ascii_case("AND") {
            return Ok((
                resolve_name(path, names)?,
                SortCondition::Between(lookup_value(low, values)?, lookup_value(high, values)?),
            ));
        }
    }

    for operator in ["<=", ">=", "=", "<", ">"] {
        if let Some((path, placeholder)) = clause.split_once(operator) {
            let path = resolve_name(path.trim(), names)?;
            let value = lookup_value(placeholder.trim(), values)?;
            let condition = match operator {
                "<=" => SortCondition::Le(value),
                ">=" => SortCondition::Ge(value),
                "<" => SortCondition::Lt(value),
                ">" => SortCondition::Gt(value),
                _ => SortCondition::Eq(value),
            };
            return Ok((path, condition));
        }
    }

    Err(ServiceError::validation(format!(
        "Invalid KeyConditionExpression: unsupported clause: {clause}"
    )))
}

/// Parses a key condition against the partition key of the queried schema.
pub fn parse_key_condition(
    expression: &str,
    partition_key: &str,
    names: Option<&BTreeMap<String, String>>,
    values: Option<&Document>,
) -> ServiceResult<KeyCondition> {
    let clauses = split_and(expression)?;
    if clauses.len() > 2 {
        return Err(ServiceError::validation(
            "Invalid KeyConditionExpression: at most two key conditions are allowed",
        ));
    }

    let mut partition = None;
    let mut sort = None;
    for clause in &clauses {
        match parse_sort_clause(clause, names, values)? {
            (path, SortCondition::Eq(value)) if path == partition_key && partition.is_none() => {
                partition = Some(value);
            }
            (path, _) if path == partition_key => {
                return Err(ServiceError::validation(
                    "Query key condition not supported",
                ));
            }
            other => sort = Some(other),
        }
    }

    let partition_value = partition.ok_or_else(|| {
        ServiceError::validation(format!(
            "Query condition missed key schema element: {partition_key}"
        ))
    })?;

    Ok(KeyCondition {
        partition_key: partition_key.to_string(),
        partition_value,
        sort,
    })
}

/// Resolves a projection expression into attribute names.
pub fn parse_projection(
    expression: &str,
    names: Option<&BTreeMap<String, String>>,
) -> ServiceResult<Vec<String>> {
    expression
        .split(',')
        .map(|path| resolve_name(path.trim(), names))
        .collect()
}

/// Keeps only the listed top-level attributes.
pub fn project(item: &Document, attributes: &[String]) -> Document {
    item.iter()
        .filter(|(name, _)| attributes.contains(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}
