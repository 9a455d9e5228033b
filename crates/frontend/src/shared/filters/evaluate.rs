use contracts::shared::filters::{FilterCriterion, FilterOperator};
use serde_json::Value;

/// Trait для типов записей, поддерживающих фильтрацию по пути поля
pub trait Filterable {
    /// Resolve a dotted field path; `None` when the path does not lead to a value
    fn field_value(&self, path: &str) -> Option<Value>;
}

impl Filterable for Value {
    fn field_value(&self, path: &str) -> Option<Value> {
        resolve_path(self, path).cloned()
    }
}

/// Walk a dotted path ("customer.balance") through a JSON record
///
/// A missing segment, a missing terminal or an explicit JSON null resolves
/// to `None`.
pub fn resolve_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Decide whether one record satisfies one criterion
///
/// A field that does not resolve never matches, for every operator including
/// the negated ones (`notEquals`, `notContains`, `notIn`): absence of data
/// does not satisfy a filter. Structurally malformed values (`between`
/// without a [min, max] pair, `in` without an array) also never match.
pub fn evaluate<T: Filterable>(item: &T, criterion: &FilterCriterion) -> bool {
    let Some(actual) = item.field_value(&criterion.field) else {
        return false;
    };
    let expected = &criterion.value;

    match criterion.operator {
        FilterOperator::Equals => values_equal(&actual, expected),
        FilterOperator::NotEquals => !values_equal(&actual, expected),
        FilterOperator::Contains => text_match(&actual, expected, |a, b| a.contains(b)),
        FilterOperator::NotContains => text_match(&actual, expected, |a, b| !a.contains(b)),
        FilterOperator::StartsWith => text_match(&actual, expected, |a, b| a.starts_with(b)),
        FilterOperator::EndsWith => text_match(&actual, expected, |a, b| a.ends_with(b)),
        FilterOperator::GreaterThan => number_match(&actual, expected, |a, b| a > b),
        FilterOperator::LessThan => number_match(&actual, expected, |a, b| a < b),
        FilterOperator::GreaterThanOrEqual => number_match(&actual, expected, |a, b| a >= b),
        FilterOperator::LessThanOrEqual => number_match(&actual, expected, |a, b| a <= b),
        FilterOperator::Between => between_match(&actual, expected),
        FilterOperator::In => expected
            .as_array()
            .map(|list| list.iter().any(|v| values_equal(&actual, v)))
            .unwrap_or(false),
        FilterOperator::NotIn => expected
            .as_array()
            .map(|list| !list.iter().any(|v| values_equal(&actual, v)))
            .unwrap_or(false),
    }
}

/// Reduce a collection under a criteria list (logical AND of all criteria)
///
/// An empty criteria list returns the input unchanged without iterating.
pub fn apply_all<T: Filterable>(items: Vec<T>, criteria: &[FilterCriterion]) -> Vec<T> {
    if criteria.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| criteria.iter().all(|criterion| evaluate(item, criterion)))
        .collect()
}

/// Strict equality, with numbers compared numerically (1500 == 1500.0)
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn text_match(actual: &Value, expected: &Value, test: impl Fn(&str, &str) -> bool) -> bool {
    match (as_text(actual), as_text(expected)) {
        (Some(a), Some(b)) => test(&a, &b),
        _ => false,
    }
}

fn number_match(actual: &Value, expected: &Value, test: impl Fn(f64, f64) -> bool) -> bool {
    match (as_number(actual), as_number(expected)) {
        (Some(a), Some(b)) => test(a, b),
        _ => false,
    }
}

/// Inclusive range check, `value` must be a [min, max] pair
fn between_match(actual: &Value, expected: &Value) -> bool {
    let Some(x) = as_number(actual) else {
        return false;
    };
    let Some(pair) = expected.as_array() else {
        return false;
    };
    if pair.len() != 2 {
        return false;
    }
    match (as_number(&pair[0]), as_number(&pair[1])) {
        (Some(lo), Some(hi)) => lo <= x && x <= hi,
        _ => false,
    }
}

/// Lowercase text form of a scalar; arrays and objects have none
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.to_lowercase()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Numeric form of a scalar; numeric strings parse
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
