use super::{ctx::RollContext, roller::Roller, value::Value, RResult};
use crate::common::Int;
use tracing::debug;

/// Builds the value of a `[...]` literal from the text between its brackets.
///
/// Elements are split on top-level commas. If every element is an integer the result is
/// a list summing to its elements, otherwise every element is kept as unevaluated text.
pub(crate) fn parse_literal(inner: &str) -> Value {
    let elements = split_elements(inner);
    let ints: Option<Vec<Int>> = elements.iter().map(|e| e.parse().ok()).collect();
    match ints {
        Some(items) => Value::list(items),
        None => Value::strings(elements),
    }
}

fn split_elements(inner: &str) -> Vec<String> {
    let mut elements = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut in_string = false;

    for c in inner.chars() {
        match c {
            '"' => in_string = !in_string,
            _ if in_string => {}
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            ',' if depth == 0 => {
                elements.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    elements.push(current);

    elements
        .into_iter()
        .map(|e| e.trim().to_owned())
        .filter(|e| !e.is_empty())
        .collect()
}

impl<R: Roller> RollContext<'_, R> {
    /// The integers behind `value`, evaluating string elements as expressions whose
    /// variable writes stay visible to the caller.
    pub(crate) fn resolve_shared(&mut self, value: &Value) -> Option<Vec<Int>> {
        self.resolve_with(value, Self::eval_nested_shared)
    }

    /// Like [RollContext::resolve_shared], but each element sees its own copy of the
    /// variable table.
    pub(crate) fn resolve_isolated(&mut self, value: &Value) -> Option<Vec<Int>> {
        self.resolve_with(value, Self::eval_nested_isolated)
    }

    fn resolve_with(
        &mut self,
        value: &Value,
        eval: fn(&mut Self, &str) -> RResult<Value>,
    ) -> Option<Vec<Int>> {
        let elements = match value {
            Value::List { items, .. } => return Some(items.clone()),
            Value::Strings(elements) => elements,
            other => return Some(vec![other.number()]),
        };

        let mut resolved = Vec::with_capacity(elements.len());
        for element in elements.iter() {
            match eval(self, element) {
                Ok(v) => resolved.push(v.number()),
                Err(e) => {
                    debug!(%element, error = %e, "tuple element failed");
                    return None;
                }
            }
        }
        Some(resolved)
    }
}
