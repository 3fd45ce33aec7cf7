use super::{
    value::Value,
    vars::{Temps, Variables},
};
use crate::common::Int;
use std::fmt;

/// One entry of [Outcome::meta].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MetaItem {
    Int(Int),
    Str(String),
}

impl MetaItem {
    pub fn as_int(&self) -> Option<Int> {
        match self {
            Self::Int(x) => Some(*x),
            Self::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Int(_) => None,
            Self::Str(s) => Some(s),
        }
    }
}

impl fmt::Display for MetaItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(x) => write!(f, "{}", x),
            Self::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// The result of a successful roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub value: Int,
    pub min: Int,
    pub max: Int,
    /// `value`, then the individual results, temp slots and variables when there are any,
    /// e.g. `14 [6,5,3] temp:{t1=7} vt:{T1=7}`.
    pub detail: String,
    pub meta: Vec<MetaItem>,
}

impl Outcome {
    pub(crate) fn assemble(value: &Value, temps: &Temps, vars: &Variables) -> Self {
        let number = value.number();
        let meta: Vec<MetaItem> = match value {
            Value::Strings(items) => items.iter().cloned().map(MetaItem::Str).collect(),
            Value::List { items, .. } => items.iter().copied().map(MetaItem::Int).collect(),
            Value::Scalar(_) | Value::Temp { .. } => Vec::new(),
        };

        let mut detail = number.to_string();
        if value.is_tuple() {
            detail.push_str(&format!(" [{}]", join(&meta, |m| m.to_string())));
        }
        if !temps.is_empty() {
            detail.push_str(&format!(" temp:{{{}}}", join(temps, |(k, v)| format!("t{}={}", k, v))));
        }
        if !vars.is_empty() {
            detail.push_str(&format!(" vt:{{{}}}", join(vars.iter(), |(k, v)| format!("{}={}", k, v))));
        }

        Self {
            value: number,
            min: number,
            max: number,
            detail,
            meta,
        }
    }

    /// The integer entries of [Outcome::meta].
    pub fn meta_ints(&self) -> Vec<Int> {
        self.meta.iter().filter_map(MetaItem::as_int).collect()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detail)
    }
}

fn join<I: IntoIterator>(items: I, f: impl Fn(I::Item) -> String) -> String {
    items.into_iter().map(f).collect::<Vec<_>>().join(",")
}
