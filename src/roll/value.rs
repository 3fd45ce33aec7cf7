use crate::common::{Int, NonEmpty};

/// Anything that can sit on the evaluation stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Scalar(Int),
    /// A pool of integers with its declared total. The total is not always the sum,
    /// e.g. `a` counts successes.
    List { total: Int, items: Vec<Int> },
    /// Unevaluated tuple elements or expanded string templates.
    Strings(NonEmpty<String>),
    /// A temp slot reference, with the value it held when it was pushed.
    Temp { index: Int, value: Int },
}

impl Value {
    /// A list whose total is the sum of its items.
    pub fn list(items: Vec<Int>) -> Self {
        Self::List {
            total: Self::sum(&items),
            items,
        }
    }

    /// A list, or a bare scalar when nothing ended up in the pool.
    pub(crate) fn pool(total: Int, items: Vec<Int>) -> Self {
        if items.is_empty() {
            Self::Scalar(total)
        } else {
            Self::List { total, items }
        }
    }

    pub fn strings(items: Vec<String>) -> Self {
        match NonEmpty::try_from_vec(items) {
            Ok(items) => Self::Strings(items),
            Err(_) => Self::list(Vec::new()),
        }
    }

    pub(crate) fn sum(items: &[Int]) -> Int {
        items.iter().fold(0, |acc: Int, x| acc.wrapping_add(*x))
    }

    /// The scalar view of this value.
    pub fn number(&self) -> Int {
        match self {
            Self::Scalar(x) => *x,
            Self::List { total, .. } => *total,
            Self::Strings(_) => 0,
            Self::Temp { value, .. } => *value,
        }
    }

    pub fn items(&self) -> Option<&[Int]> {
        match self {
            Self::List { items, .. } => Some(items),
            _ => None,
        }
    }

    /// Whether this came from a tuple or pool rather than a single number.
    pub fn is_tuple(&self) -> bool {
        matches!(self, Self::List { .. } | Self::Strings(_))
    }

    /// The last item of a non-empty pool, otherwise [Value::number].
    pub(crate) fn last_or_number(&self) -> Int {
        match self.items().and_then(<[Int]>::last) {
            Some(x) => *x,
            None => self.number(),
        }
    }
}
