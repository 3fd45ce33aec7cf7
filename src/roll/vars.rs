use crate::common::Int;
use std::collections::{BTreeMap, HashMap};

/// Temp variable slots written by `$tN=...`, ordered by index.
pub type Temps = BTreeMap<Int, Int>;

/// Named integers available to `{NAME}` placeholders. Names are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables(BTreeMap<String, Int>);

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Int> {
        self.0.get(&name.to_uppercase()).copied()
    }

    pub fn insert(&mut self, name: &str, value: Int) -> Option<Int> {
        self.0.insert(name.to_uppercase(), value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in key order, keys upper-cased.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Int)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// The mirror of temp slot `index`.
    pub(crate) fn temp_key(index: Int) -> String {
        format!("T{}", index)
    }
}

impl<K: AsRef<str>> Extend<(K, Int)> for Variables {
    fn extend<I: IntoIterator<Item = (K, Int)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k.as_ref(), v);
        }
    }
}

impl<K: AsRef<str>> FromIterator<(K, Int)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, Int)>>(iter: I) -> Self {
        let mut vars = Self::new();
        vars.extend(iter);
        vars
    }
}

impl<K: AsRef<str>, const N: usize> From<[(K, Int); N]> for Variables {
    fn from(entries: [(K, Int); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K: AsRef<str>> From<HashMap<K, Int>> for Variables {
    fn from(map: HashMap<K, Int>) -> Self {
        map.into_iter().collect()
    }
}
