//! Option values and their expansion into argument tokens
//!
//! An [`OptionSet`] is an ordered association list of `flag -> value`.
//! Serialization walks it in insertion order, so the argument vector
//! handed to svn is deterministic.

use std::fmt;

/// Value attached to a flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Flag alone, no value token (e.g. `--xml`)
    Flag,
    /// Flag followed by one value (e.g. `--revision 42`)
    Scalar(String),
    /// Flag followed by every element, in order
    List(Vec<String>),
}

impl OptionValue {
    /// Scalar from anything printable.
    pub fn scalar(value: impl fmt::Display) -> Self {
        Self::Scalar(value.to_string())
    }

    /// List from any sequence of string-likes.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Expand `flag` with this value into argument tokens.
    ///
    /// - `Flag` → `[flag]`
    /// - `Scalar(v)` → `[flag, v]`
    /// - `List(xs)` → `[flag, xs...]`
    pub fn expand(&self, flag: &str) -> Vec<String> {
        match self {
            OptionValue::Flag => vec![flag.to_string()],
            OptionValue::Scalar(value) => vec![flag.to_string(), value.clone()],
            OptionValue::List(items) => {
                let mut tokens = Vec::with_capacity(items.len() + 1);
                tokens.push(flag.to_string());
                tokens.extend(items.iter().cloned());
                tokens
            }
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// Ordered `flag -> value` mapping.
///
/// Re-inserting a flag replaces its value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    entries: Vec<(String, OptionValue)>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `flag`.
    pub fn insert(&mut self, flag: impl Into<String>, value: OptionValue) -> &mut Self {
        let flag = flag.into();
        match self.entries.iter_mut().find(|(k, _)| *k == flag) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((flag, value)),
        }
        self
    }

    /// Builder form of [`OptionSet::insert`].
    pub fn with(mut self, flag: impl Into<String>, value: OptionValue) -> Self {
        self.insert(flag, value);
        self
    }

    /// Builder shorthand for a bare flag.
    pub fn flag(self, flag: impl Into<String>) -> Self {
        self.with(flag, OptionValue::Flag)
    }

    pub fn get(&self, flag: &str) -> Option<&OptionValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == flag)
            .map(|(_, v)| v)
    }

    pub fn remove(&mut self, flag: &str) -> Option<OptionValue> {
        let idx = self.entries.iter().position(|(k, _)| k == flag)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flatten all entries into argument tokens, in insertion order.
    pub fn serialize(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|(flag, value)| value.expand(flag))
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, OptionValue)> for OptionSet {
    fn from_iter<T: IntoIterator<Item = (K, OptionValue)>>(iter: T) -> Self {
        let mut set = OptionSet::new();
        for (flag, value) in iter {
            set.insert(flag, value);
        }
        set
    }
}
