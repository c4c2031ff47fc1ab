//! Per-call arguments

use super::options::OptionSet;

/// Arguments for a single svn invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArguments {
    /// Flags expanded through [`OptionSet::serialize`]
    KeyedOptions(OptionSet),
    /// Already-ordered tokens, passed through unchanged
    PositionalList(Vec<String>),
    /// One bare token
    SingleValue(String),
}

impl CallArguments {
    pub fn positional<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::PositionalList(items.into_iter().map(Into::into).collect())
    }

    /// Flatten into argument tokens.
    pub fn into_argv(self) -> Vec<String> {
        match self {
            CallArguments::KeyedOptions(options) => options.serialize(),
            CallArguments::PositionalList(items) => items,
            CallArguments::SingleValue(value) => vec![value],
        }
    }
}

impl From<OptionSet> for CallArguments {
    fn from(options: OptionSet) -> Self {
        Self::KeyedOptions(options)
    }
}

impl From<Vec<String>> for CallArguments {
    fn from(items: Vec<String>) -> Self {
        Self::PositionalList(items)
    }
}

impl From<String> for CallArguments {
    fn from(value: String) -> Self {
        Self::SingleValue(value)
    }
}

impl From<&str> for CallArguments {
    fn from(value: &str) -> Self {
        Self::SingleValue(value.to_string())
    }
}
