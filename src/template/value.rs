//! Runtime argument values substituted into command templates

use std::borrow::Cow;
use std::collections::HashMap;

/// A single runtime value bound to a placeholder name
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    Float(f64),
    /// Kept apart from `Float` so single-precision values print at their
    /// own shortest width ("1.1", not "1.100000023841858").
    Float32(f32),
    Bool(bool),
    /// Rendered as one token with elements joined by a single space
    List(Vec<ArgValue>),
}

impl ArgValue {
    pub fn is_list(&self) -> bool {
        matches!(self, ArgValue::List(_))
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Str(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Str(value)
    }
}

impl From<&String> for ArgValue {
    fn from(value: &String) -> Self {
        ArgValue::Str(value.clone())
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        ArgValue::Int(i64::from(value))
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Int(value)
    }
}

impl From<u32> for ArgValue {
    fn from(value: u32) -> Self {
        ArgValue::Int(i64::from(value))
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        ArgValue::Float(value)
    }
}

impl From<f32> for ArgValue {
    fn from(value: f32) -> Self {
        ArgValue::Float32(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

impl<T: Into<ArgValue>> From<Vec<T>> for ArgValue {
    fn from(values: Vec<T>) -> Self {
        ArgValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ArgValue> + Clone> From<&[T]> for ArgValue {
    fn from(values: &[T]) -> Self {
        ArgValue::List(values.iter().cloned().map(Into::into).collect())
    }
}

/// Placeholder name to value mapping supplied at call time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: HashMap<String, ArgValue>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chainable insert: `Args::new().with("id", 7).with("field", "name")`
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ArgValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Layer `defaults` underneath these arguments.
    ///
    /// Existing entries always win. The receiver is never modified; when no
    /// default is missing the borrowed view is returned as is.
    pub fn layered_over<'a>(&'a self, defaults: &Args) -> Cow<'a, Args> {
        let missing: Vec<(&String, &ArgValue)> = defaults
            .values
            .iter()
            .filter(|(name, _)| !self.values.contains_key(name.as_str()))
            .collect();

        if missing.is_empty() {
            return Cow::Borrowed(self);
        }

        let mut merged = self.clone();
        for (name, value) in missing {
            merged.values.insert(name.clone(), value.clone());
        }
        Cow::Owned(merged)
    }
}

impl<K: Into<String>, V: Into<ArgValue>> FromIterator<(K, V)> for Args {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Args::new();
        for (name, value) in iter {
            args.insert(name, value);
        }
        args
    }
}
