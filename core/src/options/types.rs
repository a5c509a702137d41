//! options/types.rs
//! Option values, the `Options` container and typed lookups.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::JitError;

/// Thread-safety class a configurable declares under `pressio:thread_safe`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadSafety {
    /// Only one instance may be used at a time.
    Single,
    /// Instances may be used concurrently if calls are serialized.
    Serialized,
    /// Distinct instances may be used concurrently.
    Multiple,
}

/// A single typed option value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionValue {
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    Str(String),
    Strings(Vec<String>),
    ThreadSafety(ThreadSafety),
    /// Key declared without a value.
    Unset,
}

impl OptionValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            OptionValue::I32(_) => "i32",
            OptionValue::U32(_) => "u32",
            OptionValue::I64(_) => "i64",
            OptionValue::U64(_) => "u64",
            OptionValue::F64(_) => "f64",
            OptionValue::Bool(_) => "bool",
            OptionValue::Str(_) => "string",
            OptionValue::Strings(_) => "strings",
            OptionValue::ThreadSafety(_) => "thread_safety",
            OptionValue::Unset => "unset",
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::I32(v) => write!(f, "{}", v),
            OptionValue::U32(v) => write!(f, "{}", v),
            OptionValue::I64(v) => write!(f, "{}", v),
            OptionValue::U64(v) => write!(f, "{}", v),
            OptionValue::F64(v) => write!(f, "{}", v),
            OptionValue::Bool(v) => write!(f, "{}", v),
            OptionValue::Str(v) => write!(f, "{:?}", v),
            OptionValue::Strings(v) => write!(f, "{:?}", v),
            OptionValue::ThreadSafety(v) => write!(f, "{:?}", v),
            OptionValue::Unset => write!(f, "<unset>"),
        }
    }
}

impl From<i32> for OptionValue { fn from(v: i32) -> Self { OptionValue::I32(v) } }
impl From<u32> for OptionValue { fn from(v: u32) -> Self { OptionValue::U32(v) } }
impl From<i64> for OptionValue { fn from(v: i64) -> Self { OptionValue::I64(v) } }
impl From<u64> for OptionValue { fn from(v: u64) -> Self { OptionValue::U64(v) } }
impl From<f64> for OptionValue { fn from(v: f64) -> Self { OptionValue::F64(v) } }
impl From<bool> for OptionValue { fn from(v: bool) -> Self { OptionValue::Bool(v) } }
impl From<String> for OptionValue { fn from(v: String) -> Self { OptionValue::Str(v) } }
impl From<&str> for OptionValue { fn from(v: &str) -> Self { OptionValue::Str(v.to_string()) } }
impl From<Vec<String>> for OptionValue { fn from(v: Vec<String>) -> Self { OptionValue::Strings(v) } }
impl From<ThreadSafety> for OptionValue { fn from(v: ThreadSafety) -> Self { OptionValue::ThreadSafety(v) } }

impl From<Vec<&str>> for OptionValue {
    fn from(v: Vec<&str>) -> Self {
        OptionValue::Strings(v.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for OptionValue {
    fn from(v: [&str; N]) -> Self {
        OptionValue::Strings(v.iter().map(|s| s.to_string()).collect())
    }
}

/// Result of a typed lookup.
#[derive(Debug, PartialEq)]
pub enum OptionLookup<T> {
    /// Key present with a value of the requested type.
    Set(T),
    /// Key present but declared without a value.
    Unset,
    /// Key absent.
    Missing,
    /// Key present with a value of another type.
    TypeMismatch { found: &'static str },
}

impl<T> OptionLookup<T> {
    pub fn is_set(&self) -> bool {
        matches!(self, OptionLookup::Set(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            OptionLookup::Set(v) => Some(v),
            _ => None,
        }
    }

    /// Converts a type mismatch into a validation error; absent/unset → `None`.
    pub fn require(self, key: &str, expected: &str) -> Result<Option<T>, JitError> {
        match self {
            OptionLookup::Set(v) => Ok(Some(v)),
            OptionLookup::Unset | OptionLookup::Missing => Ok(None),
            OptionLookup::TypeMismatch { found } => Err(JitError::Validation(format!(
                "option {} expects {}, found {}",
                key, expected, found
            ))),
        }
    }
}

/// Ordered key → value configuration container.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options {
    entries: BTreeMap<String, OptionValue>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `set`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<OptionValue> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merge `other` into `self`; keys in `other` win.
    pub fn copy_from(&mut self, other: &Options) {
        for (k, v) in &other.entries {
            self.entries.insert(k.clone(), v.clone());
        }
    }

    pub fn get_str(&self, key: &str) -> OptionLookup<&str> {
        match self.entries.get(key) {
            Some(OptionValue::Str(s)) => OptionLookup::Set(s.as_str()),
            Some(OptionValue::Unset) => OptionLookup::Unset,
            Some(other) => OptionLookup::TypeMismatch { found: other.type_name() },
            None => OptionLookup::Missing,
        }
    }

    pub fn get_strings(&self, key: &str) -> OptionLookup<&[String]> {
        match self.entries.get(key) {
            Some(OptionValue::Strings(v)) => OptionLookup::Set(v.as_slice()),
            Some(OptionValue::Unset) => OptionLookup::Unset,
            Some(other) => OptionLookup::TypeMismatch { found: other.type_name() },
            None => OptionLookup::Missing,
        }
    }

    pub fn get_i32(&self, key: &str) -> OptionLookup<i32> {
        match self.entries.get(key) {
            Some(OptionValue::I32(v)) => OptionLookup::Set(*v),
            Some(OptionValue::Unset) => OptionLookup::Unset,
            Some(other) => OptionLookup::TypeMismatch { found: other.type_name() },
            None => OptionLookup::Missing,
        }
    }

    pub fn get_thread_safety(&self, key: &str) -> OptionLookup<ThreadSafety> {
        match self.entries.get(key) {
            Some(OptionValue::ThreadSafety(v)) => OptionLookup::Set(*v),
            Some(OptionValue::Unset) => OptionLookup::Unset,
            Some(other) => OptionLookup::TypeMismatch { found: other.type_name() },
            None => OptionLookup::Missing,
        }
    }

    pub fn to_json(&self) -> Result<String, JitError> {
        serde_json::to_string(self)
            .map_err(|e| JitError::Validation(format!("options not serializable: {}", e)))
    }

    pub fn from_json(json: &str) -> Result<Self, JitError> {
        if json.trim().is_empty() {
            return Ok(Options::new());
        }
        serde_json::from_str(json)
            .map_err(|e| JitError::Validation(format!("malformed options payload: {}", e)))
    }
}

impl<K, V> FromIterator<(K, V)> for Options
where
    K: Into<String>,
    V: Into<OptionValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut opts = Options::new();
        for (k, v) in iter {
            opts.set(k, v);
        }
        opts
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, v) in &self.entries {
            writeln!(f, "{} <{}> = {}", k, v.type_name(), v)?;
        }
        Ok(())
    }
}
