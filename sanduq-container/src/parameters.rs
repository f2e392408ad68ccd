//! Parameters and `%placeholder%` resolution.
//!
//! A string that is exactly `%name%` resolves to the raw parameter value
//! (which may be a list or a map). Placeholders embedded in a longer
//! string are interpolated; `%%` stands for a literal percent sign.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::trace;

use crate::error::{ContainerError, Result};

/// A parameter or argument value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<ParameterValue>),
    Map(BTreeMap<String, ParameterValue>),
}

impl ParameterValue {
    /// Returns the string content, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the scalar rendering used for interpolation.
    ///
    /// Lists and maps have no scalar form.
    pub fn to_scalar_string(&self) -> Option<String> {
        match self {
            ParameterValue::Null => Some(String::new()),
            ParameterValue::Bool(b) => Some(b.to_string()),
            ParameterValue::Integer(i) => Some(i.to_string()),
            ParameterValue::Float(x) => Some(x.to_string()),
            ParameterValue::String(s) => Some(s.clone()),
            ParameterValue::List(_) | ParameterValue::Map(_) => None,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Null => write!(f, "null"),
            ParameterValue::Bool(b) => write!(f, "{b}"),
            ParameterValue::Integer(i) => write!(f, "{i}"),
            ParameterValue::Float(x) => write!(f, "{x}"),
            ParameterValue::String(s) => write!(f, "{s:?}"),
            ParameterValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            ParameterValue::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<&str> for ParameterValue {
    fn from(s: &str) -> Self {
        ParameterValue::String(s.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(s: String) -> Self {
        ParameterValue::String(s)
    }
}

impl From<bool> for ParameterValue {
    fn from(b: bool) -> Self {
        ParameterValue::Bool(b)
    }
}

impl From<i64> for ParameterValue {
    fn from(i: i64) -> Self {
        ParameterValue::Integer(i)
    }
}

impl From<f64> for ParameterValue {
    fn from(x: f64) -> Self {
        ParameterValue::Float(x)
    }
}

impl<T: Into<ParameterValue>> From<Vec<T>> for ParameterValue {
    fn from(items: Vec<T>) -> Self {
        ParameterValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// Named parameters, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ParameterBag {
    parameters: IndexMap<String, ParameterValue>,
}

impl ParameterBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) {
        self.parameters.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.parameters.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.parameters.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Resolves placeholders in `value`, recursing into lists and maps.
    ///
    /// # Errors
    /// - [`ContainerError::ParameterNotFound`]: unknown placeholder
    /// - [`ContainerError::CircularParameter`]: parameters reference each other
    /// - [`ContainerError::ParameterNotInterpolable`]: a list/map embedded in a string
    pub fn resolve_value(&self, value: &ParameterValue) -> Result<ParameterValue> {
        self.resolve_with(value, &mut Vec::new())
    }

    /// Resolves placeholders in a string.
    pub fn resolve_string(&self, value: &str) -> Result<ParameterValue> {
        self.resolve_str(value, &mut Vec::new())
    }

    /// Resolves every parameter against the others, in place.
    pub fn resolve_all(&mut self) -> Result<()> {
        let mut resolved = IndexMap::with_capacity(self.parameters.len());
        for (name, value) in &self.parameters {
            let mut stack = vec![name.clone()];
            resolved.insert(name.clone(), self.resolve_with(value, &mut stack)?);
        }
        self.parameters = resolved;
        Ok(())
    }

    fn resolve_with(&self, value: &ParameterValue, stack: &mut Vec<String>) -> Result<ParameterValue> {
        match value {
            ParameterValue::String(s) => self.resolve_str(s, stack),
            ParameterValue::List(items) => items
                .iter()
                .map(|item| self.resolve_with(item, stack))
                .collect::<Result<Vec<_>>>()
                .map(ParameterValue::List),
            ParameterValue::Map(entries) => entries
                .iter()
                .map(|(key, item)| Ok((key.clone(), self.resolve_with(item, stack)?)))
                .collect::<Result<BTreeMap<_, _>>>()
                .map(ParameterValue::Map),
            other => Ok(other.clone()),
        }
    }

    fn resolve_str(&self, value: &str, stack: &mut Vec<String>) -> Result<ParameterValue> {
        // The whole string is one placeholder: keep the raw type
        if let Some(name) = whole_placeholder(value) {
            return self.lookup(name, stack);
        }

        let mut out = String::with_capacity(value.len());
        let mut rest = value;

        while let Some(start) = rest.find('%') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];

            if let Some(stripped) = after.strip_prefix('%') {
                out.push('%');
                rest = stripped;
                continue;
            }

            match after.find('%') {
                Some(end) if is_placeholder_name(&after[..end]) => {
                    let name = &after[..end];
                    let resolved = self.lookup(name, stack)?;
                    let scalar = resolved.to_scalar_string().ok_or_else(|| {
                        ContainerError::ParameterNotInterpolable {
                            name: name.to_string(),
                            value: value.to_string(),
                        }
                    })?;
                    out.push_str(&scalar);
                    rest = &after[end + 1..];
                }
                _ => {
                    out.push('%');
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        Ok(ParameterValue::String(out))
    }

    fn lookup(&self, name: &str, stack: &mut Vec<String>) -> Result<ParameterValue> {
        if stack.iter().any(|n| n == name) {
            let mut chain = stack.clone();
            chain.push(name.to_string());
            return Err(ContainerError::CircularParameter { chain });
        }

        let raw = self.parameters.get(name).ok_or_else(|| ContainerError::ParameterNotFound {
            name: name.to_string(),
            required_by: stack.last().cloned(),
        })?;

        trace!(name, "Resolving parameter");
        stack.push(name.to_string());
        let resolved = self.resolve_with(raw, stack);
        stack.pop();
        resolved
    }
}

fn whole_placeholder(value: &str) -> Option<&str> {
    let inner = value.strip_prefix('%')?.strip_suffix('%')?;
    is_placeholder_name(inner).then_some(inner)
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('%') && !name.contains(char::is_whitespace)
}
