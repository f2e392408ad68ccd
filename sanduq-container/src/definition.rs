//! Service definitions.
//!
//! A [`Definition`] describes how a service would be built and wired:
//! its class, constructor arguments, method calls and tags. Nothing here
//! ever constructs the service.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;

use crate::parameters::ParameterValue;

/// Attributes attached to one occurrence of a tag.
pub type TagAttributes = BTreeMap<String, ParameterValue>;

/// A constructor or method-call argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// Another service, by identifier.
    Reference(String),
    /// A literal value; strings may contain `%placeholders%`.
    Value(ParameterValue),
}

impl Argument {
    /// Creates a reference to service `id`.
    pub fn reference(id: impl Into<String>) -> Self {
        Argument::Reference(id.into())
    }

    /// Creates a literal value argument.
    pub fn value(value: impl Into<ParameterValue>) -> Self {
        Argument::Value(value.into())
    }

    /// Returns the referenced identifier, if this is a reference.
    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Argument::Reference(id) => Some(id),
            Argument::Value(_) => None,
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Reference(id) => write!(f, "@{id}"),
            Argument::Value(value) => write!(f, "{value}"),
        }
    }
}

/// A method call made on a service after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub method: String,
    pub arguments: Vec<Argument>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Vec<Argument>) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }
}

/// How a service is built and wired.
///
/// # Examples
/// ```
/// use sanduq_container::definition::{Argument, Definition};
///
/// let definition = Definition::new("%box.console.class%")
///     .argument(Argument::value("%box.console.name%"))
///     .method_call("setAutoExit", vec![Argument::value("%box.console.auto_exit%")])
///     .tag("app.tag");
///
/// assert!(definition.is_public());
/// assert!(definition.has_tag("app.tag"));
/// assert!(definition.has_method_call("setAutoExit"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    class: Option<String>,
    arguments: Vec<Argument>,
    method_calls: Vec<MethodCall>,
    tags: IndexMap<String, Vec<TagAttributes>>,
    public: bool,
    is_abstract: bool,
    synthetic: bool,
}

impl Default for Definition {
    fn default() -> Self {
        Self {
            class: None,
            arguments: Vec::new(),
            method_calls: Vec::new(),
            tags: IndexMap::new(),
            public: true,
            is_abstract: false,
            synthetic: false,
        }
    }
}

impl Definition {
    /// Creates a public, concrete definition for `class`.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            ..Self::default()
        }
    }

    /// Creates a definition for a service provided from outside.
    pub fn synthetic() -> Self {
        Self {
            synthetic: true,
            ..Self::default()
        }
    }

    // ── Builder-style setters ──

    pub fn argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn method_call(mut self, method: impl Into<String>, arguments: Vec<Argument>) -> Self {
        self.add_method_call(method, arguments);
        self
    }

    /// Adds a tag occurrence without attributes.
    pub fn tag(self, name: impl Into<String>) -> Self {
        self.tag_with(name, TagAttributes::new())
    }

    /// Adds a tag occurrence with attributes.
    pub fn tag_with(mut self, name: impl Into<String>, attributes: TagAttributes) -> Self {
        self.add_tag(name, attributes);
        self
    }

    pub fn public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    pub fn abstract_(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    // ── Mutation ──

    pub fn set_class(&mut self, class: impl Into<String>) {
        self.class = Some(class.into());
    }

    pub fn set_public(&mut self, public: bool) {
        self.public = public;
    }

    pub fn set_abstract(&mut self, is_abstract: bool) {
        self.is_abstract = is_abstract;
    }

    pub fn add_argument(&mut self, argument: Argument) {
        self.arguments.push(argument);
    }

    /// Appends a method call. Calls run in the order they were added.
    pub fn add_method_call(&mut self, method: impl Into<String>, arguments: Vec<Argument>) {
        self.method_calls.push(MethodCall::new(method, arguments));
    }

    pub fn add_tag(&mut self, name: impl Into<String>, attributes: TagAttributes) {
        self.tags.entry(name.into()).or_default().push(attributes);
    }

    // ── Introspection ──

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn method_calls(&self) -> &[MethodCall] {
        &self.method_calls
    }

    /// Returns `true` if a call to `method` is already registered.
    pub fn has_method_call(&self, method: &str) -> bool {
        self.method_calls.iter().any(|call| call.method == method)
    }

    /// Returns the attribute maps of every occurrence of `name`.
    pub fn tag_attributes(&self, name: &str) -> Option<&[TagAttributes]> {
        self.tags.get(name).map(Vec::as_slice)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    pub fn tags(&self) -> impl Iterator<Item = (&str, &[TagAttributes])> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        self.public
    }

    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    #[inline]
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// Every identifier referenced by arguments and method calls.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.arguments
            .iter()
            .chain(self.method_calls.iter().flat_map(|call| call.arguments.iter()))
            .filter_map(Argument::as_reference)
    }

    /// Identifiers referenced by constructor arguments only.
    pub(crate) fn constructor_references(&self) -> impl Iterator<Item = &str> {
        self.arguments.iter().filter_map(Argument::as_reference)
    }

    pub(crate) fn arguments_mut(&mut self) -> impl Iterator<Item = &mut Argument> {
        self.arguments
            .iter_mut()
            .chain(self.method_calls.iter_mut().flat_map(|call| call.arguments.iter_mut()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_public_and_concrete() {
        let definition = Definition::new("app::Service");
        assert_eq!(definition.class(), Some("app::Service"));
        assert!(definition.is_public());
        assert!(!definition.is_abstract());
        assert!(!definition.is_synthetic());
    }

    #[test]
    fn repeated_tags_keep_each_occurrence() {
        let mut first = TagAttributes::new();
        first.insert("event".into(), "console.command".into());
        let mut second = TagAttributes::new();
        second.insert("event".into(), "console.terminate".into());

        let definition = Definition::new("app::Listener")
            .tag_with("listener", first)
            .tag_with("listener", second)
            .tag("other");

        let occurrences = definition.tag_attributes("listener").unwrap();
        assert_eq!(occurrences.len(), 2);
        assert_eq!(occurrences[1]["event"], ParameterValue::from("console.terminate"));

        let names: Vec<&str> = definition.tags().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["listener", "other"]);
    }

    #[test]
    fn references_cover_arguments_and_calls() {
        let definition = Definition::new("app::Service")
            .argument(Argument::reference("logger"))
            .argument(Argument::value("%name%"))
            .method_call("setHelperSet", vec![Argument::reference("helper_set")]);

        let refs: Vec<&str> = definition.references().collect();
        assert_eq!(refs, vec!["logger", "helper_set"]);

        let ctor: Vec<&str> = definition.constructor_references().collect();
        assert_eq!(ctor, vec!["logger"]);
    }

    #[test]
    fn argument_display() {
        assert_eq!(Argument::reference("a").to_string(), "@a");
        assert_eq!(Argument::value("x").to_string(), "\"x\"");
        assert_eq!(Argument::value(3i64).to_string(), "3");
    }
}
