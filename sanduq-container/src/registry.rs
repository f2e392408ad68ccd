//! Definition registry: the seam compiler passes work against.
//!
//! The registry maps service identifiers to [`Definition`]s and answers
//! the questions tagged registration needs: which services carry a tag,
//! what class a definition resolves to, and whether that class satisfies
//! a capability declared in the [`TypeCatalog`].

use std::collections::{HashMap, HashSet};

use sanduq_support::rendering::suggest_similar;
use tracing::trace;

use crate::definition::{Definition, TagAttributes};
use crate::error::{ContainerError, DefinitionNotFoundError, Result};
use crate::parameters::ParameterBag;

/// A service found by tag, with the attributes of every occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedService {
    pub id: String,
    pub tag: String,
    pub attributes: Vec<TagAttributes>,
}

/// Mutable access to service definitions during compilation.
///
/// Implemented by [`ContainerBuilder`](crate::container::ContainerBuilder);
/// compiler passes receive it as `&mut dyn DefinitionRegistry`.
pub trait DefinitionRegistry: Send + Sync {
    fn definition(&self, id: &str) -> Option<&Definition>;

    fn definition_mut(&mut self, id: &str) -> Option<&mut Definition>;

    /// Every registered identifier, in registration order.
    fn service_ids(&self) -> Vec<&str>;

    fn parameters(&self) -> &ParameterBag;

    fn types(&self) -> &TypeCatalog;

    fn has_definition(&self, id: &str) -> bool {
        self.definition(id).is_some()
    }

    /// Services carrying `tag`, in registration order.
    fn find_tagged_service_ids(&self, tag: &str) -> Vec<TaggedService> {
        self.service_ids()
            .into_iter()
            .filter_map(|id| {
                let attributes = self.definition(id)?.tag_attributes(tag)?;
                Some(TaggedService {
                    id: id.to_string(),
                    tag: tag.to_string(),
                    attributes: attributes.to_vec(),
                })
            })
            .collect()
    }

    /// Returns the definition or a "did you mean" error.
    fn require_definition(&self, id: &str) -> Result<&Definition> {
        match self.definition(id) {
            Some(definition) => Ok(definition),
            None => Err(definition_not_found(id, None, &self.service_ids())),
        }
    }

    fn require_definition_mut(&mut self, id: &str) -> Result<&mut Definition> {
        // suggestions need `&self`, which a returned `&mut` borrow would still hold
        if !self.has_definition(id) {
            return Err(definition_not_found(id, None, &self.service_ids()));
        }
        self.definition_mut(id)
            .ok_or_else(|| definition_not_found(id, None, &[] as &[&str]))
    }

    /// Resolves the `%placeholders%` in a definition's class.
    ///
    /// Returns `None` if the definition has no class.
    fn resolve_class(&self, id: &str) -> Result<Option<String>> {
        let Some(class) = self.require_definition(id)?.class() else {
            return Ok(None);
        };

        let resolved = self.parameters().resolve_string(class).map_err(|err| required_by(err, id))?;
        resolved
            .to_scalar_string()
            .map(Some)
            .ok_or_else(|| ContainerError::ParameterNotInterpolable {
                name: class.trim_matches('%').to_string(),
                value: class.to_string(),
            })
    }

    /// Returns `true` if `class` declares `base` (directly or transitively).
    fn satisfies(&self, class: &str, base: &str) -> bool {
        self.types().satisfies(class, base)
    }
}

/// Builds a [`ContainerError::DefinitionNotFound`] with suggestions.
pub(crate) fn definition_not_found(
    id: &str,
    required_by: Option<&str>,
    available: &[impl AsRef<str>],
) -> ContainerError {
    ContainerError::DefinitionNotFound(DefinitionNotFoundError {
        id: id.to_string(),
        required_by: required_by.map(str::to_string),
        suggestions: suggest_similar(id, available, 3),
    })
}

/// Fills in the service that needed a parameter, if not already known.
pub(crate) fn required_by(err: ContainerError, id: &str) -> ContainerError {
    match err {
        ContainerError::ParameterNotFound {
            name,
            required_by: None,
        } => ContainerError::ParameterNotFound {
            name,
            required_by: Some(id.to_string()),
        },
        other => other,
    }
}

// ═══════════════════════════════════════════
// TypeCatalog
// ═══════════════════════════════════════════

/// Declared capabilities of implementation classes.
///
/// `satisfies(class, base)` is true when `base` is reachable from `class`
/// through declared capabilities. A class that was never declared
/// satisfies nothing.
///
/// # Examples
/// ```
/// use sanduq_container::registry::TypeCatalog;
///
/// let mut types = TypeCatalog::new();
/// types.declare("app::Greet", ["console::command::Command"]);
/// types.declare("console::command::Command", ["console::Named"]);
///
/// assert!(types.satisfies("app::Greet", "console::command::Command"));
/// assert!(types.satisfies("app::Greet", "console::Named"));
/// assert!(!types.satisfies("app::Other", "console::command::Command"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    capabilities: HashMap<String, Vec<String>>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares that `class` provides each of `capabilities`.
    ///
    /// Repeated declarations accumulate.
    pub fn declare<I, S>(&mut self, class: impl Into<String>, capabilities: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.capabilities.entry(class.into()).or_default();
        for capability in capabilities {
            let capability = capability.into();
            if !entry.contains(&capability) {
                entry.push(capability);
            }
        }
    }

    pub fn is_declared(&self, class: &str) -> bool {
        self.capabilities.contains_key(class)
    }

    /// Direct capabilities of `class`.
    pub fn capabilities(&self, class: &str) -> &[String] {
        self.capabilities.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn satisfies(&self, class: &str, base: &str) -> bool {
        let mut pending: Vec<&str> = self.capabilities(class).iter().map(String::as_str).collect();
        let mut seen: HashSet<&str> = HashSet::new();

        while let Some(current) = pending.pop() {
            if current == base {
                trace!(class, base, "Capability satisfied");
                return true;
            }
            if seen.insert(current) {
                pending.extend(self.capabilities(current).iter().map(String::as_str));
            }
        }

        false
    }
}
