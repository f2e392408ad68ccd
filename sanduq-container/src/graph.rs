//! Reference graph validation.
//!
//! Validates the wiring at compile time:
//! - Every referenced service exists
//! - Constructor arguments do not reference each other in a cycle
//!
//! Method-call references may form cycles: they are wired after
//! construction.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, instrument, warn};

use crate::container::SERVICE_CONTAINER;
use crate::definition::Definition;
use crate::error::{CircularReferenceError, ContainerError, Result};
use crate::registry::definition_not_found;

/// Validates references between definitions.
///
/// # Algorithm
/// Depth-first search over constructor references, keeping the current
/// path to report the full chain of a cycle.
pub(crate) struct ReferenceValidator<'a> {
    definitions: &'a IndexMap<String, Definition>,
    /// Currently being visited (for cycle detection)
    visiting: HashSet<&'a str>,
    /// Already validated (cache)
    validated: HashSet<&'a str>,
    /// Current DFS path (for error reporting)
    path: Vec<&'a str>,
}

impl<'a> ReferenceValidator<'a> {
    pub fn new(definitions: &'a IndexMap<String, Definition>) -> Self {
        Self {
            definitions,
            visiting: HashSet::new(),
            validated: HashSet::new(),
            path: Vec::new(),
        }
    }

    /// # Errors
    /// - [`ContainerError::DefinitionNotFound`]: missing reference
    /// - [`ContainerError::CircularReference`]: constructor cycle
    #[instrument(skip(self), name = "reference_validation")]
    pub fn validate(&mut self) -> Result<()> {
        let definitions = self.definitions;
        debug!(definition_count = definitions.len(), "Validating references");

        for (id, definition) in definitions {
            for reference in definition.references() {
                if !self.exists(reference) {
                    let available: Vec<&str> = definitions.keys().map(String::as_str).collect();
                    return Err(definition_not_found(reference, Some(id), &available));
                }
            }
        }

        for id in definitions.keys() {
            self.visit(id)?;
        }

        debug!("Reference validation passed");
        Ok(())
    }

    fn exists(&self, id: &str) -> bool {
        id == SERVICE_CONTAINER || self.definitions.contains_key(id)
    }

    fn visit(&mut self, id: &'a str) -> Result<()> {
        if self.validated.contains(id) {
            return Ok(());
        }

        if self.visiting.contains(id) {
            let cycle_start = self.path.iter().position(|&k| k == id).unwrap_or(0);

            let mut chain: Vec<String> = self.path[cycle_start..].iter().map(|k| k.to_string()).collect();
            chain.push(id.to_string());

            warn!(cycle = ?chain, "Circular reference detected");
            return Err(ContainerError::CircularReference(CircularReferenceError { chain }));
        }

        // Only the synthetic container can be missing here
        let definitions = self.definitions;
        let Some(definition) = definitions.get(id) else {
            self.validated.insert(id);
            return Ok(());
        };

        self.visiting.insert(id);
        self.path.push(id);

        for reference in definition.constructor_references() {
            self.visit(reference)?;
        }

        self.path.pop();
        self.visiting.remove(id);
        self.validated.insert(id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::Argument;

    fn graph(definitions: Vec<(&str, Definition)>) -> IndexMap<String, Definition> {
        definitions.into_iter().map(|(id, d)| (id.to_string(), d)).collect()
    }

    fn service(refs: &[&str]) -> Definition {
        refs.iter()
            .fold(Definition::new("app::Service"), |d, r| d.argument(Argument::reference(*r)))
    }

    #[test]
    fn valid_simple_graph() {
        let definitions = graph(vec![
            ("database", service(&[])),
            ("repository", service(&["database"])),
            ("users", service(&["repository", SERVICE_CONTAINER])),
        ]);

        assert!(ReferenceValidator::new(&definitions).validate().is_ok());
    }

    #[test]
    fn detect_circular_reference() {
        // a → b → c → a
        let definitions = graph(vec![("a", service(&["b"])), ("b", service(&["c"])), ("c", service(&["a"]))]);

        match ReferenceValidator::new(&definitions).validate().unwrap_err() {
            ContainerError::CircularReference(err) => {
                assert_eq!(err.chain, vec!["a", "b", "c", "a"]);
            }
            other => panic!("Expected CircularReference, got: {other:?}"),
        }
    }

    #[test]
    fn detect_self_reference() {
        let definitions = graph(vec![("a", service(&["a"]))]);
        assert!(ReferenceValidator::new(&definitions).validate().is_err());
    }

    #[test]
    fn method_call_cycle_is_allowed() {
        let definitions = graph(vec![
            ("app", service(&[]).method_call("setDispatcher", vec![Argument::reference("dispatcher")])),
            ("dispatcher", service(&["app"])),
        ]);

        assert!(ReferenceValidator::new(&definitions).validate().is_ok());
    }

    #[test]
    fn detect_missing_reference() {
        let definitions = graph(vec![
            ("box.console.helper_set", service(&[])),
            (
                "box.console",
                service(&[]).method_call("setHelperSet", vec![Argument::reference("box.console.helperset")]),
            ),
        ]);

        match ReferenceValidator::new(&definitions).validate().unwrap_err() {
            ContainerError::DefinitionNotFound(err) => {
                assert_eq!(err.id, "box.console.helperset");
                assert_eq!(err.required_by.as_deref(), Some("box.console"));
                assert_eq!(err.suggestions[0], "box.console.helper_set");
            }
            other => panic!("Expected DefinitionNotFound, got: {other:?}"),
        }
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        //     a
        //    / \
        //   b   c
        //    \ /
        //     d
        let definitions = graph(vec![
            ("d", service(&[])),
            ("b", service(&["d"])),
            ("c", service(&["d"])),
            ("a", service(&["b", "c"])),
        ]);

        assert!(ReferenceValidator::new(&definitions).validate().is_ok());
    }
}
