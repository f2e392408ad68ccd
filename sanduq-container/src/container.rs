//! # The Container: heart of Sanduq
//!
//! Collects service definitions and parameters, runs compiler passes
//! over them, and freezes the result.
//!
//! # Architecture
//! ```text
//! YAML / providers ──> ContainerBuilder ──compile()──> Container
//!                           │
//!                     compiler passes
//!                 (tagged registration, ...)
//! ```
//!
//! # Examples
//! ```rust
//! use sanduq_container::prelude::*;
//!
//! let mut builder = Container::builder();
//! builder.set_parameter("app.name", "demo");
//! builder
//!     .set_definition(
//!         "app",
//!         Definition::new("console::Application").argument(Argument::value("%app.name%")),
//!     )
//!     .expect("Failed to register definition");
//!
//! let container = builder.compile().expect("Failed to compile container");
//! let app = container.definition("app").expect("Missing app");
//! assert_eq!(app.arguments()[0], Argument::value("demo"));
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info, instrument, trace};

use crate::definition::{Argument, Definition};
use crate::error::{AlreadyRegisteredError, ContainerError, Result};
use crate::graph::ReferenceValidator;
use crate::parameters::{ParameterBag, ParameterValue};
use crate::pass::{CompilerPass, PassStage};
use crate::provider::Provider;
use crate::registry::{DefinitionRegistry, TaggedService, TypeCatalog, required_by};

/// Identifier of the container itself; always defined.
pub const SERVICE_CONTAINER: &str = "service_container";

// ============================================================
// ContainerBuilder
// ============================================================

/// Builds a [`Container`] from definitions, parameters and passes.
///
/// Register everything, then call [`compile()`](ContainerBuilder::compile)
/// to run the passes, resolve parameters and validate references.
pub struct ContainerBuilder {
    definitions: IndexMap<String, Definition>,
    parameters: ParameterBag,
    types: TypeCatalog,
    passes: Vec<(PassStage, Box<dyn CompilerPass>)>,
    allow_override: bool,
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerBuilder {
    pub fn new() -> Self {
        let mut definitions = IndexMap::new();
        definitions.insert(SERVICE_CONTAINER.to_string(), Definition::synthetic());

        Self {
            definitions,
            parameters: ParameterBag::new(),
            types: TypeCatalog::new(),
            passes: Vec::new(),
            allow_override: false,
        }
    }

    /// Allow replacing previously registered definitions.
    pub fn allow_override(mut self, allow: bool) -> Self {
        self.allow_override = allow;
        self
    }

    /// Returns `true` if previously registered definitions may be replaced.
    pub fn allows_override(&self) -> bool {
        self.allow_override
    }

    // ── Definitions ──

    /// Registers a definition.
    ///
    /// # Errors
    /// [`ContainerError::AlreadyRegistered`] if `id` exists and overriding
    /// is not allowed.
    pub fn set_definition(&mut self, id: impl Into<String>, definition: Definition) -> Result<()> {
        let id = id.into();

        if !self.allow_override && self.definitions.contains_key(&id) {
            return Err(ContainerError::AlreadyRegistered(AlreadyRegisteredError { id }));
        }

        debug!(id = %id, class = ?definition.class(), "Registered definition");
        self.definitions.insert(id, definition);
        Ok(())
    }

    /// Removes a definition, keeping the order of the others.
    pub fn remove_definition(&mut self, id: &str) -> Option<Definition> {
        self.definitions.shift_remove(id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    // ── Parameters ──

    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) {
        let name = name.into();
        trace!(name = %name, "Set parameter");
        self.parameters.set(name, value);
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.has(name)
    }

    /// Raw (unresolved) parameter value.
    pub fn parameter(&self, name: &str) -> Option<&ParameterValue> {
        self.parameters.get(name)
    }

    // ── Types ──

    /// Declares capabilities of an implementation class.
    pub fn declare_type<I, S>(&mut self, class: impl Into<String>, capabilities: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types.declare(class, capabilities);
    }

    // ── Passes & providers ──

    /// Adds a compiler pass to run at `stage`.
    pub fn add_compiler_pass(&mut self, pass: impl CompilerPass + 'static, stage: PassStage) {
        debug!(pass = pass.name(), %stage, "Added compiler pass");
        self.passes.push((stage, Box::new(pass)));
    }

    /// Applies a [`Provider`] module.
    pub fn add_provider(&mut self, provider: &dyn Provider) -> Result<()> {
        debug!(provider = provider.name(), "Applying provider");
        provider.register(self)
    }

    // ── Compile ──

    /// Runs the passes, resolves parameters and validates references.
    ///
    /// # Errors
    /// Any error raised by a pass, plus parameter resolution and
    /// reference validation errors.
    #[instrument(skip(self), name = "container_compile")]
    pub fn compile(mut self) -> Result<Container> {
        info!(
            definitions = self.definitions.len(),
            passes = self.passes.len(),
            "Compiling container"
        );

        let mut passes = std::mem::take(&mut self.passes);
        passes.sort_by_key(|(stage, _)| *stage);

        for (stage, pass) in &passes {
            debug!(pass = pass.name(), %stage, "Running compiler pass");
            pass.process(&mut self)?;
        }

        self.resolve_definitions()?;
        self.parameters.resolve_all()?;

        ReferenceValidator::new(&self.definitions).validate()?;

        info!("Container compiled successfully");
        Ok(Container {
            definitions: Arc::new(self.definitions),
            parameters: Arc::new(self.parameters),
        })
    }

    // ── Internal ──

    /// Replaces placeholders in classes and argument values.
    fn resolve_definitions(&mut self) -> Result<()> {
        let parameters = &self.parameters;

        for (id, definition) in self.definitions.iter_mut() {
            if let Some(class) = definition.class() {
                let resolved = parameters.resolve_string(class).map_err(|err| required_by(err, id))?;
                match resolved.to_scalar_string() {
                    Some(resolved) => definition.set_class(resolved),
                    None => {
                        return Err(ContainerError::ParameterNotInterpolable {
                            name: class.trim_matches('%').to_string(),
                            value: class.to_string(),
                        });
                    }
                }
            }

            for argument in definition.arguments_mut() {
                if let Argument::Value(value) = argument {
                    *value = parameters.resolve_value(value).map_err(|err| required_by(err, id))?;
                }
            }
        }

        Ok(())
    }
}

impl DefinitionRegistry for ContainerBuilder {
    fn definition(&self, id: &str) -> Option<&Definition> {
        self.definitions.get(id)
    }

    fn definition_mut(&mut self, id: &str) -> Option<&mut Definition> {
        self.definitions.get_mut(id)
    }

    fn service_ids(&self) -> Vec<&str> {
        self.definitions.keys().map(String::as_str).collect()
    }

    fn parameters(&self) -> &ParameterBag {
        &self.parameters
    }

    fn types(&self) -> &TypeCatalog {
        &self.types
    }
}

impl fmt::Debug for ContainerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerBuilder")
            .field("definitions", &self.definitions.len())
            .field("parameters", &self.parameters.len())
            .field("passes", &self.passes.len())
            .field("allow_override", &self.allow_override)
            .finish()
    }
}

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

/// Immutable, compiled set of definitions and parameters.
///
/// Created by [`ContainerBuilder::compile()`]. Cheap to clone.
#[derive(Clone)]
pub struct Container {
    definitions: Arc<IndexMap<String, Definition>>,
    parameters: Arc<ParameterBag>,
}

impl Container {
    /// Create a new builder.
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    pub fn definition(&self, id: &str) -> Option<&Definition> {
        self.definitions.get(id)
    }

    pub fn has(&self, id: &str) -> bool {
        self.definitions.contains_key(id)
    }

    /// Resolved parameter value.
    pub fn parameter(&self, name: &str) -> Option<&ParameterValue> {
        self.parameters.get(name)
    }

    pub fn parameters(&self) -> &ParameterBag {
        &self.parameters
    }

    /// Every identifier, in registration order.
    pub fn service_ids(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Services carrying `tag`, in registration order.
    pub fn find_tagged_service_ids(&self, tag: &str) -> Vec<TaggedService> {
        self.definitions
            .iter()
            .filter_map(|(id, definition)| {
                Some(TaggedService {
                    id: id.clone(),
                    tag: tag.to_string(),
                    attributes: definition.tag_attributes(tag)?.to_vec(),
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("definitions", &self.definitions.len())
            .field("parameters", &self.parameters.len())
            .finish()
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{Container, ContainerBuilder, SERVICE_CONTAINER};
    pub use crate::console::{ConsoleDefaults, ConsoleProvider};
    pub use crate::definition::{Argument, Definition, MethodCall, TagAttributes};
    pub use crate::error::{ContainerError, Result};
    pub use crate::ids::ServiceIds;
    pub use crate::parameters::ParameterValue;
    pub use crate::pass::{CompilerPass, PassStage};
    pub use crate::provider::Provider;
    pub use crate::registry::{DefinitionRegistry, TaggedService};
    pub use crate::tagged::{TaggedPass, TaggedRegistration};
    pub use crate::yaml::{SharedBuilder, YamlFileLoader};
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
