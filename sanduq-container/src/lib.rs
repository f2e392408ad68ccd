//! Definition registry and console wiring for Sanduq.
//!
//! - [`ContainerBuilder`] collects definitions, parameters and compiler
//!   passes, then compiles into an immutable [`Container`]
//! - [`TaggedPass`](tagged::TaggedPass) wires tagged services through a
//!   [`TaggedRegistration`](tagged::TaggedRegistration) strategy
//! - [`ConsoleProvider`](console::ConsoleProvider) registers the default
//!   console services
//! - [`YamlFileLoader`](yaml::YamlFileLoader) loads definitions from YAML

pub mod console;
pub mod container;
pub mod definition;
pub mod error;
mod graph;
pub mod ids;
pub mod parameters;
pub mod pass;
pub mod provider;
pub mod registration;
pub mod registry;
pub mod tagged;
pub mod yaml;

pub use container::{Container, ContainerBuilder, SERVICE_CONTAINER, prelude};
pub use definition::{Argument, Definition};
pub use error::{ContainerError, Result};
pub use ids::ServiceIds;
pub use registry::DefinitionRegistry;
