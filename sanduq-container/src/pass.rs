//! Compiler passes run by [`ContainerBuilder::compile`](crate::container::ContainerBuilder::compile).

use std::fmt;

use crate::error::Result;
use crate::registry::DefinitionRegistry;

/// When a pass runs relative to the others.
///
/// Stages run in declaration order; within a stage, passes run in the
/// order they were added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum PassStage {
    #[default]
    BeforeOptimization,
    Optimization,
}

impl fmt::Display for PassStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassStage::BeforeOptimization => write!(f, "before_optimization"),
            PassStage::Optimization => write!(f, "optimization"),
        }
    }
}

/// A transformation over the definition registry.
pub trait CompilerPass: Send + Sync {
    fn process(&self, registry: &mut dyn DefinitionRegistry) -> Result<()>;

    /// Optional: human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_ordered() {
        assert!(PassStage::BeforeOptimization < PassStage::Optimization);
        assert_eq!(PassStage::default(), PassStage::BeforeOptimization);
        assert_eq!(PassStage::Optimization.to_string(), "optimization");
    }
}
