//! Provider trait: a module of related definitions.
//!
//! Providers group related registrations together. Instead of one giant
//! registration block, split definitions by concern:
//!
//! ```rust,ignore
//! builder.add_provider(&ConsoleProvider::default())?;
//! builder.add_provider(&MailerProvider)?;
//! ```

use crate::container::ContainerBuilder;
use crate::error::Result;

/// A module that registers related definitions into a builder.
pub trait Provider: Send + Sync {
    /// Register definitions, parameters and passes.
    ///
    /// Called once per [`ContainerBuilder::add_provider`] call.
    fn register(&self, builder: &mut ContainerBuilder) -> Result<()>;

    /// Optional: human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
