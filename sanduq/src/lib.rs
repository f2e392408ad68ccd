//! # Sanduq: dependency injection wiring for console applications
//!
//! Assembles a console application's service definitions, discovers
//! tagged commands, helpers and event listeners, and loads configuration
//! through a resilient loader chain.
//!
//! ```rust
//! use sanduq::prelude::*;
//!
//! let mut builder = Container::builder();
//! builder.add_provider(&ConsoleProvider::default())?;
//! let container = builder.compile()?;
//!
//! let commands = container.find_tagged_service_ids("box.console.command");
//! assert_eq!(commands.len(), 2);
//! # Ok::<(), sanduq::ContainerError>(())
//! ```

pub use sanduq_container::*;
pub use sanduq_loader as loader;
pub use sanduq_support as support;

pub mod prelude {
    pub use sanduq_container::prelude::*;
    pub use sanduq_loader::{
        FileLocator, LoadError, Loader, LoaderResolver, ResolveLoader, Resource, ResourceCollection,
        ResourceCollectionLoader, ResourceLoader, RetryLoader, strip_suffix,
    };
}
