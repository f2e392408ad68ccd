//! Resilient resource loading for sanduq.
//!
//! - [`ResourceLoader`] loads a [`Resource`], optionally choosing the
//!   loader through an alternate support pair
//! - [`ResourceCollectionLoader`] loads the first existing resource of a
//!   [`ResourceCollection`]
//! - [`RetryLoader`] retries loader resolution with rewritten names

pub mod collection;
pub mod error;
pub mod loader;
pub mod locator;
pub mod resource;
pub mod resource_loader;
pub mod retry;

pub use collection::ResourceCollectionLoader;
pub use error::{LoadError, Result};
pub use loader::{Loader, LoaderResolver, ResolveLoader};
pub use locator::FileLocator;
pub use resource::{Resource, ResourceCollection};
pub use resource_loader::ResourceLoader;
pub use retry::{RetryLoader, strip_suffix};
