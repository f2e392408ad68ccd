//! Loader and resolver seams.
//!
//! A [`Loader`] handles one family of resources (e.g. YAML files).
//! A [`ResolveLoader`] picks the loader responsible for a resource.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::error::Result;

/// Loads resources of the kinds it declares support for.
///
/// Implementations must report a missing resource as
/// [`LoadError::NotFound`](crate::LoadError::NotFound) and anything else
/// (malformed content, read failures) as a different variant; optional
/// loading depends on that distinction.
pub trait Loader: Send + Sync {
    /// Returns `true` if this loader can handle the resource.
    fn supports(&self, resource: &str, kind: Option<&str>) -> bool;

    /// Loads the resource. Loading is a side effect (it populates whatever
    /// state the loader was created for).
    fn load(&self, resource: &str, kind: Option<&str>) -> Result<()>;

    /// Optional: human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Finds the loader responsible for a resource.
pub trait ResolveLoader: Send + Sync {
    /// Returns a loader supporting `(resource, kind)`, or `None`.
    fn resolve(&self, resource: &str, kind: Option<&str>) -> Option<Arc<dyn Loader>>;
}

/// Ordered set of loaders; the first one declaring support wins.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use sanduq_loader::{Loader, LoaderResolver, ResolveLoader, Result};
///
/// struct IniLoader;
///
/// impl Loader for IniLoader {
///     fn supports(&self, resource: &str, _kind: Option<&str>) -> bool {
///         resource.ends_with(".ini")
///     }
///
///     fn load(&self, _resource: &str, _kind: Option<&str>) -> Result<()> {
///         Ok(())
///     }
/// }
///
/// let resolver = LoaderResolver::new().with_loader(Arc::new(IniLoader));
/// assert!(resolver.resolve("php.ini", None).is_some());
/// assert!(resolver.resolve("php.yml", None).is_none());
/// ```
#[derive(Default, Clone)]
pub struct LoaderResolver {
    loaders: Vec<Arc<dyn Loader>>,
}

impl LoaderResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a loader, keeping registration order.
    pub fn with_loader(mut self, loader: Arc<dyn Loader>) -> Self {
        self.add_loader(loader);
        self
    }

    /// Adds a loader in place.
    pub fn add_loader(&mut self, loader: Arc<dyn Loader>) {
        self.loaders.push(loader);
    }

    /// Returns the registered loaders.
    pub fn loaders(&self) -> &[Arc<dyn Loader>] {
        &self.loaders
    }
}

impl ResolveLoader for LoaderResolver {
    fn resolve(&self, resource: &str, kind: Option<&str>) -> Option<Arc<dyn Loader>> {
        let loader = self
            .loaders
            .iter()
            .find(|loader| loader.supports(resource, kind))
            .cloned();

        match loader {
            Some(ref loader) => trace!(resource, ?kind, loader = loader.name(), "Resolved loader"),
            None => trace!(resource, ?kind, "No loader supports resource"),
        }

        loader
    }
}

impl fmt::Debug for LoaderResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.loaders.iter().map(|l| l.name()).collect();
        f.debug_struct("LoaderResolver").field("loaders", &names).finish()
    }
}
