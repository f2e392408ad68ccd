//! Loads a [`Resource`] through whichever loader supports it.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::error::{LoadError, Result};
use crate::loader::{Loader, ResolveLoader};
use crate::resource::Resource;

/// Delegates loading of a [`Resource`] to a resolved loader.
///
/// When the resource carries a support pair, the loader is chosen with
/// that pair but is always handed the primary pair.
///
/// # Examples
/// ```rust,ignore
/// let loader = ResourceLoader::new(Arc::new(resolver));
///
/// // `config.yml.dist` is read by the YAML loader
/// loader.load(&Resource::with_support("config.yml.dist", "config.yml"))?;
///
/// // missing files are fine, malformed ones are not
/// let loaded = loader.load_optional(&Resource::new("local.yml"))?;
/// ```
#[derive(Clone)]
pub struct ResourceLoader {
    resolver: Arc<dyn ResolveLoader>,
}

impl ResourceLoader {
    /// Creates a loader using the given resolver.
    pub fn new(resolver: Arc<dyn ResolveLoader>) -> Self {
        Self { resolver }
    }

    /// Returns the resolver.
    pub fn resolver(&self) -> &Arc<dyn ResolveLoader> {
        &self.resolver
    }

    /// Replaces the resolver.
    pub fn set_resolver(&mut self, resolver: Arc<dyn ResolveLoader>) {
        self.resolver = resolver;
    }

    /// Returns the loader for a resource, using its support pair if any.
    pub fn resolve(&self, resource: &Resource) -> Option<Arc<dyn Loader>> {
        let (name, kind) = resource.support();
        self.resolver.resolve(name, kind)
    }

    /// Returns `true` if a loader can be resolved for the resource.
    pub fn supports(&self, resource: &Resource) -> bool {
        self.resolve(resource).is_some()
    }

    /// Loads the resource.
    ///
    /// # Errors
    /// - [`LoadError::Unsupported`]: no loader supports the resource
    /// - whatever the resolved loader reports
    #[instrument(skip_all, fields(resource = %resource), name = "resource_load")]
    pub fn load(&self, resource: &Resource) -> Result<()> {
        let loader = self.resolve(resource).ok_or_else(|| {
            let (name, kind) = resource.support();
            LoadError::unsupported(name, kind)
        })?;

        debug!(loader = loader.name(), "Loading resource");
        loader.load(resource.resource(), resource.type_hint())
    }

    /// Loads a resource that may not exist.
    ///
    /// Returns `Ok(true)` if loaded and `Ok(false)` if the resource does
    /// not exist. Any other failure (e.g. malformed content) is returned
    /// as an error.
    pub fn load_optional(&self, resource: &Resource) -> Result<bool> {
        match self.load(resource) {
            Ok(()) => Ok(true),
            Err(err) if err.is_not_found() => {
                debug!(resource = %resource, "Optional resource does not exist");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}

impl fmt::Debug for ResourceLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceLoader").finish_non_exhaustive()
    }
}
