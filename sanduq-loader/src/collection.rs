//! Loads the first available resource of a [`ResourceCollection`].

use std::sync::Arc;

use tracing::{debug, instrument, trace};

use crate::error::{LoadError, Result};
use crate::loader::ResolveLoader;
use crate::resource::ResourceCollection;
use crate::resource_loader::ResourceLoader;

/// Tries each resource of a collection in order until one loads.
///
/// Only "does not exist" failures move on to the next resource; any
/// other failure is returned immediately.
///
/// # Examples
/// ```rust,ignore
/// let loader = ResourceCollectionLoader::new(Arc::new(resolver));
///
/// // prefer the local file, fall back to the distributed one
/// loader.load(&ResourceCollection::from(vec![
///     Resource::new("console.yml"),
///     Resource::with_support("console.yml.dist", "console.yml"),
/// ]))?;
/// ```
#[derive(Debug, Clone)]
pub struct ResourceCollectionLoader {
    inner: ResourceLoader,
}

impl ResourceCollectionLoader {
    /// Creates a loader using the given resolver.
    pub fn new(resolver: Arc<dyn ResolveLoader>) -> Self {
        Self {
            inner: ResourceLoader::new(resolver),
        }
    }

    /// Returns the single-resource loader used for each attempt.
    pub fn resource_loader(&self) -> &ResourceLoader {
        &self.inner
    }

    /// Returns `true` if any resource of the collection is supported.
    pub fn supports(&self, collection: &ResourceCollection) -> bool {
        collection.iter().any(|resource| self.inner.supports(resource))
    }

    /// Loads the first resource that exists.
    ///
    /// # Errors
    /// - [`LoadError::CannotLoad`]: the collection is empty or every
    ///   resource is missing
    /// - any non-"not found" error from an attempt, unchanged
    #[instrument(skip_all, fields(resources = collection.len()), name = "collection_load")]
    pub fn load(&self, collection: &ResourceCollection) -> Result<()> {
        if self.try_each(collection)? {
            return Ok(());
        }

        Err(LoadError::CannotLoad {
            resources: collection.to_string(),
        })
    }

    /// Loads the first resource that exists, if any.
    ///
    /// Returns `Ok(true)` on the first success and `Ok(false)` if every
    /// resource is missing.
    pub fn load_optional(&self, collection: &ResourceCollection) -> Result<bool> {
        self.try_each(collection)
    }

    fn try_each(&self, collection: &ResourceCollection) -> Result<bool> {
        for resource in collection {
            match self.inner.load(resource) {
                Ok(()) => {
                    debug!(resource = %resource, "Loaded resource from collection");
                    return Ok(true);
                }
                Err(err) if err.is_not_found() => {
                    trace!(resource = %resource, "Resource does not exist, trying next");
                }
                Err(err) => return Err(err),
            }
        }

        Ok(false)
    }
}
