//! A loader that retries resolution with rewritten resource names.
//!
//! Modifiers map a `(resource, type)` pair to an alternate pair used only
//! to find a compatible loader. The matched loader still receives the
//! original pair, so `example.yml.dist` is read from `example.yml.dist`
//! by the loader that handles `.yml` files.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{LoadError, Result};
use crate::loader::{Loader, ResolveLoader};

/// Rewrites a `(resource, type)` pair for another resolution attempt.
pub type Modifier = Arc<dyn Fn(&str, Option<&str>) -> (String, Option<String>) + Send + Sync>;

/// Resolves loaders directly, then through each modifier in order.
///
/// # Examples
/// ```rust,ignore
/// let loader = RetryLoader::new(Arc::new(resolver))
///     .add_modifier(strip_suffix(".dist"));
///
/// assert!(loader.supports("console.yml.dist", None));
/// loader.load("console.yml.dist", None)?;
/// ```
#[derive(Clone)]
pub struct RetryLoader {
    resolver: Arc<dyn ResolveLoader>,
    modifiers: Vec<Modifier>,
}

impl RetryLoader {
    /// Creates a retry loader without modifiers.
    pub fn new(resolver: Arc<dyn ResolveLoader>) -> Self {
        Self {
            resolver,
            modifiers: Vec::new(),
        }
    }

    /// Adds a modifier; modifiers are tried in registration order.
    pub fn add_modifier(
        mut self,
        modifier: impl Fn(&str, Option<&str>) -> (String, Option<String>) + Send + Sync + 'static,
    ) -> Self {
        self.modifiers.push(Arc::new(modifier));
        self
    }

    /// Returns the number of registered modifiers.
    pub fn modifier_count(&self) -> usize {
        self.modifiers.len()
    }

    /// Returns the loader for the pair, trying modifiers if needed.
    pub fn resolve(&self, resource: &str, kind: Option<&str>) -> Option<Arc<dyn Loader>> {
        if let Some(loader) = self.resolver.resolve(resource, kind) {
            return Some(loader);
        }

        self.modifiers.iter().enumerate().find_map(|(index, modifier)| {
            let (modified, modified_kind) = modifier(resource, kind);
            trace!(resource, modified = %modified, index, "Retrying with modifier");
            self.resolver.resolve(&modified, modified_kind.as_deref())
        })
    }
}

impl Loader for RetryLoader {
    fn supports(&self, resource: &str, kind: Option<&str>) -> bool {
        self.resolve(resource, kind).is_some()
    }

    fn load(&self, resource: &str, kind: Option<&str>) -> Result<()> {
        let loader = self
            .resolve(resource, kind)
            .ok_or_else(|| LoadError::unsupported(resource, kind))?;

        debug!(resource, loader = loader.name(), "Loading resource");
        loader.load(resource, kind)
    }
}

impl fmt::Debug for RetryLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryLoader")
            .field("modifiers", &self.modifiers.len())
            .finish_non_exhaustive()
    }
}

/// Builds a modifier that removes a trailing `suffix` from the resource.
///
/// The type is passed through unchanged.
///
/// ```
/// use sanduq_loader::retry::strip_suffix;
///
/// let modifier = strip_suffix(".dist");
/// assert_eq!(modifier("app.yml.dist", None), ("app.yml".to_string(), None));
/// assert_eq!(modifier("app.yml", Some("yaml")), ("app.yml".to_string(), Some("yaml".to_string())));
/// assert_eq!(modifier("conf.dist/app.yml.dist", None), ("conf.dist/app.yml".to_string(), None));
/// ```
pub fn strip_suffix(
    suffix: &'static str,
) -> impl Fn(&str, Option<&str>) -> (String, Option<String>) + Send + Sync + 'static {
    move |resource: &str, kind: Option<&str>| {
        let stripped = resource.strip_suffix(suffix).unwrap_or(resource);
        (stripped.to_string(), kind.map(str::to_string))
    }
}
