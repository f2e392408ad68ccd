//! Resource descriptors.
//!
//! A [`Resource`] names something loadable (usually a file name) plus an
//! optional type hint. A resource may also carry a *support pair*: an
//! alternate name and type used only to pick a loader, while the primary
//! pair is what actually gets loaded. This lets `config.yml.dist` be read
//! by the loader that handles `config.yml`.

use std::fmt;

/// A loadable resource and its optional type hint.
///
/// # Examples
/// ```
/// use sanduq_loader::Resource;
///
/// let plain = Resource::new("config.yml");
/// assert_eq!(plain.resource(), "config.yml");
/// assert_eq!(plain.support(), ("config.yml", None));
///
/// let dist = Resource::with_support("config.yml.dist", "config.yml");
/// assert_eq!(dist.resource(), "config.yml.dist");
/// assert_eq!(dist.support(), ("config.yml", None));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    resource: String,
    kind: Option<String>,
    support: Option<SupportPair>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SupportPair {
    resource: String,
    kind: Option<String>,
}

impl Resource {
    /// Creates a resource without a type hint.
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            kind: None,
            support: None,
        }
    }

    /// Creates a resource whose loader is chosen using `support_resource`.
    pub fn with_support(resource: impl Into<String>, support_resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            kind: None,
            support: Some(SupportPair {
                resource: support_resource.into(),
                kind: None,
            }),
        }
    }

    /// Sets the type hint of the primary pair.
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Sets the type hint of the support pair.
    ///
    /// Has no effect on a resource created without support information.
    pub fn support_kind(mut self, kind: impl Into<String>) -> Self {
        if let Some(ref mut support) = self.support {
            support.kind = Some(kind.into());
        }
        self
    }

    /// Returns the primary resource.
    #[inline]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Returns the primary type hint.
    #[inline]
    pub fn type_hint(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Returns `true` if a separate support pair was given.
    #[inline]
    pub fn has_support(&self) -> bool {
        self.support.is_some()
    }

    /// Returns the pair used to pick a loader.
    ///
    /// Falls back to the primary pair when no support pair was given.
    pub fn support(&self) -> (&str, Option<&str>) {
        match self.support {
            Some(ref support) => (&support.resource, support.kind.as_deref()),
            None => (&self.resource, self.kind.as_deref()),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resource)?;
        if let Some(ref support) = self.support {
            write!(f, " (as {})", support.resource)?;
        }
        Ok(())
    }
}

/// An ordered collection of resources; the first loadable one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceCollection {
    resources: Vec<Resource>,
}

impl ResourceCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a resource, keeping registration order.
    pub fn attach(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    /// Appends a resource in place.
    pub fn push(&mut self, resource: Resource) {
        self.resources.push(resource);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        self.resources.iter()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl From<Vec<Resource>> for ResourceCollection {
    fn from(resources: Vec<Resource>) -> Self {
        Self { resources }
    }
}

impl FromIterator<Resource> for ResourceCollection {
    fn from_iter<I: IntoIterator<Item = Resource>>(iter: I) -> Self {
        Self {
            resources: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ResourceCollection {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}

impl fmt::Display for ResourceCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.resources.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", sanduq_support::rendering::render_list(&names))
    }
}
