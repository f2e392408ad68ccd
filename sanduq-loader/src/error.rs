//! Error types for resource loading.
//!
//! Loading distinguishes a resource that does not exist from one that
//! exists but cannot be used. Optional loads and collection fallbacks
//! only ever swallow [`LoadError::NotFound`].

use std::path::PathBuf;

/// Main error type for all loader operations.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// No loader could be resolved for the resource.
    #[error("Cannot load resource \"{resource}\": no supported loader{}", type_suffix(.kind))]
    Unsupported {
        resource: String,
        kind: Option<String>,
    },

    /// Every resource of a collection was missing (or the collection was empty).
    #[error("Cannot load resource {resources}")]
    CannotLoad { resources: String },

    /// The resource does not exist at the given location.
    #[error("The file \"{resource}\" does not exist{}", searched_suffix(.searched))]
    NotFound {
        resource: String,
        searched: Vec<PathBuf>,
    },

    /// The resource exists but its content is malformed.
    #[error("The file \"{}\" is not valid: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },

    /// The resource exists but could not be read.
    #[error("Failed to read \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// Returns `true` if the resource is missing, as opposed to malformed.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound { .. })
    }

    /// Shorthand for a missing resource with no search path information.
    pub fn not_found(resource: impl Into<String>) -> Self {
        LoadError::NotFound {
            resource: resource.into(),
            searched: Vec::new(),
        }
    }

    /// Shorthand for a resource without a supporting loader.
    pub fn unsupported(resource: &str, kind: Option<&str>) -> Self {
        LoadError::Unsupported {
            resource: resource.to_string(),
            kind: kind.map(str::to_string),
        }
    }
}

fn type_suffix(kind: &Option<String>) -> String {
    match kind {
        Some(kind) => format!(" (type {kind:?})"),
        None => String::new(),
    }
}

fn searched_suffix(searched: &[PathBuf]) -> String {
    if searched.is_empty() {
        return String::new();
    }

    let dirs: Vec<String> = searched.iter().map(|p| p.display().to_string()).collect();
    format!(" (in: {})", dirs.join(", "))
}

/// Convenient Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoadError>;
