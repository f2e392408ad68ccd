//! Error types for sanduq container operations.
//!
//! Every structural problem is reported at assembly time with the
//! offending service identifier and a hint on how to fix it.

use std::fmt;

use sanduq_loader::LoadError;
use sanduq_support::rendering::{render_chain, shorten_type_name};

/// Main error type for all container operations.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// A tagged service breaks the rules of its tag.
    #[error("{}", .0)]
    Configuration(ConfigurationError),

    /// A referenced or required definition does not exist.
    #[error("{}", .0)]
    DefinitionNotFound(DefinitionNotFoundError),

    /// Constructor arguments reference each other in a cycle.
    #[error("{}", .0)]
    CircularReference(CircularReferenceError),

    /// Definition was already registered (when override is disabled).
    #[error("{}", .0)]
    AlreadyRegistered(AlreadyRegisteredError),

    /// A `%placeholder%` names an unknown parameter.
    #[error("Parameter not found: \"{name}\"{}", required_by_suffix(.required_by))]
    ParameterNotFound {
        name: String,
        required_by: Option<String>,
    },

    /// Parameters reference each other in a cycle.
    #[error("Circular parameter reference detected:\n  {}", render_chain(.chain))]
    CircularParameter { chain: Vec<String> },

    /// A list or map parameter was embedded inside a string.
    #[error("Parameter \"{name}\" cannot be interpolated into \"{value}\": it is not a scalar")]
    ParameterNotInterpolable { name: String, value: String },

    /// Loading configuration failed.
    #[error(transparent)]
    Load(#[from] LoadError),
}

fn required_by_suffix(required_by: &Option<String>) -> String {
    match required_by {
        Some(id) => format!("\n  Required by: {id}"),
        None => String::new(),
    }
}

/// What is wrong with a tagged service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationErrorKind {
    /// The definition is abstract.
    Abstract,
    /// The definition is private.
    NotPublic,
    /// The definition's class does not satisfy the required base.
    NotSubtype {
        base: String,
        class: Option<String>,
    },
    /// A required tag attribute is missing.
    MissingAttribute { attribute: String },
    /// A tag attribute has the wrong type.
    InvalidAttribute { attribute: String, expected: String },
}

/// Error when a tagged service cannot be registered.
///
/// Always fatal: assembly aborts instead of skipping the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationError {
    /// The tagged service
    pub id: String,
    /// The tag being processed
    pub tag: String,
    pub kind: ConfigurationErrorKind,
}

impl ConfigurationError {
    pub fn new(id: impl Into<String>, tag: impl Into<String>, kind: ConfigurationErrorKind) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            kind,
        }
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ConfigurationErrorKind::Abstract => {
                write!(f, "The service \"{}\" for \"{}\" is abstract.", self.id, self.tag)?;
                write!(f, "\n  Hint: Tag a concrete definition instead")
            }
            ConfigurationErrorKind::NotPublic => {
                write!(f, "The service \"{}\" for \"{}\" is not public.", self.id, self.tag)?;
                write!(f, "\n  Hint: Mark the definition as public")
            }
            ConfigurationErrorKind::NotSubtype { ref base, ref class } => {
                write!(
                    f,
                    "The service \"{}\" is not a subclass of \"{}\" for \"{}\".",
                    self.id, base, self.tag,
                )?;
                match class {
                    Some(class) => write!(
                        f,
                        "\n  Hint: Declare {} as implementing {}",
                        shorten_type_name(class),
                        shorten_type_name(base),
                    ),
                    None => write!(f, "\n  Hint: The definition has no class"),
                }
            }
            ConfigurationErrorKind::MissingAttribute { ref attribute } => write!(
                f,
                "The service \"{}\" must define the \"{}\" attribute on its \"{}\" tag.",
                self.id, attribute, self.tag,
            ),
            ConfigurationErrorKind::InvalidAttribute {
                ref attribute,
                ref expected,
            } => {
                write!(
                    f,
                    "The \"{}\" attribute of service \"{}\" on its \"{}\" tag is invalid.",
                    attribute, self.id, self.tag,
                )?;
                write!(f, "\n  Hint: Use {expected}")
            }
        }
    }
}

/// Error when a definition does not exist.
///
/// Includes "did you mean?" suggestions.
#[derive(Debug)]
pub struct DefinitionNotFoundError {
    /// The identifier that was requested
    pub id: String,
    /// What required this definition (if known)
    pub required_by: Option<String>,
    /// Similar identifiers that ARE registered
    pub suggestions: Vec<String>,
}

impl fmt::Display for DefinitionNotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "The definition \"{}\" does not exist.", self.id)?;

        if let Some(ref parent) = self.required_by {
            write!(f, "\n  Required by: {parent}")?;
        }

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        Ok(())
    }
}

/// Error when constructor arguments form a reference cycle.
///
/// Shows the full chain so you can see WHERE the cycle is.
#[derive(Debug)]
pub struct CircularReferenceError {
    /// Example: ["a", "b", "c", "a"]
    pub chain: Vec<String>,
}

impl fmt::Display for CircularReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Circular reference detected:\n  {}", render_chain(&self.chain))?;
        write!(
            f,
            "\n  Hint: Move one of the references to a method call (setter injection)"
        )
    }
}

/// Error when trying to register a definition that already exists.
#[derive(Debug)]
pub struct AlreadyRegisteredError {
    pub id: String,
}

impl fmt::Display for AlreadyRegisteredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Definition already registered: {}", self.id)?;
        write!(
            f,
            "\n  Hint: Enable allow_override on the builder to replace it explicitly"
        )
    }
}

impl From<ConfigurationError> for ContainerError {
    fn from(err: ConfigurationError) -> Self {
        ContainerError::Configuration(err)
    }
}

/// Convenient Result type for container operations.
pub type Result<T> = std::result::Result<T, ContainerError>;
