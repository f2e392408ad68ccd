//! YAML configuration files.
//!
//! ```yaml
//! parameters:
//!   box.console.name: My App
//!
//! types:
//!   app::GreetCommand: ['console::command::Command']
//!
//! services:
//!   app.greet:
//!     class: app::GreetCommand
//!     arguments: ['@app.greeter', '%box.console.name%']
//!     calls:
//!       - [setVerbose, [true]]
//!     tags:
//!       - box.console.command
//!       - { name: box.console.event.listener, event: console.command }
//! ```
//!
//! Strings starting with `@` are references; `@@` escapes a literal `@`.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use sanduq_loader::{FileLocator, LoadError, Loader};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::container::ContainerBuilder;
use crate::definition::{Argument, Definition, TagAttributes};
use crate::error::{AlreadyRegisteredError, ContainerError};
use crate::parameters::ParameterValue;
use crate::registry::DefinitionRegistry;

/// Builder shared between loaders and the code that compiles it.
pub type SharedBuilder = Arc<RwLock<ContainerBuilder>>;

/// Loads YAML files into a [`SharedBuilder`].
///
/// Supports `.yml` and `.yaml` resources with no type hint or the
/// `yaml` hint.
#[derive(Debug, Clone)]
pub struct YamlFileLoader {
    builder: SharedBuilder,
    locator: FileLocator,
}

impl YamlFileLoader {
    pub fn new(builder: SharedBuilder, locator: FileLocator) -> Self {
        Self { builder, locator }
    }

    pub fn builder(&self) -> &SharedBuilder {
        &self.builder
    }

    pub fn locator(&self) -> &FileLocator {
        &self.locator
    }
}

impl Loader for YamlFileLoader {
    fn supports(&self, resource: &str, kind: Option<&str>) -> bool {
        matches!(kind, None | Some("yaml")) && (resource.ends_with(".yml") || resource.ends_with(".yaml"))
    }

    #[instrument(skip(self), name = "yaml_load")]
    fn load(&self, resource: &str, kind: Option<&str>) -> sanduq_loader::Result<()> {
        let path = self.locator.locate(resource)?;
        let content = fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;

        if content.trim().is_empty() {
            debug!(path = %path.display(), "Empty configuration file");
            return Ok(());
        }

        let document: YamlDocument = serde_yaml::from_str(&content).map_err(|err| LoadError::Invalid {
            path: path.clone(),
            reason: err.to_string(),
        })?;

        let mut builder = self.builder.write();
        document.apply(&mut builder, &path)?;

        debug!(path = %path.display(), "Loaded configuration file");
        Ok(())
    }
}

// ── Document model ──

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct YamlDocument {
    #[serde(default)]
    parameters: IndexMap<String, ParameterValue>,
    #[serde(default)]
    types: IndexMap<String, Vec<String>>,
    #[serde(default)]
    services: IndexMap<String, YamlService>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct YamlService {
    class: Option<String>,
    #[serde(default)]
    arguments: Vec<ParameterValue>,
    #[serde(default)]
    calls: Vec<YamlCall>,
    #[serde(default)]
    tags: Vec<YamlTag>,
    #[serde(default = "default_public")]
    public: bool,
    #[serde(default, rename = "abstract")]
    is_abstract: bool,
}

fn default_public() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum YamlCall {
    WithArguments(String, Vec<ParameterValue>),
    Bare([String; 1]),
    Name(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum YamlTag {
    Name(String),
    Attributes(TagAttributes),
}

impl YamlDocument {
    /// Applies the document to the builder, or nothing at all on error.
    fn apply(self, builder: &mut ContainerBuilder, path: &Path) -> sanduq_loader::Result<()> {
        let invalid = |reason: String| LoadError::Invalid {
            path: path.to_path_buf(),
            reason,
        };

        let mut definitions = Vec::with_capacity(self.services.len());
        for (id, service) in self.services {
            let definition = service
                .into_definition()
                .map_err(|reason| invalid(format!("service \"{id}\": {reason}")))?;

            if !builder.allows_override() && builder.has_definition(&id) {
                let err = ContainerError::AlreadyRegistered(AlreadyRegisteredError { id });
                return Err(invalid(err.to_string()));
            }
            definitions.push((id, definition));
        }

        for (name, value) in self.parameters {
            builder.set_parameter(name, value);
        }

        for (class, capabilities) in self.types {
            builder.declare_type(class, capabilities);
        }

        for (id, definition) in definitions {
            builder
                .set_definition(id, definition)
                .map_err(|err| invalid(err.to_string()))?;
        }

        Ok(())
    }
}

impl YamlService {
    fn into_definition(self) -> Result<Definition, String> {
        let mut definition = match self.class {
            Some(class) => Definition::new(class),
            None => Definition::default(),
        };

        for argument in self.arguments {
            definition.add_argument(to_argument(argument));
        }

        for call in self.calls {
            let (method, arguments) = match call {
                YamlCall::WithArguments(method, arguments) => (method, arguments),
                YamlCall::Bare([method]) | YamlCall::Name(method) => (method, Vec::new()),
            };
            definition.add_method_call(method, arguments.into_iter().map(to_argument).collect());
        }

        for tag in self.tags {
            match tag {
                YamlTag::Name(name) => definition.add_tag(name, TagAttributes::new()),
                YamlTag::Attributes(mut attributes) => {
                    let name = match attributes.remove("name") {
                        Some(ParameterValue::String(name)) => name,
                        Some(other) => return Err(format!("tag name must be a string, got {other}")),
                        None => return Err("tag is missing its \"name\"".to_string()),
                    };
                    definition.add_tag(name, attributes);
                }
            }
        }

        definition.set_public(self.public);
        definition.set_abstract(self.is_abstract);
        Ok(definition)
    }
}

fn to_argument(value: ParameterValue) -> Argument {
    let ParameterValue::String(s) = &value else {
        return Argument::Value(value);
    };

    match s.strip_prefix('@') {
        Some(rest) if rest.starts_with('@') => Argument::value(rest),
        Some(rest) => Argument::reference(rest),
        None => Argument::Value(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(files: &[(&str, &str)]) -> (tempfile::TempDir, YamlFileLoader) {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        let builder: SharedBuilder = Arc::new(RwLock::new(ContainerBuilder::new()));
        let loader = YamlFileLoader::new(builder, FileLocator::new([dir.path()]));
        (dir, loader)
    }

    #[test]
    fn supports_yaml_extensions_and_hint() {
        let (_dir, loader) = setup(&[]);
        assert!(loader.supports("console.yml", None));
        assert!(loader.supports("console.yaml", Some("yaml")));
        assert!(!loader.supports("console.yml", Some("xml")));
        assert!(!loader.supports("console.yml.dist", None));
        assert!(!loader.supports("console.xml", None));
    }

    #[test]
    fn loads_parameters_and_services() {
        let yaml = r#"
parameters:
  box.console.name: My App
  retries: 3

types:
  app::GreetCommand: ['console::command::Command']

services:
  app.greeter:
    class: app::Greeter
  app.greet:
    class: app::GreetCommand
    arguments: ['@app.greeter', '@@home', '%box.console.name%']
    calls:
      - [setVerbose, [true]]
      - [reset]
    tags:
      - box.console.command
      - { name: box.console.event.listener, event: console.command, priority: 10 }
  app.base:
    abstract: true
    public: false
"#;
        let (_dir, loader) = setup(&[("console.yml", yaml)]);
        loader.load("console.yml", None).unwrap();

        let builder = loader.builder().read();
        assert_eq!(builder.parameter("retries"), Some(&ParameterValue::Integer(3)));
        assert!(builder.satisfies("app::GreetCommand", "console::command::Command"));

        let greet = builder.definition("app.greet").unwrap();
        assert_eq!(greet.class(), Some("app::GreetCommand"));
        assert_eq!(
            greet.arguments(),
            [
                Argument::reference("app.greeter"),
                Argument::value("@home"),
                Argument::value("%box.console.name%"),
            ]
        );
        assert_eq!(greet.method_calls()[0].arguments, vec![Argument::value(true)]);
        assert_eq!(greet.method_calls()[1].method, "reset");
        assert!(greet.has_tag("box.console.command"));

        let listener = &greet.tag_attributes("box.console.event.listener").unwrap()[0];
        assert_eq!(listener["event"], ParameterValue::from("console.command"));
        assert_eq!(listener["priority"], ParameterValue::Integer(10));
        assert!(!listener.contains_key("name"));

        let base = builder.definition("app.base").unwrap();
        assert!(base.is_abstract());
        assert!(!base.is_public());
        assert_eq!(base.class(), None);
    }

    #[test]
    fn missing_file_is_not_found() {
        let (_dir, loader) = setup(&[]);
        assert!(loader.load("console.yml", None).unwrap_err().is_not_found());
    }

    #[test]
    fn malformed_yaml_is_invalid() {
        let (_dir, loader) = setup(&[("broken.yml", "services: {app: [unclosed")]);
        match loader.load("broken.yml", None).unwrap_err() {
            LoadError::Invalid { path, .. } => assert!(path.ends_with("broken.yml")),
            other => panic!("Expected Invalid, got: {other:?}"),
        }
    }

    #[test]
    fn unknown_keys_are_invalid() {
        let (_dir, loader) = setup(&[("extra.yml", "imports: []\n")]);
        assert!(matches!(
            loader.load("extra.yml", None),
            Err(LoadError::Invalid { .. })
        ));

        let (_dir, loader) = setup(&[("extra.yml", "services:\n  a:\n    factory: x\n")]);
        assert!(matches!(
            loader.load("extra.yml", None),
            Err(LoadError::Invalid { .. })
        ));
    }

    #[test]
    fn tag_without_name_is_invalid() {
        let (_dir, loader) = setup(&[("tags.yml", "services:\n  a:\n    tags: [{ event: x }]\n")]);
        match loader.load("tags.yml", None).unwrap_err() {
            LoadError::Invalid { reason, .. } => assert!(reason.contains("\"a\"")),
            other => panic!("Expected Invalid, got: {other:?}"),
        }
    }

    #[test]
    fn failed_load_leaves_builder_unchanged() {
        let yaml = r#"
parameters:
  leaked: yes
types:
  app::A: ['app::Base']
services:
  a: { class: app::A }
  b:
    class: app::B
    tags: [{ event: x }]
"#;
        let (_dir, loader) = setup(&[("partial.yml", yaml)]);
        assert!(matches!(
            loader.load("partial.yml", None),
            Err(LoadError::Invalid { .. })
        ));

        let builder = loader.builder().read();
        assert!(!builder.has_parameter("leaked"));
        assert!(!builder.has_definition("a"));
        assert!(!builder.satisfies("app::A", "app::Base"));
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn duplicate_service_rejects_whole_document() {
        let (_dir, loader) = setup(&[
            ("a.yml", "services:\n  app: { class: app::A }\n"),
            ("b.yml", "parameters:\n  leaked: 1\nservices:\n  other: { class: app::O }\n  app: { class: app::B }\n"),
        ]);
        loader.load("a.yml", None).unwrap();
        assert!(loader.load("b.yml", None).is_err());

        let builder = loader.builder().read();
        assert!(!builder.has_parameter("leaked"));
        assert!(!builder.has_definition("other"));
        assert_eq!(builder.definition("app").unwrap().class(), Some("app::A"));
    }

    #[test]
    fn empty_file_is_a_no_op() {
        let (_dir, loader) = setup(&[("empty.yml", "\n  \n")]);
        loader.load("empty.yml", None).unwrap();
        assert_eq!(loader.builder().read().len(), 1);
    }

    #[test]
    fn duplicate_service_is_invalid() {
        let (_dir, loader) = setup(&[("a.yml", "services:\n  app: { class: app::A }\n")]);
        loader.load("a.yml", None).unwrap();

        match loader.load("a.yml", None).unwrap_err() {
            LoadError::Invalid { reason, .. } => {
                let expected = ContainerError::AlreadyRegistered(AlreadyRegisteredError {
                    id: "app".into(),
                });
                assert_eq!(reason, expected.to_string());
            }
            other => panic!("Expected Invalid, got: {other:?}"),
        }
    }
}
