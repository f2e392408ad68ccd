//! Tagged service discovery and registration.
//!
//! A [`TaggedPass`] finds every definition carrying its tag, checks that
//! each one can be registered, and hands it to a [`TaggedRegistration`]
//! strategy that performs the wiring.

use tracing::{debug, instrument, trace, warn};

use crate::error::{ConfigurationError, ConfigurationErrorKind, Result};
use crate::pass::CompilerPass;
use crate::registry::{DefinitionRegistry, TaggedService};

/// What happens to each valid tagged service.
pub trait TaggedRegistration: Send + Sync {
    /// Wires one tagged service into the registry.
    fn register(&self, registry: &mut dyn DefinitionRegistry, service: &TaggedService) -> Result<()>;

    /// Checks that the service may be registered.
    ///
    /// Defaults to [`validate_tagged_service`].
    fn validate(
        &self,
        registry: &dyn DefinitionRegistry,
        base: Option<&str>,
        service: &TaggedService,
    ) -> Result<()> {
        validate_tagged_service(registry, &service.tag, base, &service.id)
    }
}

/// Rejects abstract and private definitions, and classes that do not
/// satisfy `base`.
///
/// # Errors
/// [`ContainerError::Configuration`](crate::error::ContainerError::Configuration)
/// naming the service and tag.
pub fn validate_tagged_service(
    registry: &dyn DefinitionRegistry,
    tag: &str,
    base: Option<&str>,
    id: &str,
) -> Result<()> {
    let definition = registry.require_definition(id)?;

    if definition.is_abstract() {
        return Err(ConfigurationError::new(id, tag, ConfigurationErrorKind::Abstract).into());
    }

    if !definition.is_public() {
        return Err(ConfigurationError::new(id, tag, ConfigurationErrorKind::NotPublic).into());
    }

    if let Some(base) = base {
        match registry.resolve_class(id)? {
            Some(class) if registry.satisfies(&class, base) => {}
            class => {
                return Err(ConfigurationError::new(
                    id,
                    tag,
                    ConfigurationErrorKind::NotSubtype {
                        base: base.to_string(),
                        class,
                    },
                )
                .into());
            }
        }
    }

    Ok(())
}

/// Registers every service carrying `tag` through strategy `R`.
///
/// # Examples
/// ```
/// use sanduq_container::prelude::*;
///
/// struct Collect;
///
/// impl TaggedRegistration for Collect {
///     fn register(&self, registry: &mut dyn DefinitionRegistry, service: &TaggedService) -> Result<()> {
///         registry
///             .require_definition_mut("collector")?
///             .add_method_call("collect", vec![Argument::reference(&service.id)]);
///         Ok(())
///     }
/// }
///
/// let mut builder = Container::builder();
/// builder.set_definition("collector", Definition::new("app::Collector")).unwrap();
/// builder.set_definition("a", Definition::new("app::A").tag("collect")).unwrap();
/// builder.add_compiler_pass(TaggedPass::new("collect", Collect), PassStage::BeforeOptimization);
///
/// let container = builder.compile().unwrap();
/// let calls = container.definition("collector").unwrap().method_calls();
/// assert_eq!(calls[0].method, "collect");
/// ```
pub struct TaggedPass<R> {
    tag: String,
    base: Option<String>,
    registration: R,
}

impl<R: TaggedRegistration> TaggedPass<R> {
    pub fn new(tag: impl Into<String>, registration: R) -> Self {
        Self {
            tag: tag.into(),
            base: None,
            registration,
        }
    }

    /// Requires tagged classes to satisfy `base`.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }
}

impl<R: TaggedRegistration> CompilerPass for TaggedPass<R> {
    #[instrument(skip_all, fields(tag = %self.tag), name = "tagged_pass")]
    fn process(&self, registry: &mut dyn DefinitionRegistry) -> Result<()> {
        let services = registry.find_tagged_service_ids(&self.tag);
        debug!(count = services.len(), base = ?self.base, "Registering tagged services");

        for service in &services {
            if let Err(err) = self.registration.validate(&*registry, self.base.as_deref(), service) {
                warn!(id = %service.id, "Tagged service rejected");
                return Err(err);
            }

            self.registration.register(registry, service)?;
            trace!(id = %service.id, occurrences = service.attributes.len(), "Registered tagged service");
        }

        Ok(())
    }
}

impl<R> std::fmt::Debug for TaggedPass<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaggedPass")
            .field("tag", &self.tag)
            .field("base", &self.base)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ContainerBuilder;
    use crate::definition::{Argument, Definition};
    use crate::error::ContainerError;
    use crate::pass::PassStage;

    const TAG: &str = "app.command";
    const BASE: &str = "console::command::Command";

    struct Record;

    impl TaggedRegistration for Record {
        fn register(&self, registry: &mut dyn DefinitionRegistry, service: &TaggedService) -> Result<()> {
            registry
                .require_definition_mut("app")?
                .add_method_call("add", vec![Argument::reference(&service.id)]);
            Ok(())
        }
    }

    fn builder() -> ContainerBuilder {
        let mut builder = ContainerBuilder::new();
        builder.set_definition("app", Definition::new("console::Application")).unwrap();
        builder.declare_type("app::Greet", [BASE]);
        builder
    }

    fn added(builder: &ContainerBuilder) -> Vec<String> {
        builder
            .definition("app")
            .unwrap()
            .method_calls()
            .iter()
            .map(|call| call.arguments[0].to_string())
            .collect()
    }

    #[test]
    fn registers_valid_services_in_order() {
        let mut builder = builder();
        builder.set_definition("greet", Definition::new("app::Greet").tag(TAG)).unwrap();
        builder.set_definition("untagged", Definition::new("app::Greet")).unwrap();
        builder.set_definition("greet2", Definition::new("app::Greet").tag(TAG)).unwrap();

        TaggedPass::new(TAG, Record).with_base(BASE).process(&mut builder).unwrap();

        assert_eq!(added(&builder), vec!["@greet", "@greet2"]);
    }

    #[test]
    fn abstract_service_is_rejected_without_side_effect() {
        let mut builder = builder();
        builder
            .set_definition("greet", Definition::new("app::Greet").tag(TAG).abstract_(true))
            .unwrap();

        let err = TaggedPass::new(TAG, Record).process(&mut builder).unwrap_err();
        match err {
            ContainerError::Configuration(e) => {
                assert_eq!(e.id, "greet");
                assert_eq!(e.kind, ConfigurationErrorKind::Abstract);
            }
            other => panic!("Expected Configuration, got: {other:?}"),
        }
        assert!(added(&builder).is_empty());
    }

    #[test]
    fn private_service_is_rejected() {
        let mut builder = builder();
        builder
            .set_definition("greet", Definition::new("app::Greet").tag(TAG).public(false))
            .unwrap();

        match TaggedPass::new(TAG, Record).process(&mut builder).unwrap_err() {
            ContainerError::Configuration(e) => assert_eq!(e.kind, ConfigurationErrorKind::NotPublic),
            other => panic!("Expected Configuration, got: {other:?}"),
        }
        assert!(added(&builder).is_empty());
    }

    #[test]
    fn wrong_base_is_rejected() {
        let mut builder = builder();
        builder.set_definition("other", Definition::new("app::Other").tag(TAG)).unwrap();

        match TaggedPass::new(TAG, Record).with_base(BASE).process(&mut builder).unwrap_err() {
            ContainerError::Configuration(e) => {
                assert_eq!(
                    e.kind,
                    ConfigurationErrorKind::NotSubtype {
                        base: BASE.into(),
                        class: Some("app::Other".into()),
                    }
                );
            }
            other => panic!("Expected Configuration, got: {other:?}"),
        }
    }

    #[test]
    fn error_stops_remaining_services() {
        let mut builder = builder();
        builder.set_definition("first", Definition::new("app::Greet").tag(TAG)).unwrap();
        builder
            .set_definition("broken", Definition::new("app::Greet").tag(TAG).public(false))
            .unwrap();
        builder.set_definition("last", Definition::new("app::Greet").tag(TAG)).unwrap();

        assert!(TaggedPass::new(TAG, Record).process(&mut builder).is_err());
        assert_eq!(added(&builder), vec!["@first"]);
    }

    #[test]
    fn class_placeholder_is_resolved_before_base_check() {
        let mut builder = builder();
        builder.set_parameter("greet.class", "app::Greet");
        builder
            .set_definition("greet", Definition::new("%greet.class%").tag(TAG))
            .unwrap();

        TaggedPass::new(TAG, Record).with_base(BASE).process(&mut builder).unwrap();
        assert_eq!(added(&builder), vec!["@greet"]);
    }

    #[test]
    fn missing_class_fails_base_check() {
        let mut builder = builder();
        builder.set_definition("greet", Definition::synthetic().tag(TAG)).unwrap();

        match TaggedPass::new(TAG, Record).with_base(BASE).process(&mut builder).unwrap_err() {
            ContainerError::Configuration(e) => {
                assert!(matches!(e.kind, ConfigurationErrorKind::NotSubtype { class: None, .. }));
            }
            other => panic!("Expected Configuration, got: {other:?}"),
        }
    }

    #[test]
    fn runs_as_compiler_pass() {
        let mut builder = builder();
        builder.set_definition("greet", Definition::new("app::Greet").tag(TAG)).unwrap();
        builder.add_compiler_pass(TaggedPass::new(TAG, Record).with_base(BASE), PassStage::BeforeOptimization);

        let container = builder.compile().unwrap();
        let calls = container.definition("app").unwrap().method_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].arguments, vec![Argument::reference("greet")]);
    }
}
