//! Registration strategies for the console tags.

use sanduq_support::naming::listener_method;
use tracing::trace;

use crate::definition::Argument;
use crate::error::{ConfigurationError, ConfigurationErrorKind, Result};
use crate::ids::ServiceIds;
use crate::parameters::ParameterValue;
use crate::registry::{DefinitionRegistry, TaggedService};
use crate::tagged::{TaggedRegistration, validate_tagged_service};

/// Adds commands to the application and gives each the helper set.
#[derive(Debug, Clone)]
pub struct CommandRegistration {
    application: String,
    helper_set: String,
}

impl CommandRegistration {
    pub fn new(ids: &ServiceIds) -> Self {
        Self {
            application: ids.application.clone(),
            helper_set: ids.helper_set.clone(),
        }
    }
}

impl TaggedRegistration for CommandRegistration {
    fn register(&self, registry: &mut dyn DefinitionRegistry, service: &TaggedService) -> Result<()> {
        registry
            .require_definition_mut(&self.application)?
            .add_method_call("add", vec![Argument::reference(&service.id)]);

        registry
            .require_definition_mut(&service.id)?
            .add_method_call("setHelperSet", vec![Argument::reference(&self.helper_set)]);

        trace!(command = %service.id, application = %self.application, "Command added");
        Ok(())
    }
}

/// Adds helpers to the helper set.
#[derive(Debug, Clone)]
pub struct HelperRegistration {
    helper_set: String,
}

impl HelperRegistration {
    pub fn new(ids: &ServiceIds) -> Self {
        Self {
            helper_set: ids.helper_set.clone(),
        }
    }
}

impl TaggedRegistration for HelperRegistration {
    fn register(&self, registry: &mut dyn DefinitionRegistry, service: &TaggedService) -> Result<()> {
        registry
            .require_definition_mut(&self.helper_set)?
            .add_method_call("set", vec![Argument::reference(&service.id)]);
        Ok(())
    }
}

/// Adds event listeners to the event dispatcher.
///
/// Every tag occurrence is one listener. Attributes:
/// - `event` (required)
/// - `method` (default: `on` followed by the camel-cased event)
/// - `priority` (default: `0`)
#[derive(Debug, Clone)]
pub struct ListenerRegistration {
    dispatcher: String,
}

impl ListenerRegistration {
    pub fn new(ids: &ServiceIds) -> Self {
        Self {
            dispatcher: ids.event_dispatcher.clone(),
        }
    }
}

impl TaggedRegistration for ListenerRegistration {
    fn validate(
        &self,
        registry: &dyn DefinitionRegistry,
        base: Option<&str>,
        service: &TaggedService,
    ) -> Result<()> {
        validate_tagged_service(registry, &service.tag, base, &service.id)?;

        for attributes in &service.attributes {
            if attributes.get("event").and_then(ParameterValue::to_scalar_string).is_none() {
                return Err(ConfigurationError::new(
                    &service.id,
                    &service.tag,
                    ConfigurationErrorKind::MissingAttribute {
                        attribute: "event".into(),
                    },
                )
                .into());
            }

            let priority = attributes.get("priority");
            if priority.is_some_and(|priority| !matches!(priority, ParameterValue::Integer(_))) {
                return Err(ConfigurationError::new(
                    &service.id,
                    &service.tag,
                    ConfigurationErrorKind::InvalidAttribute {
                        attribute: "priority".into(),
                        expected: "an integer".into(),
                    },
                )
                .into());
            }
        }

        Ok(())
    }

    fn register(&self, registry: &mut dyn DefinitionRegistry, service: &TaggedService) -> Result<()> {
        let dispatcher = registry.require_definition_mut(&self.dispatcher)?;

        for attributes in &service.attributes {
            let event = attributes
                .get("event")
                .and_then(ParameterValue::to_scalar_string)
                .unwrap_or_default();
            let method = attributes
                .get("method")
                .and_then(ParameterValue::to_scalar_string)
                .unwrap_or_else(|| listener_method(&event));
            // validated as an integer when present
            let priority = match attributes.get("priority") {
                Some(ParameterValue::Integer(priority)) => *priority,
                _ => 0,
            };

            trace!(listener = %service.id, %event, %method, priority, "Listener added");
            dispatcher.add_method_call(
                "addListenerService",
                vec![
                    Argument::value(event),
                    Argument::value(vec![service.id.clone(), method]),
                    Argument::value(priority),
                ],
            );
        }

        Ok(())
    }
}

/// Adds event subscribers to the event dispatcher.
#[derive(Debug, Clone)]
pub struct SubscriberRegistration {
    dispatcher: String,
}

impl SubscriberRegistration {
    pub fn new(ids: &ServiceIds) -> Self {
        Self {
            dispatcher: ids.event_dispatcher.clone(),
        }
    }
}

impl TaggedRegistration for SubscriberRegistration {
    fn register(&self, registry: &mut dyn DefinitionRegistry, service: &TaggedService) -> Result<()> {
        let class = registry
            .resolve_class(&service.id)?
            .map(ParameterValue::from)
            .unwrap_or(ParameterValue::Null);

        registry.require_definition_mut(&self.dispatcher)?.add_method_call(
            "addSubscriberService",
            vec![Argument::value(service.id.clone()), Argument::Value(class)],
        );
        Ok(())
    }
}
