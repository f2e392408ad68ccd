//! Default console application wiring.
//!
//! [`ConsoleProvider`] registers the application, its event dispatcher,
//! helper set, default helpers and commands, input and output managers,
//! and the compiler passes that wire tagged services into them.
//!
//! Every default is only set if absent, so definitions and parameters
//! loaded beforehand (from YAML, for example) win.

use indexmap::IndexMap;
use tracing::{debug, instrument, trace};

use crate::container::{ContainerBuilder, SERVICE_CONTAINER};
use crate::definition::{Argument, Definition};
use crate::error::Result;
use crate::ids::ServiceIds;
use crate::parameters::ParameterValue;
use crate::pass::PassStage;
use crate::provider::Provider;
use crate::registration::{
    CommandRegistration, HelperRegistration, ListenerRegistration, SubscriberRegistration,
};
use crate::registry::DefinitionRegistry;
use crate::tagged::TaggedPass;

/// Default classes, lists and parameters of a console application.
#[derive(Debug, Clone)]
pub struct ConsoleDefaults {
    pub name: String,
    pub version: String,
    pub auto_exit: bool,

    pub application_class: String,
    pub event_dispatcher_class: String,
    pub helper_set_class: String,
    pub container_helper_class: String,
    pub input_class: String,
    pub output_class: String,

    /// Command name → class
    pub commands: IndexMap<String, String>,
    /// Helper name → class
    pub helpers: IndexMap<String, String>,

    /// Capability every command class must declare
    pub command_base: String,
    /// Capability every helper class must declare
    pub helper_base: String,
    /// Capability every event subscriber class must declare
    pub subscriber_base: String,
}

impl Default for ConsoleDefaults {
    fn default() -> Self {
        let map = |entries: &[(&str, &str)]| {
            entries
                .iter()
                .map(|(name, class)| (name.to_string(), class.to_string()))
                .collect::<IndexMap<_, _>>()
        };

        Self {
            name: "UNKNOWN".into(),
            version: "UNKNOWN".into(),
            auto_exit: false,

            application_class: "console::Application".into(),
            event_dispatcher_class: "event::ContainerAwareEventDispatcher".into(),
            helper_set_class: "console::helper::HelperSet".into(),
            container_helper_class: "sanduq::helper::ContainerHelper".into(),
            input_class: "console::input::ArgvInput".into(),
            output_class: "console::output::ConsoleOutput".into(),

            commands: map(&[
                ("help", "console::command::HelpCommand"),
                ("list", "console::command::ListCommand"),
            ]),
            helpers: map(&[
                ("formatter", "console::helper::FormatterHelper"),
                ("debug_formatter", "console::helper::DebugFormatterHelper"),
                ("process", "console::helper::ProcessHelper"),
                ("question", "console::helper::QuestionHelper"),
            ]),

            command_base: "console::command::Command".into(),
            helper_base: "console::helper::Helper".into(),
            subscriber_base: "event::EventSubscriber".into(),
        }
    }
}

/// Registers the default console services.
///
/// # Examples
/// ```
/// use sanduq_container::prelude::*;
///
/// let mut builder = Container::builder();
/// builder.add_provider(&ConsoleProvider::default()).unwrap();
///
/// let container = builder.compile().unwrap();
/// let app = container.definition("box.console").unwrap();
/// assert_eq!(app.class(), Some("console::Application"));
/// assert!(app.has_method_call("setHelperSet"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConsoleProvider {
    ids: ServiceIds,
    defaults: ConsoleDefaults,
}

impl ConsoleProvider {
    pub fn new(ids: ServiceIds, defaults: ConsoleDefaults) -> Self {
        Self { ids, defaults }
    }

    pub fn ids(&self) -> &ServiceIds {
        &self.ids
    }

    pub fn defaults(&self) -> &ConsoleDefaults {
        &self.defaults
    }

    fn register_application(&self, builder: &mut ContainerBuilder) -> Result<()> {
        let ids = &self.ids;
        let defaults = &self.defaults;

        set_definition_if_absent(builder, &ids.application, || {
            Definition::new(ServiceIds::class_placeholder(&ids.application))
                .argument(Argument::value(format!("%{}%", ids.parameter("name"))))
                .argument(Argument::value(format!("%{}%", ids.parameter("version"))))
                .method_call(
                    "setAutoExit",
                    vec![Argument::value(format!("%{}%", ids.parameter("auto_exit")))],
                )
        })?;

        set_parameter_if_absent(builder, ids.parameter("auto_exit"), defaults.auto_exit);
        set_parameter_if_absent(
            builder,
            ServiceIds::class_parameter(&ids.application),
            defaults.application_class.as_str(),
        );
        set_parameter_if_absent(builder, ids.parameter("name"), defaults.name.as_str());
        set_parameter_if_absent(builder, ids.parameter("version"), defaults.version.as_str());
        Ok(())
    }

    fn register_event_dispatcher(&self, builder: &mut ContainerBuilder) -> Result<()> {
        let ids = &self.ids;

        set_definition_if_absent(builder, &ids.event_dispatcher, || {
            Definition::new(ServiceIds::class_placeholder(&ids.event_dispatcher))
                .argument(Argument::reference(SERVICE_CONTAINER))
        })?;
        add_method_call_once(
            builder,
            &ids.application,
            "setDispatcher",
            vec![Argument::reference(&ids.event_dispatcher)],
        )?;
        set_parameter_if_absent(
            builder,
            ServiceIds::class_parameter(&ids.event_dispatcher),
            self.defaults.event_dispatcher_class.as_str(),
        );
        Ok(())
    }

    fn register_compiler_passes(&self, builder: &mut ContainerBuilder) {
        let ids = &self.ids;
        let defaults = &self.defaults;
        let stage = PassStage::BeforeOptimization;

        builder.add_compiler_pass(
            TaggedPass::new(&ids.command_tag, CommandRegistration::new(ids)).with_base(&defaults.command_base),
            stage,
        );
        builder.add_compiler_pass(
            TaggedPass::new(&ids.helper_tag, HelperRegistration::new(ids)).with_base(&defaults.helper_base),
            stage,
        );
        builder.add_compiler_pass(
            TaggedPass::new(&ids.listener_tag, ListenerRegistration::new(ids)),
            stage,
        );
        builder.add_compiler_pass(
            TaggedPass::new(&ids.subscriber_tag, SubscriberRegistration::new(ids))
                .with_base(&defaults.subscriber_base),
            stage,
        );
    }

    fn register_helper_set(&self, builder: &mut ContainerBuilder) -> Result<()> {
        let ids = &self.ids;

        set_definition_if_absent(builder, &ids.helper_set, || {
            Definition::new(ServiceIds::class_placeholder(&ids.helper_set))
        })?;
        add_method_call_once(
            builder,
            &ids.application,
            "setHelperSet",
            vec![Argument::reference(&ids.helper_set)],
        )?;
        set_parameter_if_absent(
            builder,
            ServiceIds::class_parameter(&ids.helper_set),
            self.defaults.helper_set_class.as_str(),
        );
        Ok(())
    }

    fn register_default_helpers(&self, builder: &mut ContainerBuilder) -> Result<()> {
        for (name, class) in &self.defaults.helpers {
            let id = self.ids.helper(name);
            self.register_tagged_default(builder, &id, &self.ids.helper_tag, class)?;
            builder.declare_type(class.as_str(), [self.defaults.helper_base.as_str()]);
        }
        Ok(())
    }

    fn register_container_helper(&self, builder: &mut ContainerBuilder) -> Result<()> {
        let ids = &self.ids;

        set_definition_if_absent(builder, &ids.container_helper, || {
            Definition::new(ServiceIds::class_placeholder(&ids.container_helper))
                .argument(Argument::reference(SERVICE_CONTAINER))
                .tag(&ids.helper_tag)
        })?;
        set_parameter_if_absent(
            builder,
            ServiceIds::class_parameter(&ids.container_helper),
            self.defaults.container_helper_class.as_str(),
        );
        builder.declare_type(
            self.defaults.container_helper_class.as_str(),
            [self.defaults.helper_base.as_str()],
        );
        Ok(())
    }

    fn register_default_commands(&self, builder: &mut ContainerBuilder) -> Result<()> {
        for (name, class) in &self.defaults.commands {
            let id = self.ids.command(name);
            self.register_tagged_default(builder, &id, &self.ids.command_tag, class)?;
            builder.declare_type(class.as_str(), [self.defaults.command_base.as_str()]);
        }
        Ok(())
    }

    fn register_input_output(&self, builder: &mut ContainerBuilder) -> Result<()> {
        for (id, class) in [
            (&self.ids.input, &self.defaults.input_class),
            (&self.ids.output, &self.defaults.output_class),
        ] {
            set_definition_if_absent(builder, id, || Definition::new(ServiceIds::class_placeholder(id)))?;
            set_parameter_if_absent(builder, ServiceIds::class_parameter(id), class.as_str());
        }
        Ok(())
    }

    fn register_tagged_default(
        &self,
        builder: &mut ContainerBuilder,
        id: &str,
        tag: &str,
        class: &str,
    ) -> Result<()> {
        set_definition_if_absent(builder, id, || {
            Definition::new(ServiceIds::class_placeholder(id)).tag(tag)
        })?;
        set_parameter_if_absent(builder, ServiceIds::class_parameter(id), class);
        Ok(())
    }
}

impl Provider for ConsoleProvider {
    #[instrument(skip_all, fields(prefix = %self.ids.prefix), name = "console_provider")]
    fn register(&self, builder: &mut ContainerBuilder) -> Result<()> {
        self.register_application(builder)?;
        self.register_event_dispatcher(builder)?;
        self.register_compiler_passes(builder);
        self.register_helper_set(builder)?;
        self.register_default_helpers(builder)?;
        self.register_container_helper(builder)?;
        self.register_default_commands(builder)?;
        self.register_input_output(builder)?;

        debug!(
            commands = self.defaults.commands.len(),
            helpers = self.defaults.helpers.len(),
            "Console defaults registered"
        );
        Ok(())
    }
}

// ── Helpers ──

fn set_definition_if_absent(
    builder: &mut ContainerBuilder,
    id: &str,
    definition: impl FnOnce() -> Definition,
) -> Result<()> {
    if builder.has_definition(id) {
        trace!(id, "Keeping existing definition");
        return Ok(());
    }
    builder.set_definition(id, definition())
}

fn set_parameter_if_absent(builder: &mut ContainerBuilder, name: String, value: impl Into<ParameterValue>) {
    if builder.has_parameter(&name) {
        trace!(name = %name, "Keeping existing parameter");
        return;
    }
    builder.set_parameter(name, value);
}

/// Adds a call to `method` on `id` unless one is already registered.
///
/// # Errors
/// [`ContainerError::DefinitionNotFound`](crate::error::ContainerError::DefinitionNotFound)
/// if `id` is not defined.
fn add_method_call_once(
    builder: &mut ContainerBuilder,
    id: &str,
    method: &str,
    arguments: Vec<Argument>,
) -> Result<()> {
    let definition = builder.require_definition_mut(id)?;
    if definition.has_method_call(method) {
        trace!(id, method, "Keeping existing method call");
        return Ok(());
    }
    definition.add_method_call(method, arguments);
    Ok(())
}
