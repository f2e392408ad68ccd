//! Service identifiers used by the console wiring.

/// Default identifier prefix.
pub const DEFAULT_PREFIX: &str = "box.console";

/// Every identifier the console wiring reads or writes.
///
/// All identifiers derive from one prefix; the prefix alone names the
/// application service.
///
/// # Examples
/// ```
/// use sanduq_container::ids::ServiceIds;
///
/// let ids = ServiceIds::default();
/// assert_eq!(ids.application, "box.console");
/// assert_eq!(ids.helper_set, "box.console.helper_set");
/// assert_eq!(ids.parameter("name"), "box.console.name");
/// assert_eq!(ServiceIds::class_parameter(&ids.input), "box.console.input.class");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIds {
    pub prefix: String,
    pub application: String,
    pub helper_set: String,
    pub input: String,
    pub output: String,
    pub event_dispatcher: String,
    pub container_helper: String,
    pub command_tag: String,
    pub helper_tag: String,
    pub listener_tag: String,
    pub subscriber_tag: String,
}

impl ServiceIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let id = |suffix: &str| format!("{prefix}.{suffix}");

        Self {
            application: prefix.clone(),
            helper_set: id("helper_set"),
            input: id("input"),
            output: id("output"),
            event_dispatcher: id("event_dispatcher"),
            container_helper: id("helper.container"),
            command_tag: id("command"),
            helper_tag: id("helper"),
            listener_tag: id("event.listener"),
            subscriber_tag: id("event.subscriber"),
            prefix,
        }
    }

    /// A prefixed parameter name.
    pub fn parameter(&self, name: &str) -> String {
        format!("{}.{name}", self.prefix)
    }

    /// Identifier of a default command.
    pub fn command(&self, name: &str) -> String {
        format!("{}.{name}", self.command_tag)
    }

    /// Identifier of a default helper.
    pub fn helper(&self, name: &str) -> String {
        format!("{}.{name}", self.helper_tag)
    }

    /// Name of the parameter holding the class of service `id`.
    pub fn class_parameter(id: &str) -> String {
        format!("{id}.class")
    }

    /// `%...%` placeholder for the class of service `id`.
    pub fn class_placeholder(id: &str) -> String {
        format!("%{id}.class%")
    }
}

impl Default for ServiceIds {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_follow_prefix() {
        let ids = ServiceIds::new("acme");
        assert_eq!(ids.application, "acme");
        assert_eq!(ids.event_dispatcher, "acme.event_dispatcher");
        assert_eq!(ids.container_helper, "acme.helper.container");
        assert_eq!(ids.listener_tag, "acme.event.listener");
        assert_eq!(ids.subscriber_tag, "acme.event.subscriber");
        assert_eq!(ids.command("help"), "acme.command.help");
        assert_eq!(ids.helper("question"), "acme.helper.question");
    }

    #[test]
    fn class_placeholders() {
        assert_eq!(ServiceIds::class_placeholder("acme"), "%acme.class%");
        assert_eq!(ServiceIds::class_parameter("acme.command.list"), "acme.command.list.class");
    }
}
