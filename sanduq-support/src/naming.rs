//! Identifier naming helpers.

/// Converts a dotted, dashed or snake-cased name to camel case.
///
/// Used to derive default listener method names from event names.
///
/// ```
/// use sanduq_support::naming::camelize;
///
/// assert_eq!(camelize("console.command"), "ConsoleCommand");
/// assert_eq!(camelize("console_terminate"), "ConsoleTerminate");
/// ```
pub fn camelize(name: &str) -> String {
    name.split(['.', '_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Builds the default listener method for an event: `on` + camel case.
///
/// ```
/// use sanduq_support::naming::listener_method;
///
/// assert_eq!(listener_method("console.error"), "onConsoleError");
/// ```
pub fn listener_method(event: &str) -> String {
    format!("on{}", camelize(event))
}
