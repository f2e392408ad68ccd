//! Text rendering utilities for human-friendly error messages.
//!
//! Provides helpers to format reference chains, class names,
//! and "did you mean?" suggestions in error output.

/// Renders a reference chain as a readable string.
///
/// # Examples
/// ```
/// use sanduq_support::rendering::render_chain;
///
/// let chain = vec!["box.console", "box.console.helper_set", "box.console"];
/// let rendered = render_chain(&chain);
/// assert_eq!(rendered, "box.console → box.console.helper_set → box.console");
/// ```
pub fn render_chain(chain: &[impl AsRef<str>]) -> String {
    chain
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Renders a list of items as `[a, b, c]`.
///
/// ```
/// use sanduq_support::rendering::render_list;
///
/// assert_eq!(render_list(&["a.yml", "b.yml"]), "[a.yml, b.yml]");
///
/// let empty: [&str; 0] = [];
/// assert_eq!(render_list(&empty), "[]");
/// ```
pub fn render_list(items: &[impl AsRef<str>]) -> String {
    let joined = items
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(", ");

    format!("[{joined}]")
}

/// Shortens a fully qualified class name for display.
///
/// ```
/// use sanduq_support::rendering::shorten_type_name;
///
/// let short = shorten_type_name("console::command::ListCommand");
/// assert_eq!(short, "ListCommand");
///
/// let short = shorten_type_name("alloc::sync::Arc<dyn console::helper::Helper>");
/// assert_eq!(short, "Arc<dyn Helper>");
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    // Keep only the last segment of each path:
    // "console::command::ListCommand" → "ListCommand"
    // "Arc<dyn console::Helper>" → "Arc<dyn Helper>"

    let mut result = String::with_capacity(full_name.len());
    let mut chars = full_name.chars().peekable();
    let mut current_segment = String::new();

    while let Some(ch) = chars.next() {
        match ch {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                current_segment.clear();
            }
            '<' | '>' | ',' | ' ' => {
                result.push_str(&current_segment);
                result.push(ch);
                current_segment.clear();
            }
            _ => {
                current_segment.push(ch);
            }
        }
    }

    result.push_str(&current_segment);
    result
}

/// Generates "did you mean?" suggestions for a service identifier.
///
/// Compares the requested identifier against the available ones
/// and returns close matches, best first.
///
/// ```
/// use sanduq_support::rendering::suggest_similar;
///
/// let available = ["box.console.helper_set", "box.console.input"];
/// let suggestions = suggest_similar("box.console.helperset", &available, 3);
/// assert_eq!(suggestions[0], "box.console.helper_set");
/// ```
pub fn suggest_similar(
    requested: &str,
    available: &[impl AsRef<str>],
    max_suggestions: usize,
) -> Vec<String> {
    let requested_lower = requested.to_lowercase();
    let requested_tail = last_segment(&requested_lower);

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| !name.eq_ignore_ascii_case(requested))
        .filter_map(|name| {
            let name_lower = name.to_lowercase();
            let name_tail = last_segment(&name_lower);

            // A parent namespace is never a useful suggestion
            if is_parent(&name_lower, &requested_lower) || is_parent(&requested_lower, &name_lower) {
                return None;
            }

            // Substring match (highest priority), closer lengths rank higher
            if name_lower.contains(&requested_lower) || requested_lower.contains(&name_lower) {
                let shorter = name_lower.len().min(requested_lower.len());
                let longer = name_lower.len().max(requested_lower.len()).max(1);
                return Some((name, 1000 + shorter * 100 / longer));
            }

            if !name_tail.is_empty()
                && (name_tail.contains(requested_tail) || requested_tail.contains(name_tail))
            {
                return Some((name, 800));
            }

            let common = name_lower
                .chars()
                .zip(requested_lower.chars())
                .take_while(|(a, b)| a == b)
                .count();

            // Shared namespace alone is not a match
            let namespace = requested_lower.len() - requested_tail.len();
            if common > namespace && common - namespace >= 3 {
                return Some((name, common * 10));
            }

            None
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _)| name.to_string())
        .collect()
}

fn is_parent(parent: &str, child: &str) -> bool {
    child.strip_prefix(parent).is_some_and(|rest| rest.starts_with('.'))
}

fn last_segment(id: &str) -> &str {
    id.rsplit('.').next().unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_simple_chain() {
        let chain = vec!["a", "b", "c", "a"];
        assert_eq!(render_chain(&chain), "a → b → c → a");
    }

    #[test]
    fn render_single_element_chain() {
        let chain = vec!["a"];
        assert_eq!(render_chain(&chain), "a");
    }

    #[test]
    fn render_empty_chain() {
        let chain: Vec<&str> = vec![];
        assert_eq!(render_chain(&chain), "");
    }

    #[test]
    fn render_owned_list() {
        let items = vec![String::from("config.yml"), String::from("config.yml.dist")];
        assert_eq!(render_list(&items), "[config.yml, config.yml.dist]");
    }

    #[test]
    fn shorten_simple_path() {
        assert_eq!(shorten_type_name("console::command::HelpCommand"), "HelpCommand");
    }

    #[test]
    fn shorten_with_generics() {
        assert_eq!(
            shorten_type_name("alloc::sync::Arc<dyn app::traits::Logger>"),
            "Arc<dyn Logger>"
        );
    }

    #[test]
    fn shorten_no_path() {
        assert_eq!(shorten_type_name("String"), "String");
    }

    #[test]
    fn suggest_typo_in_last_segment() {
        let available = vec![
            "box.console",
            "box.console.helper_set",
            "box.console.input",
            "box.console.output",
        ];

        let suggestions = suggest_similar("box.console.helper_sett", &available, 3);
        assert!(!suggestions.is_empty());
        assert_eq!(suggestions[0], "box.console.helper_set");
    }

    #[test]
    fn suggest_skips_parent_namespace() {
        let available = vec!["box.console", "box.console.helper_set"];
        let suggestions = suggest_similar("box.console.helperset", &available, 3);
        assert_eq!(suggestions, vec!["box.console.helper_set"]);
    }

    #[test]
    fn suggest_never_returns_requested_itself() {
        let available = vec!["box.console.input"];
        let suggestions = suggest_similar("box.console.input", &available, 3);
        assert!(suggestions.is_empty());
    }

    #[test]
    fn suggest_no_match() {
        let available = vec!["box.console.input"];
        let suggestions = suggest_similar("xyz_abc_def", &available, 3);
        assert!(suggestions.is_empty());
    }
}
