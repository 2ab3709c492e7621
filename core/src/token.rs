//! Placeholder token helpers.
//!
//! A placeholder is a path or value token wrapped in angle brackets, such as
//! `<ifname>` or the alternation `<allow|deny>`. Anything else is a literal
//! keyword or literal value.

/// Returns `true` if `token` is an angle-bracket placeholder.
///
/// # Examples
///
/// ```
/// use cmdtree_core::is_placeholder;
///
/// assert!(is_placeholder("<ifname>"));
/// assert!(is_placeholder("<allow|deny>"));
/// assert!(!is_placeholder("ethernet"));
/// assert!(!is_placeholder("<"));
/// ```
pub fn is_placeholder(token: &str) -> bool {
    token.len() >= 2 && token.starts_with('<') && token.ends_with('>')
}

/// Returns the text between the angle brackets of a placeholder.
pub fn placeholder_inner(token: &str) -> Option<&str> {
    if is_placeholder(token) {
        Some(&token[1..token.len() - 1])
    } else {
        None
    }
}

/// Splits an alternation placeholder into its alternatives.
///
/// Returns `None` for literals and for placeholders without a `|`.
///
/// # Examples
///
/// ```
/// use cmdtree_core::alternatives;
///
/// assert_eq!(alternatives("<tcp|udp|all>"), Some(vec!["tcp", "udp", "all"]));
/// assert_eq!(alternatives("<port>"), None);
/// assert_eq!(alternatives("enable"), None);
/// ```
pub fn alternatives(token: &str) -> Option<Vec<&str>> {
    let inner = placeholder_inner(token)?;
    if inner.contains('|') {
        Some(inner.split('|').collect())
    } else {
        None
    }
}

/// Rewrites hyphens to underscores inside a placeholder.
///
/// Literal keywords are returned unchanged.
///
/// # Examples
///
/// ```
/// use cmdtree_core::normalize_placeholder;
///
/// assert_eq!(normalize_placeholder("<if-name>"), "<if_name>");
/// assert_eq!(normalize_placeholder("pseudo-ethernet"), "pseudo-ethernet");
/// ```
pub fn normalize_placeholder(token: &str) -> String {
    if is_placeholder(token) {
        token.replace('-', "_")
    } else {
        token.to_string()
    }
}
