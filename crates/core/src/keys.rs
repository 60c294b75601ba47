/// Converts a camelCase plist key into snake_case, e.g. `findHighlightForeground`
/// becomes `find_highlight_foreground`.
///
/// Every uppercase letter becomes `_` plus its lowercase form, so a leading capital
/// yields a leading underscore. A lowercase first letter never does:
/// `findHighlightForeground` has no `_` prefix.
pub fn format_key(identifier: &str) -> String {
    let mut formatted = String::with_capacity(identifier.len() + 4);
    for ch in identifier.chars() {
        if ch.is_uppercase() {
            formatted.push('_');
            formatted.extend(ch.to_lowercase());
        } else {
            formatted.push(ch);
        }
    }
    formatted
}
