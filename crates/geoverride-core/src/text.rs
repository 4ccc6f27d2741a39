// crates/geoverride-core/src/text.rs

/// Convert a string into a folded key suitable for comparison.
///
/// This performs:
/// 1\) Transliterate Unicode → ASCII (e.g. `Łódź` -> `Lodz`)
/// 2\) Normalize to lowercase
///
/// # Examples
///
/// ```rust
/// use geoverride_core::text::fold_key;
///
/// assert_eq!(fold_key("Łódź"), "lodz");
/// assert_eq!(fold_key("  Straße "), "strasse");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s.trim()).to_lowercase()
}

/// Equality after [`fold_key`].
pub fn equals_folded(a: &str, b: &str) -> bool {
    fold_key(a) == fold_key(b)
}

/// Substring match after [`fold_key`]. A blank needle never matches.
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    let needle = fold_key(needle);
    !needle.is_empty() && fold_key(haystack).contains(&needle)
}
