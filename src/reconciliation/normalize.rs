//! Name normalization for consistent comparison

/// Canonicalize a display name into a comparison key.
///
/// Lowercases, trims surrounding whitespace, and collapses each doubled
/// space to a single space. Absent input yields the empty string. The key
/// is used purely for comparison and for displaying suggestions, never as
/// a persisted identity.
pub fn normalize_name(name: Option<&str>) -> String {
    match name {
        Some(name) => name.to_lowercase().trim().replace("  ", " "),
        None => String::new(),
    }
}
