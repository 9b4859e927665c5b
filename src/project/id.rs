/// Derive a project id from its display name: lowercased, trimmed, and every
/// whitespace run collapsed to a single `-`.
///
/// Distinct names can map to the same id ("Work" and "work").
pub fn project_id_from_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
