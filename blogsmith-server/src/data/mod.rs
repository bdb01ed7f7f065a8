pub mod blog_repository;
#[cfg(test)]
pub mod memory;
pub mod template_repository;

/// ILIKE pattern matching `needle` anywhere, with LIKE metacharacters escaped.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
