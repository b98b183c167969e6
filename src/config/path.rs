//! Dotted key paths.
//!
//! A key such as `"database.pool.size"` addresses a value three mappings deep.
//! Segments are not validated: `"a..b"` has an empty middle segment, which is
//! just another key.

/// The separator between path segments.
pub const SEPARATOR: char = '.';

/// Splits a dotted path into its segments.
///
/// A path without a separator is a single segment. The empty path yields a
/// single empty segment.
pub fn split(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).collect()
}

/// Joins segments back into a dotted path.
pub fn join<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut path = String::new();
    for (i, segment) in segments.into_iter().enumerate() {
        if i > 0 {
            path.push(SEPARATOR);
        }
        path.push_str(segment.as_ref());
    }
    path
}

/// Returns true if the path addresses a nested value.
pub fn is_nested(path: &str) -> bool {
    path.contains(SEPARATOR)
}
