//! Word normalization applied to both indexed words and query words.

/// Lowercase `raw` and keep only its alphanumeric characters.
///
/// An empty result means the word carries no searchable content and should be
/// discarded.
///
/// ```
/// use lexindex::analysis::normalize;
///
/// assert_eq!(normalize("Hello,"), "hello");
/// assert_eq!(normalize("--"), "");
/// ```
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Cat"), "cat");
        assert_eq!(normalize("don't"), "dont");
        assert_eq!(normalize("R2-D2!"), "r2d2");
        assert_eq!(normalize("Ärger"), "ärger");
        assert_eq!(normalize("..."), "");
        assert_eq!(normalize(""), "");
    }
}
