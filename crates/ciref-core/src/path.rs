//! Target paths addressed by reference markers.

use serde::Serialize;
use std::fmt;

/// A non-empty ordered list of mapping keys, e.g. `[".setup", "script"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TargetPath(Vec<String>);

impl TargetPath {
    /// Create a path from its segments. Returns `None` when there are none.
    pub fn new(segments: Vec<String>) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self(segments))
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a constructed path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Renders as `["a", "b"]`, the form quoted in user-facing error messages.
impl fmt::Display for TargetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let quoted = serde_json::to_string(segment).map_err(|_| fmt::Error)?;
            f.write_str(&quoted)?;
        }
        f.write_str("]")
    }
}

impl<'a> IntoIterator for &'a TargetPath {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_path_rejected() {
        assert!(TargetPath::new(Vec::new()).is_none());
    }

    #[test]
    fn test_display_quotes_segments() {
        let path = TargetPath::new(vec!["a".into(), "b".into(), "c".into()]).unwrap();
        assert_eq!(path.to_string(), r#"["a", "b", "c"]"#);
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_display_escapes_quotes() {
        let path = TargetPath::new(vec![r#"say "hi""#.into()]).unwrap();
        assert_eq!(path.to_string(), r#"["say \"hi\""]"#);
    }
}
