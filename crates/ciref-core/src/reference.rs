//! The `!reference` marker.
//!
//! A marker is what the parser leaves behind wherever a document says
//! `!reference [section, key]`. It only carries the target path; the resolver
//! decides what the path points at.

use serde_json::Value as RawValue;
use std::fmt;

use crate::{ReferenceError, Result, TargetPath};

/// "Substitute the value found at this path."
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    path: TargetPath,
}

impl Reference {
    /// Literal used to recognize the marker in source documents.
    pub const TAG: &'static str = "!reference";

    pub fn tag_name() -> &'static str {
        Self::TAG
    }

    /// Build a marker from the raw tag argument handed over by the parser.
    ///
    /// The argument must be a non-empty sequence of strings. Anything else,
    /// including a missing argument, is rejected before resolution starts.
    pub fn from_raw(raw: Option<&RawValue>) -> Result<Self> {
        let segments = match raw {
            Some(RawValue::Array(items)) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>(),
            _ => None,
        };

        segments
            .and_then(TargetPath::new)
            .map(Self::new)
            .ok_or_else(|| invalid(raw))
    }

    pub fn new(path: TargetPath) -> Self {
        Self { path }
    }

    pub fn target_path(&self) -> &TargetPath {
        &self.path
    }
}

fn invalid(raw: Option<&RawValue>) -> ReferenceError {
    let raw = raw.map_or_else(|| "null".to_string(), RawValue::to_string);
    ReferenceError::InvalidMarker {
        tag: Reference::TAG,
        raw,
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", Self::TAG, self.path)
    }
}
