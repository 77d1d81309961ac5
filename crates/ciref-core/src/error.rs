//! Reference resolution errors.

use thiserror::Error;

use crate::TargetPath;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReferenceError {
    #[error("{tag} {raw} is not valid")]
    InvalidMarker { tag: &'static str, raw: String },

    #[error("{tag} {path} could not be found")]
    MissingReference { tag: &'static str, path: TargetPath },

    #[error("{tag} {path} is part of a circular chain")]
    CircularReference {
        tag: &'static str,
        path: TargetPath,
        /// Targets that were in progress when `path` was re-entered, starting with `path`.
        chain: Vec<TargetPath>,
    },

    #[error("{tag} {path} exceeds the maximum reference nesting depth of {limit}")]
    NestingTooDeep {
        tag: &'static str,
        path: TargetPath,
        limit: usize,
    },

    #[error("unresolved reference marker {path} in resolved document")]
    UnresolvedMarker { path: TargetPath },
}

/// Discriminant of a [`ReferenceError`], for callers that only need to classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidMarker,
    MissingReference,
    CircularReference,
    NestingTooDeep,
    UnresolvedMarker,
}

impl ReferenceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidMarker { .. } => ErrorKind::InvalidMarker,
            Self::MissingReference { .. } => ErrorKind::MissingReference,
            Self::CircularReference { .. } => ErrorKind::CircularReference,
            Self::NestingTooDeep { .. } => ErrorKind::NestingTooDeep,
            Self::UnresolvedMarker { .. } => ErrorKind::UnresolvedMarker,
        }
    }

    /// The target path that triggered the error. Invalid markers never got one.
    pub fn path(&self) -> Option<&TargetPath> {
        match self {
            Self::InvalidMarker { .. } => None,
            Self::MissingReference { path, .. }
            | Self::CircularReference { path, .. }
            | Self::NestingTooDeep { path, .. }
            | Self::UnresolvedMarker { path } => Some(path),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReferenceError>;
