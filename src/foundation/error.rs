/// Convenience result type used across lilt.
pub type LiltResult<T> = Result<T, LiltError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum LiltError {
    /// Malformed path data, clock value, or value token layout.
    #[error("parse error: {0}")]
    Parse(String),

    /// Two animation endpoints do not share a token layout.
    #[error("incompatible values: cannot interpolate between '{from}' and '{to}'")]
    IncompatibleValues {
        /// Start value as authored.
        from: String,
        /// End value as authored.
        to: String,
    },

    /// An animation declaration references an id absent from the scene.
    #[error("missing target: {0}")]
    MissingTarget(String),

    /// An animation target id resolves to more than one node.
    #[error("ambiguous target: '{id}' resolves to {count} nodes")]
    AmbiguousTarget {
        /// The duplicated identifier.
        id: String,
        /// Number of nodes carrying it.
        count: usize,
    },

    /// A cue references a node id absent from the document.
    #[error("unresolved cue reference: {0}")]
    UnresolvedCue(String),

    /// Invalid user-provided configuration or document data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LiltError {
    /// Build a [`LiltError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`LiltError::IncompatibleValues`] value.
    pub fn incompatible(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::IncompatibleValues {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Build a [`LiltError::MissingTarget`] value.
    pub fn missing_target(id: impl Into<String>) -> Self {
        Self::MissingTarget(id.into())
    }

    /// Build a [`LiltError::UnresolvedCue`] value.
    pub fn unresolved_cue(id: impl Into<String>) -> Self {
        Self::UnresolvedCue(id.into())
    }

    /// Build a [`LiltError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LiltError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

/// Category of a recovered, non-fatal problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum WarningKind {
    /// A declaration could not be parsed and was made permanently inactive.
    Parse,
    /// A declaration target was not found; the declaration is a no-op.
    MissingTarget,
    /// A cue referenced an unknown node and was ignored.
    UnresolvedCue,
    /// Waypoint windows overlapped and were shortened.
    OverlappingWaypoint,
}

/// A recovered problem, kept so hosts can report it after a render.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Warning {
    /// What went wrong.
    pub kind: WarningKind,
    /// Human-readable detail.
    pub message: String,
}

impl Warning {
    pub(crate) fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::warn!(kind = ?kind, "{message}");
        Self { kind, message }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
