//! Status codes returned by context operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::command::DrawMode;

/// Failure (or signal) produced by a context operation.
///
/// Every variant except [`Error::Backend`] leaves the context unchanged:
/// capacity and protocol checks run before any vertex is written.
#[derive(Error, Debug)]
pub enum Error {
    /// A primitive or `end_command` was issued with no open command.
    #[error("no command is being recorded")]
    NoActiveCommand,

    /// `begin_command`, `set_transform` or `render` was issued while a command is open.
    #[error("previous command has not been ended")]
    PrevCommandNotEnded,

    #[error("vertex buffer exhausted: {requested} vertices requested, {available} available")]
    OutOfVertexBuffer { requested: usize, available: usize },

    #[error("command buffer exhausted (capacity {capacity})")]
    OutOfCommandBuffer { capacity: usize },

    /// The primitive's bounding volume lies outside the view frustum. Nothing was written.
    #[error("primitive culled by view frustum")]
    Culled,

    #[error("font file not found: {}", .0.display())]
    FontFileNotFound(PathBuf),

    #[error("font table full (max {max})")]
    FontLimitReached { max: usize },

    #[error("index {index} out of bounds (len {len})")]
    OutOfBoundsAccess { index: usize, len: usize },

    /// The primitive cannot be drawn in the open command's mode.
    #[error("primitive not supported in {mode:?} mode")]
    InvalidMode { mode: DrawMode },

    /// A matrix that must be invertible was singular.
    #[error("singular matrix")]
    SingularMatrix,

    #[error("font parse error: {0}")]
    FontParse(String),

    #[error("backend failure: {0:#}")]
    Backend(anyhow::Error),
}

impl Error {
    #[inline]
    pub fn is_culled(&self) -> bool {
        matches!(self, Error::Culled)
    }

    /// `true` for buffer exhaustion, which a caller may recover from by skipping work.
    #[inline]
    pub fn is_capacity(&self) -> bool {
        matches!(self, Error::OutOfVertexBuffer { .. } | Error::OutOfCommandBuffer { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_counts() {
        let err = Error::OutOfVertexBuffer { requested: 48, available: 10 };
        assert_eq!(
            err.to_string(),
            "vertex buffer exhausted: 48 vertices requested, 10 available"
        );
    }

    #[test]
    fn classification_helpers() {
        assert!(Error::Culled.is_culled());
        assert!(!Error::Culled.is_capacity());
        assert!(Error::OutOfCommandBuffer { capacity: 4 }.is_capacity());
    }
}
