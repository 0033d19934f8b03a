//! Error types for the strut engine.

use thiserror::Error;

use crate::types::{Attribute, BoxId};

/// Errors during layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("multiple constraints for .{attribute} on {subject}; remove the one you don't want")]
    DuplicateAttribute { subject: BoxId, attribute: Attribute },

    #[error("box {0} is not part of this layout tree")]
    UnknownBox(BoxId),

    #[error("box {0} is a leaf and cannot own children or constraints")]
    NotAContainer(BoxId),
}

impl LayoutError {
    /// Whether this error aborts a layout pass, as opposed to API misuse.
    pub fn is_fatal_constraint_error(&self) -> bool {
        matches!(self, LayoutError::DuplicateAttribute { .. })
    }
}
