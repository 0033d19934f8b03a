//! Diagnostics reported by a layout pass.
//!
//! Diagnostics are data handed back to the host. Only a [`Severity::Fatal`]
//! diagnostic stops a pass; everything else is reported and the pass goes on.

use std::fmt;

use crate::types::BoxId;

/// How bad a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// Reported, nothing skipped besides what the message says
    Info,
    /// The offending constraint was skipped
    Recoverable,
    /// The pass was aborted
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Recoverable => "recoverable",
            Severity::Fatal => "fatal",
        })
    }
}

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticKind {
    /// A direct child without any constraint; excluded from the pass
    Unconstrained,
    /// Two constraints for the same attribute of one box
    DuplicateAttribute,
    /// An inequality on an attribute that only accepts `==`
    IllegalRelation,
    /// The secondary attribute cannot be related to the primary one
    InvalidPairing,
    /// The resolved width or height came out negative
    NegativeExtent,
    /// A position constrained to a bare constant (absent secondary or zero multiplier)
    LocationEqualsConstant,
    /// The axis was already fully determined for this box
    OverConstrained,
    /// A deferred constraint whose dependency never resolved
    UnresolvedDependency,
    /// The constraint names a box that is neither a direct child nor the container
    ForeignBox,
}

impl DiagnosticKind {
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::Unconstrained => Severity::Info,
            DiagnosticKind::DuplicateAttribute => Severity::Fatal,
            DiagnosticKind::IllegalRelation
            | DiagnosticKind::InvalidPairing
            | DiagnosticKind::NegativeExtent
            | DiagnosticKind::LocationEqualsConstant
            | DiagnosticKind::OverConstrained
            | DiagnosticKind::UnresolvedDependency
            | DiagnosticKind::ForeignBox => Severity::Recoverable,
        }
    }
}

/// A single report from a layout pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// The box the diagnostic is about
    pub subject: BoxId,
    /// Rendered offending constraint, when there is one
    pub constraint: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, subject: BoxId, message: impl Into<String>) -> Self {
        Self {
            kind,
            subject,
            constraint: None,
            message: message.into(),
        }
    }

    /// Attach the rendered constraint this diagnostic is about.
    pub fn with_constraint(mut self, rendered: impl Into<String>) -> Self {
        self.constraint = Some(rendered.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.constraint {
            Some(constraint) => write!(
                f,
                "[{}] cannot satisfy {}: {}",
                self.severity(),
                constraint,
                self.message
            ),
            None => write!(f, "[{}] {}: {}", self.severity(), self.subject, self.message),
        }
    }
}
