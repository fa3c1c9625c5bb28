/*!
Error types returned by this crate.

Construction errors ([`BuildError`]) and matching errors ([`MatchError`]) are
kept separate, following §7 of the design: malformed configuration is
rejected eagerly at construction time, while everything that can only be
discovered once a pattern tree is actually walked against data (contract
violations, wrapped callback failures) surfaces through `MatchError`.
*/

use core::fmt;

/// An error constructing a pattern, a quantifier, a position expression, or
/// a repeat spec.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BuildError(Box<BuildErrorKind>);

impl BuildError {
    pub(crate) fn new(kind: BuildErrorKind) -> BuildError {
        BuildError(Box::new(kind))
    }

    /// Returns the underlying kind of this error.
    pub fn kind(&self) -> &BuildErrorKind {
        &self.0
    }

    pub(crate) fn syntax(expr: impl Into<String>, msg: impl Into<String>) -> BuildError {
        BuildError::new(BuildErrorKind::Syntax { expr: expr.into(), msg: msg.into() })
    }

    pub(crate) fn validation(msg: impl Into<String>) -> BuildError {
        BuildError::new(BuildErrorKind::Validation { msg: msg.into() })
    }

    pub(crate) fn duplicate_name(name: impl Into<String>) -> BuildError {
        BuildError::new(BuildErrorKind::DuplicateName { name: name.into() })
    }

    pub(crate) fn empty_children(kind: &'static str) -> BuildError {
        BuildError::new(BuildErrorKind::EmptyChildren { grouper: kind })
    }
}

/// The underlying kind of a [`BuildError`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BuildErrorKind {
    /// A position or interval expression could not be parsed.
    Syntax {
        /// The offending expression.
        expr: String,
        /// A human-readable description of what went wrong.
        msg: String,
    },
    /// A value was syntactically fine but semantically invalid (e.g. a
    /// negative repeat count, or `max < min`).
    Validation {
        /// A human-readable description of what went wrong.
        msg: String,
    },
    /// Two unrelated pattern nodes were registered under the same capture
    /// name.
    DuplicateName {
        /// The name that was registered twice.
        name: String,
    },
    /// A grouper was constructed with no children.
    EmptyChildren {
        /// The grouper kind (`"alternation"`, `"conjunction"`, …).
        grouper: &'static str,
    },
}

impl std::error::Error for BuildError {}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            BuildErrorKind::Syntax { expr, msg } => {
                write!(f, "invalid expression {:?}: {}", expr, msg)
            }
            BuildErrorKind::Validation { msg } => write!(f, "{}", msg),
            BuildErrorKind::DuplicateName { name } => {
                write!(f, "capture name {:?} is already used by an unrelated pattern", name)
            }
            BuildErrorKind::EmptyChildren { grouper } => {
                write!(f, "{} must have at least one child pattern", grouper)
            }
        }
    }
}

/// An error that occurs while a pattern tree is being matched against data.
///
/// This includes contract violations from misbehaving nodes (always a bug
/// in this crate or in a hand-written [`crate::atom::Callback`]) and
/// propagated failures from user-supplied callbacks.
#[derive(Debug)]
pub struct MatchError(Box<MatchErrorKind>);

impl MatchError {
    pub(crate) fn new(kind: MatchErrorKind) -> MatchError {
        MatchError(Box::new(kind))
    }

    /// Returns a reference to the underlying error kind.
    pub fn kind(&self) -> &MatchErrorKind {
        &self.0
    }

    pub(crate) fn contract_violation(path: Vec<String>, detail: impl Into<String>) -> MatchError {
        MatchError::new(MatchErrorKind::ContractViolation { path, detail: detail.into() })
    }

    pub(crate) fn callback(path: Vec<String>, detail: impl Into<String>) -> MatchError {
        MatchError::new(MatchErrorKind::Callback { path, detail: detail.into() })
    }
}

/// The underlying kind of a [`MatchError`].
#[non_exhaustive]
#[derive(Debug)]
pub enum MatchErrorKind {
    /// A node's `apply` returned a value outside `[-length, length]`, or a
    /// zero-width assertion consumed a nonzero number of elements.
    ContractViolation {
        /// The path from the root to the offending node, e.g.
        /// `["alternation [outer]", "2nd child [inner]"]`.
        path: Vec<String>,
        /// A human-readable description of the violation.
        detail: String,
    },
    /// A user-supplied callback returned an error or panicked.
    Callback {
        /// The path from the root to the node whose callback failed.
        path: Vec<String>,
        /// A human-readable description of the failure.
        detail: String,
    },
}

impl std::error::Error for MatchError {}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            MatchErrorKind::ContractViolation { path, detail } => {
                write!(f, "{}: {}", path.join(", "), detail)
            }
            MatchErrorKind::Callback { path, detail } => {
                write!(f, "callback in {} failed: {}", path.join(", "), detail)
            }
        }
    }
}
