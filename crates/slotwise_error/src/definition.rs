//! Errors raised while defining slot sequences and dialogs.

/// Kinds of dialog definition errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum DefinitionErrorKind {
    /// Two slots in one sequence share a field name
    #[display("Duplicate field '{}' in dialog '{}'", field, dialog)]
    DuplicateField {
        /// Dialog kind being defined
        dialog: String,
        /// Repeated field name
        field: String,
    },
    /// A sequence must contain at least one slot
    #[display("Dialog '{}' has no slots", _0)]
    EmptySequence(String),
    /// Two dialogs registered under the same kind
    #[display("Dialog '{}' is registered twice", _0)]
    DuplicateDialog(String),
}

/// Definition error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Definition Error: {} at line {} in {}", kind, line, file)]
pub struct DefinitionError {
    /// The kind of error that occurred
    pub kind: DefinitionErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl DefinitionError {
    /// Create a new definition error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DefinitionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
