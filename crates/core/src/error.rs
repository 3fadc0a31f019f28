use crate::ast::ValueKind;

/// Failure of the structural parser.
///
/// `line` is zero-based so it can be handed straight to the editor
/// protocol; the rendered message is one-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A `}` line was found while no section was open.
    #[error("line {}: closing brace has no matching open section", .line + 1)]
    MalformedSectionNesting { line: u32 },
}

impl ParseError {
    pub fn line(&self) -> u32 {
        match self {
            ParseError::MalformedSectionNesting { line } => *line,
        }
    }
}

/// Failure while coercing a parsed tree into typed configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// The key is not declared by the schema for its section.
    #[error("unknown variable {section} > {key}; available keys are [{}]", .available.join(", "))]
    UnknownVariable {
        section: String,
        key: String,
        available: Vec<String>,
    },

    /// The value does not fit the type the schema declares.
    #[error("mismatched variable {section} > {key}: expected {expected}, found {found}")]
    TypeMismatch {
        section: String,
        key: String,
        expected: ValueKind,
        found: ValueKind,
    },

    /// The value references a `$variable`; substitution is not performed.
    #[error("variable {section} > {key} references a custom variable ({raw}) that cannot be resolved")]
    UnresolvedCustomVariable {
        section: String,
        key: String,
        raw: String,
    },
}
