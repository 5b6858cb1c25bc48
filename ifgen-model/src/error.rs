//! Error types for model construction.

use thiserror::Error;

/// Error type for building interface model entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// An entity was given an empty name.
    #[error("{kind} name must not be empty")]
    EmptyName {
        /// Kind of entity (enum, struct, param, ...).
        kind: &'static str,
    },

    /// A name is already present in the enclosing mapping.
    #[error("duplicate {kind} '{name}' in {scope}")]
    DuplicateName {
        /// Kind of entity.
        kind: &'static str,
        /// Duplicate name.
        name: String,
        /// Enclosing entity description.
        scope: String,
    },

    /// Two functions share the same (function id, message type) pair.
    #[error("duplicate function key ({function_id}, {message_type})")]
    DuplicateFunctionKey {
        /// Function id element name.
        function_id: String,
        /// Message type element name.
        message_type: String,
    },

    /// An element name is not part of the referenced enum.
    #[error("enum '{enum_name}' has no element '{element}'")]
    UnknownElement {
        /// Enum name.
        enum_name: String,
        /// Missing element name.
        element: String,
    },

    /// A type constraint is inconsistent.
    #[error("constraint violation: {message}")]
    Constraint {
        /// Error message.
        message: String,
    },
}

impl ModelError {
    /// Creates a duplicate name error.
    pub fn duplicate(kind: &'static str, name: impl Into<String>, scope: impl Into<String>) -> Self {
        Self::DuplicateName {
            kind,
            name: name.into(),
            scope: scope.into(),
        }
    }

    /// Creates a constraint error with the given message.
    pub fn constraint(message: impl Into<String>) -> Self {
        Self::Constraint {
            message: message.into(),
        }
    }
}

/// Result alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
