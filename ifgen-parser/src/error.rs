//! Error types for interface parsing.

use ifgen_model::ModelError;
use thiserror::Error;

/// Category of a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input is not well-formed XML.
    MalformedDocument,
    /// Well-formed XML that does not follow the interface document shape.
    InvalidStructure,
    /// A name is declared twice in the same mapping.
    DuplicateName,
    /// Two functions share a (function id, message type) pair.
    DuplicateFunctionKey,
    /// A type, enum element or function key does not resolve.
    UnknownTypeReference,
    /// Inconsistent type constraints.
    Constraint,
    /// A default value does not fit its declared type.
    InvalidDefaultValue,
    /// Reading the document failed.
    Io,
}

/// Error type for interface parsing operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Invalid character or entity reference.
    #[error("XML escape error: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document shape the XML reader accepts but that is not a single tree.
    #[error("malformed document: {message}")]
    Malformed {
        /// Error message.
        message: String,
    },

    /// Model construction error.
    #[error("{context}: {source}")]
    Model {
        /// Entity being built.
        context: String,
        /// Underlying model error.
        source: ModelError,
    },

    /// Missing required attribute.
    #[error("missing required attribute '{attribute}' on {context}")]
    MissingAttribute {
        /// Entity being parsed.
        context: String,
        /// Attribute name.
        attribute: String,
    },

    /// Invalid attribute value.
    #[error("invalid value '{value}' for attribute '{attribute}' on {context}")]
    InvalidAttribute {
        /// Entity being parsed.
        context: String,
        /// Attribute name.
        attribute: String,
        /// Invalid value.
        value: String,
    },

    /// Attribute not allowed here.
    #[error("unexpected attribute '{attribute}' on {context}")]
    UnexpectedAttribute {
        /// Entity being parsed.
        context: String,
        /// Attribute name.
        attribute: String,
    },

    /// Child element not allowed here.
    #[error("unexpected element <{element}> in {context}")]
    UnexpectedElement {
        /// Element name.
        element: String,
        /// Entity being parsed.
        context: String,
    },

    /// Invalid document structure.
    #[error("invalid document structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },

    /// Unknown type reference.
    #[error("unknown type '{type_name}' referenced in {context}")]
    UnknownType {
        /// Type name.
        type_name: String,
        /// Entity being parsed.
        context: String,
    },

    /// Unknown enum element reference.
    #[error("enum '{enum_name}' has no element '{element}' (referenced in {context})")]
    UnknownElement {
        /// Enum name.
        enum_name: String,
        /// Element name.
        element: String,
        /// Entity being parsed.
        context: String,
    },

    /// Default value does not fit the declared type.
    #[error("invalid default value '{value}' for {type_name} in {context}: {reason}")]
    InvalidDefault {
        /// Literal text.
        value: String,
        /// Declared type keyword.
        type_name: String,
        /// Entity being parsed.
        context: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ParseError {
    /// Returns the failure category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Xml(_) | Self::Escape(_) | Self::Utf8(_) | Self::Malformed { .. } => {
                ErrorKind::MalformedDocument
            }
            Self::Io(_) => ErrorKind::Io,
            Self::Model { source, .. } => match source {
                ModelError::EmptyName { .. } => ErrorKind::InvalidStructure,
                ModelError::DuplicateName { .. } => ErrorKind::DuplicateName,
                ModelError::DuplicateFunctionKey { .. } => ErrorKind::DuplicateFunctionKey,
                ModelError::UnknownElement { .. } => ErrorKind::UnknownTypeReference,
                ModelError::Constraint { .. } => ErrorKind::Constraint,
            },
            Self::MissingAttribute { .. }
            | Self::InvalidAttribute { .. }
            | Self::UnexpectedAttribute { .. }
            | Self::UnexpectedElement { .. }
            | Self::InvalidStructure { .. } => ErrorKind::InvalidStructure,
            Self::UnknownType { .. } | Self::UnknownElement { .. } => {
                ErrorKind::UnknownTypeReference
            }
            Self::InvalidDefault { .. } => ErrorKind::InvalidDefaultValue,
        }
    }

    /// Wraps a model error with the entity being built.
    pub fn model(context: impl Into<String>, source: ModelError) -> Self {
        Self::Model {
            context: context.into(),
            source,
        }
    }

    /// Creates a malformed document error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Creates a missing attribute error.
    pub fn missing_attr(context: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            context: context.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid attribute error.
    pub fn invalid_attr(
        context: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            context: context.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Creates an unexpected element error.
    pub fn unexpected_element(element: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnexpectedElement {
            element: element.into(),
            context: context.into(),
        }
    }

    /// Creates an invalid structure error.
    pub fn structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }

    /// Creates an unknown type error.
    pub fn unknown_type(type_name: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnknownType {
            type_name: type_name.into(),
            context: context.into(),
        }
    }
}
