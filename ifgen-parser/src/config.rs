//! Parser configuration.

/// Default name of the enum whose elements identify functions.
pub const DEFAULT_FUNCTION_ID_ENUM: &str = "FunctionID";

/// Default name of the enum whose elements give a function's message type.
pub const DEFAULT_MESSAGE_TYPE_ENUM: &str = "messageType";

/// Settings for [`Parser`](crate::Parser).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    strict: bool,
    function_id_enum: String,
    message_type_enum: String,
    lint: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strict: true,
            function_id_enum: DEFAULT_FUNCTION_ID_ENUM.to_string(),
            message_type_enum: DEFAULT_MESSAGE_TYPE_ENUM.to_string(),
            lint: true,
        }
    }

    /// Sets whether unknown attributes and elements are errors.
    ///
    /// When disabled they are skipped with a warning.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets the name of the function id enum.
    #[must_use]
    pub fn function_id_enum(mut self, name: impl Into<String>) -> Self {
        self.function_id_enum = name.into();
        self
    }

    /// Sets the name of the message type enum.
    #[must_use]
    pub fn message_type_enum(mut self, name: impl Into<String>) -> Self {
        self.message_type_enum = name.into();
        self
    }

    /// Sets whether advisory checks run after a successful parse.
    #[must_use]
    pub fn lint(mut self, lint: bool) -> Self {
        self.lint = lint;
        self
    }

    /// Returns true if unknown attributes and elements are errors.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict
    }

    /// Name of the function id enum.
    #[must_use]
    pub fn function_id_enum_name(&self) -> &str {
        &self.function_id_enum
    }

    /// Name of the message type enum.
    #[must_use]
    pub fn message_type_enum_name(&self) -> &str {
        &self.message_type_enum
    }

    /// Returns true if advisory checks are enabled.
    #[must_use]
    pub const fn lint_enabled(&self) -> bool {
        self.lint
    }
}
