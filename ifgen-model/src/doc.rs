//! Documentation metadata shared by every named entity.

/// An issue note attached to an entity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Issue {
    /// Who raised the issue.
    pub creator: String,
    /// Issue text.
    pub value: String,
}

impl Issue {
    /// Creates a new issue note.
    #[must_use]
    pub fn new(creator: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            creator: creator.into(),
            value: value.into(),
        }
    }
}

/// Name plus documentation lines of an entity.
///
/// Lines keep document order. Empty strings are content, not absence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Metadata {
    /// Entity name.
    pub name: String,
    /// Description lines.
    pub description: Vec<String>,
    /// Design description lines.
    pub design_description: Vec<String>,
    /// Issue notes.
    pub issues: Vec<Issue>,
    /// Todo notes.
    pub todos: Vec<String>,
}

impl Metadata {
    /// Creates metadata with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a description line.
    #[must_use]
    pub fn with_description(mut self, line: impl Into<String>) -> Self {
        self.description.push(line.into());
        self
    }

    /// Adds a design description line.
    #[must_use]
    pub fn with_design_description(mut self, line: impl Into<String>) -> Self {
        self.design_description.push(line.into());
        self
    }

    /// Adds an issue note.
    #[must_use]
    pub fn with_issue(mut self, issue: Issue) -> Self {
        self.issues.push(issue);
        self
    }

    /// Adds a todo note.
    #[must_use]
    pub fn with_todo(mut self, line: impl Into<String>) -> Self {
        self.todos.push(line.into());
        self
    }

    /// Returns true if no documentation lines are attached.
    #[must_use]
    pub fn is_undocumented(&self) -> bool {
        self.description.is_empty()
            && self.design_description.is_empty()
            && self.issues.is_empty()
            && self.todos.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_keeps_order_and_empty_lines() {
        let meta = Metadata::new("param2")
            .with_description("Param2 description")
            .with_description("")
            .with_todo("Param2 todo");

        assert_eq!(meta.name, "param2");
        assert_eq!(meta.description, vec!["Param2 description", ""]);
        assert_eq!(meta.todos, vec!["Param2 todo"]);
        assert!(meta.design_description.is_empty());
        assert!(!meta.is_undocumented());
    }

    #[test]
    fn test_empty_issue_is_content() {
        let meta = Metadata::new("param1").with_issue(Issue::new("", ""));
        assert_eq!(meta.issues, vec![Issue::default()]);
        assert!(!meta.is_undocumented());
        assert!(Metadata::new("x").is_undocumented());
    }
}
