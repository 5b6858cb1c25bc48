//! Attribute cursor.
//!
//! Attributes are taken out of the cursor as the resolver consumes them.
//! Whatever is left when an element is done was not understood.

use crate::error::ParseError;
use crate::xml::XmlElement;

/// Attributes of one element that have not been consumed yet.
#[derive(Debug)]
pub struct Attributes {
    context: String,
    remaining: Vec<(String, String)>,
}

impl Attributes {
    /// Captures the attributes of `element`; `context` names the entity in errors.
    #[must_use]
    pub fn new(element: &XmlElement, context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            remaining: element.attributes.clone(),
        }
    }

    /// Entity name used in errors.
    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Replaces the entity name used in errors, typically once the `name`
    /// attribute is known.
    pub fn set_context(&mut self, context: impl Into<String>) {
        self.context = context.into();
    }

    /// Removes and returns an attribute.
    pub fn take(&mut self, name: &str) -> Option<String> {
        let idx = self.remaining.iter().position(|(key, _)| key == name)?;
        Some(self.remaining.remove(idx).1)
    }

    /// Removes and returns an attribute that must be present.
    ///
    /// # Errors
    /// Returns `ParseError::MissingAttribute` if it is absent.
    pub fn require(&mut self, name: &str) -> Result<String, ParseError> {
        self.take(name)
            .ok_or_else(|| ParseError::missing_attr(&self.context, name))
    }

    /// Removes a `true`/`false` attribute.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidAttribute` for any other literal.
    pub fn take_bool(&mut self, name: &str) -> Result<Option<bool>, ParseError> {
        self.take_parsed(name, |value| match value {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        })
    }

    /// Removes an integer attribute.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidAttribute` if it is not an integer.
    pub fn take_i64(&mut self, name: &str) -> Result<Option<i64>, ParseError> {
        self.take_parsed(name, |value| value.trim().parse().ok())
    }

    /// Removes a finite floating point attribute.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidAttribute` if it is not a finite number.
    pub fn take_f64(&mut self, name: &str) -> Result<Option<f64>, ParseError> {
        self.take_parsed(name, |value| {
            value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
        })
    }

    fn take_parsed<T>(
        &mut self,
        name: &str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<Option<T>, ParseError> {
        match self.take(name) {
            Some(value) => parse(&value)
                .map(Some)
                .ok_or_else(|| ParseError::invalid_attr(&self.context, name, value)),
            None => Ok(None),
        }
    }

    /// Checks that every attribute was consumed.
    ///
    /// # Errors
    /// In strict mode, returns `ParseError::UnexpectedAttribute` for the
    /// first leftover attribute. Otherwise leftovers are logged and dropped.
    pub fn finish(self, strict: bool) -> Result<(), ParseError> {
        let Some((first, _)) = self.remaining.first() else {
            return Ok(());
        };
        if strict {
            return Err(ParseError::UnexpectedAttribute {
                context: self.context.clone(),
                attribute: first.clone(),
            });
        }
        for (attribute, value) in &self.remaining {
            tracing::warn!(
                context = %self.context,
                %attribute,
                %value,
                "ignoring unexpected attribute"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn element(attributes: &[(&str, &str)]) -> XmlElement {
        XmlElement {
            name: "param".to_string(),
            attributes: attributes
                .iter()
                .map(|&(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..XmlElement::default()
        }
    }

    #[test]
    fn test_take_consumes() {
        let el = element(&[("name", "p"), ("platform", "")]);
        let mut attrs = Attributes::new(&el, "param");
        assert_eq!(attrs.require("name").unwrap(), "p");
        assert_eq!(attrs.take("platform"), Some(String::new()));
        assert_eq!(attrs.take("platform"), None);
        attrs.finish(true).unwrap();
    }

    #[test]
    fn test_missing_required() {
        let el = element(&[]);
        let mut attrs = Attributes::new(&el, "enum");
        let err = attrs.require("name").unwrap_err();
        assert_eq!(err.to_string(), "missing required attribute 'name' on enum");
    }

    #[test]
    fn test_typed_values() {
        let el = element(&[
            ("mandatory", "false"),
            ("array", "yes"),
            ("minvalue", " -5 "),
            ("maxvalue", "20.5"),
            ("minsize", "1.5"),
            ("max", "inf"),
        ]);
        let mut attrs = Attributes::new(&el, "param 'p'");
        assert_eq!(attrs.take_bool("mandatory").unwrap(), Some(false));
        assert_eq!(attrs.take_bool("missing").unwrap(), None);
        assert_eq!(
            attrs.take_bool("array").unwrap_err().kind(),
            ErrorKind::InvalidStructure
        );
        assert_eq!(attrs.take_i64("minvalue").unwrap(), Some(-5));
        assert_eq!(attrs.take_f64("maxvalue").unwrap(), Some(20.5));
        assert!(attrs.take_i64("minsize").is_err());
        assert!(attrs.take_f64("max").is_err());
    }

    #[test]
    fn test_finish_strict_and_lenient() {
        let el = element(&[("name", "p"), ("colour", "blue")]);

        let mut strict = Attributes::new(&el, "param");
        strict.take("name");
        strict.set_context("struct 's' param 'p'");
        let err = strict.finish(true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unexpected attribute 'colour' on struct 's' param 'p'"
        );

        let mut lenient = Attributes::new(&el, "param");
        lenient.take("name");
        lenient.finish(false).unwrap();
    }
}
