//! Owned XML element tree.
//!
//! The resolver walks a document more than once, so the event stream from
//! `quick-xml` is folded into a small tree first. Only elements, attributes
//! and text survive; comments, processing instructions and the XML
//! declaration are dropped.

use crate::error::ParseError;
use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};

/// Deepest element nesting accepted, counting the root as depth 1.
pub const MAX_DEPTH: usize = 64;

/// An XML element with its attributes, children and text content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    /// Tag name.
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
    /// Trimmed text content (empty if none).
    pub text: String,
}

impl XmlElement {
    /// Looks up an attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over children with the given tag name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |child| child.name == name)
    }
}

/// Parses an XML document into its root element.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed, has no root element or
/// more than one, or nests elements deeper than [`MAX_DEPTH`].
pub fn parse_document(xml: &str) -> Result<XmlElement, ParseError> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                check_depth(&stack)?;
                stack.push(open_element(e)?);
            }
            Ok(Event::Empty(ref e)) => {
                check_depth(&stack)?;
                let element = open_element(e)?;
                close_element(element, &mut stack, &mut root)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ParseError::malformed("closing tag without opening tag"))?;
                close_element(element, &mut stack, &mut root)?;
            }
            Ok(Event::Text(ref t)) => {
                if let Some(current) = stack.last_mut() {
                    let raw = std::str::from_utf8(t.as_ref())?;
                    current.text.push_str(&unescape(raw)?);
                }
            }
            Ok(Event::CData(ref t)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(std::str::from_utf8(t.as_ref())?);
                }
            }
            Ok(Event::GeneralRef(ref r)) => {
                if let Some(current) = stack.last_mut() {
                    let entity = std::str::from_utf8(r)?;
                    current.text.push_str(&resolve_reference(entity)?);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::malformed(format!(
            "element <{}> is not closed",
            open.name
        )));
    }
    root.ok_or_else(|| ParseError::malformed("document has no root element"))
}

/// Fails if one more element would exceed [`MAX_DEPTH`].
fn check_depth(stack: &[XmlElement]) -> Result<(), ParseError> {
    if stack.len() >= MAX_DEPTH {
        return Err(ParseError::malformed(format!(
            "elements nested deeper than {MAX_DEPTH} levels"
        )));
    }
    Ok(())
}

/// Reads tag name and attributes of a start or empty tag.
fn open_element(e: &BytesStart<'_>) -> Result<XmlElement, ParseError> {
    let name = std::str::from_utf8(e.name().as_ref())?.to_string();
    let mut attributes = Vec::new();

    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;
        attributes.push((key.to_string(), unescape(value)?.into_owned()));
    }

    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

/// Attaches a finished element to its parent, or makes it the root.
fn close_element(
    mut element: XmlElement,
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
) -> Result<(), ParseError> {
    let trimmed = element.text.trim();
    if trimmed.len() != element.text.len() {
        element.text = trimmed.to_string();
    }

    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_some() {
        return Err(ParseError::malformed(format!(
            "second root element <{}>",
            element.name
        )));
    } else {
        *root = Some(element);
    }
    Ok(())
}

/// Resolves a predefined entity or a character reference such as `#x41`.
fn resolve_reference(entity: &str) -> Result<String, ParseError> {
    if let Some(resolved) = resolve_predefined_entity(entity) {
        return Ok(resolved.to_string());
    }
    let code = match entity.strip_prefix('#') {
        Some(hex) if hex.starts_with('x') || hex.starts_with('X') => {
            u32::from_str_radix(&hex[1..], 16).ok()
        }
        Some(dec) => dec.parse::<u32>().ok(),
        None => None,
    };
    code.and_then(char::from_u32)
        .map(String::from)
        .ok_or_else(|| ParseError::malformed(format!("unknown entity reference '&{entity};'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_tree() {
        let root = parse_document(
            r#"<?xml version="1.0"?>
<interface a="1" b="two">
    <!-- comment -->
    <enum name="e">
        <description>First line</description>
        <element name="x" value="3"/>
    </enum>
    <struct name="s"/>
</interface>"#,
        )
        .unwrap();

        assert_eq!(root.name, "interface");
        assert_eq!(root.attribute("a"), Some("1"));
        assert_eq!(root.attribute("b"), Some("two"));
        assert_eq!(root.attribute("c"), None);
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.text, "");

        let enum_el = &root.children[0];
        assert_eq!(enum_el.children_named("description").count(), 1);
        assert_eq!(enum_el.children[0].text, "First line");
        assert_eq!(enum_el.children[1].attribute("value"), Some("3"));
        assert!(root.children[1].children.is_empty());
    }

    #[test]
    fn test_empty_text_is_empty_string() {
        let root = parse_document("<r><a/><b></b><c>  </c></r>").unwrap();
        for child in &root.children {
            assert_eq!(child.text, "");
        }
    }

    #[test]
    fn test_entities() {
        let root = parse_document(r#"<r v="a &amp; b">x &lt; y &#65;&#x42;</r>"#).unwrap();
        assert_eq!(root.attribute("v"), Some("a & b"));
        assert_eq!(root.text, "x < y AB");
    }

    #[test]
    fn test_cdata() {
        let root = parse_document("<r><![CDATA[<raw>]]></r>").unwrap();
        assert_eq!(root.text, "<raw>");
    }

    #[test]
    fn test_malformed_documents() {
        for xml in ["", "<a><b></a>", "<a>", "<a/><b/>"] {
            let err = parse_document(xml).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedDocument, "input: {xml:?}");
        }
    }

    fn nested(depth: usize) -> String {
        format!("{}{}", "<x>".repeat(depth), "</x>".repeat(depth))
    }

    #[test]
    fn test_depth_limit() {
        assert!(parse_document(&nested(MAX_DEPTH)).is_ok());

        let err = parse_document(&nested(MAX_DEPTH + 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDocument);

        let deep_empty = format!("{}<x/>{}", "<x>".repeat(MAX_DEPTH), "</x>".repeat(MAX_DEPTH));
        assert!(parse_document(&deep_empty).is_err());

        let err = parse_document(&nested(20_000)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDocument);
    }

    #[test]
    fn test_resolve_reference() {
        assert_eq!(resolve_reference("quot").unwrap(), "\"");
        assert_eq!(resolve_reference("#x263A").unwrap(), "\u{263A}");
        assert!(resolve_reference("nbsp").is_err());
        assert!(resolve_reference("#xZZ").is_err());
    }
}
