//! Interface document parser.
//!
//! Turns an `<interface>` document into an [`Interface`]. Parsing runs in
//! two passes over the element tree: the first declares every enum and
//! struct by name, the second fills in enum elements, struct members and
//! functions. Type references can therefore point at entities declared
//! anywhere in the document. The first error aborts the parse and the
//! partially built model is dropped.

use crate::attrs::Attributes;
use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::xml::{XmlElement, parse_document};
use ifgen_model::{
    ArrayType, DefaultValue, DoubleType, ElementRef, EnumId, EnumSubset, Function, FunctionParam,
    IntegerType, Interface, InterfaceBuilder, Issue, Metadata, ModelError, ParamType, StringType,
    StructId, StructMember, lint,
};
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Child elements carrying documentation, allowed on every entity.
const METADATA_TAGS: [&str; 4] = ["description", "design_description", "todo", "issue"];

/// Parses an interface document from a string with the default configuration.
///
/// # Arguments
/// * `xml` - Interface document content
///
/// # Returns
/// Parsed interface or parse error.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed or describes an invalid
/// interface.
pub fn parse_interface(xml: &str) -> Result<Interface, ParseError> {
    Parser::default().parse_str(xml)
}

/// Interface document parser.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Creates a parser with the given configuration.
    #[must_use]
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Returns the parser configuration.
    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses an interface document from a string.
    ///
    /// # Errors
    /// Returns `ParseError` if the XML is malformed or describes an invalid
    /// interface.
    pub fn parse_str(&self, xml: &str) -> Result<Interface, ParseError> {
        let root = parse_document(xml)?;
        self.parse_element(&root)
    }

    /// Parses an interface document from a reader.
    ///
    /// # Errors
    /// Returns `ParseError` if reading fails or the document is invalid.
    pub fn parse_reader<R: Read>(&self, mut reader: R) -> Result<Interface, ParseError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.parse_bytes(&bytes)
    }

    /// Parses an interface document file.
    ///
    /// # Errors
    /// Returns `ParseError` if the file cannot be read or the document is
    /// invalid.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Interface, ParseError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "parsing interface file");
        let bytes = std::fs::read(path)?;
        self.parse_bytes(&bytes)
    }

    /// Parses an interface document from UTF-8 bytes.
    ///
    /// # Errors
    /// Returns `ParseError` if the bytes are not UTF-8 or the document is
    /// invalid.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Interface, ParseError> {
        self.parse_str(std::str::from_utf8(bytes)?)
    }

    /// Parses an already built element tree rooted at `<interface>`.
    ///
    /// # Errors
    /// Returns `ParseError` if the tree describes an invalid interface.
    pub fn parse_element(&self, root: &XmlElement) -> Result<Interface, ParseError> {
        let interface = Resolver::new(&self.config).run(root)?;
        if self.config.lint_enabled() {
            for warning in lint(&interface) {
                warn!(%warning, "interface lint");
            }
        }
        Ok(interface)
    }
}

/// Common result of parsing a struct member or function param.
struct ParsedParam {
    meta: Metadata,
    param_type: ParamType,
    is_mandatory: bool,
    attrs: Attributes,
}

/// State of one parse.
struct Resolver<'c> {
    config: &'c ParserConfig,
    builder: InterfaceBuilder,
}

impl<'c> Resolver<'c> {
    fn new(config: &'c ParserConfig) -> Self {
        Self {
            config,
            builder: InterfaceBuilder::new(),
        }
    }

    fn run(mut self, root: &XmlElement) -> Result<Interface, ParseError> {
        if root.name != "interface" {
            return Err(ParseError::structure(format!(
                "root element must be <interface>, found <{}>",
                root.name
            )));
        }
        for (name, value) in &root.attributes {
            self.builder.set_param(name, value);
        }

        // Pass 1: declare every enum and struct so bodies can reference them.
        let mut enums: Vec<(EnumId, &XmlElement)> = Vec::new();
        let mut structs: Vec<(StructId, &XmlElement)> = Vec::new();
        let mut functions: Vec<&XmlElement> = Vec::new();
        for child in &root.children {
            match child.name.as_str() {
                "enum" => enums.push((self.declare_enum(child)?, child)),
                "struct" => structs.push((self.declare_struct(child)?, child)),
                "function" => functions.push(child),
                other => self.unexpected_element(other, "interface")?,
            }
        }
        debug!(
            enums = enums.len(),
            structs = structs.len(),
            functions = functions.len(),
            "declared interface entities"
        );

        // Pass 2: bodies. Enums first so subsets and defaults see every element.
        for (id, element) in enums {
            self.resolve_enum(id, element)?;
        }
        for (id, element) in structs {
            self.resolve_struct(id, element)?;
        }
        for element in functions {
            self.resolve_function(element)?;
        }

        let interface = self.builder.finish();
        debug!(
            enums = interface.enums().len(),
            structs = interface.structs().len(),
            functions = interface.function_count(),
            "resolved interface"
        );
        Ok(interface)
    }

    fn strict(&self) -> bool {
        self.config.is_strict()
    }

    fn unexpected_element(&self, element: &str, context: &str) -> Result<(), ParseError> {
        if self.strict() {
            return Err(ParseError::unexpected_element(element, context));
        }
        warn!(%element, %context, "ignoring unexpected element");
        Ok(())
    }

    /// Rejects children that are neither documentation nor in `allowed`.
    fn check_children(
        &self,
        element: &XmlElement,
        allowed: &[&str],
        context: &str,
    ) -> Result<(), ParseError> {
        for child in &element.children {
            let tag = child.name.as_str();
            if !METADATA_TAGS.contains(&tag) && !allowed.contains(&tag) {
                self.unexpected_element(tag, context)?;
            }
        }
        Ok(())
    }

    /// Rejects every child named `tag`.
    fn reject_children(
        &self,
        element: &XmlElement,
        tag: &str,
        context: &str,
    ) -> Result<(), ParseError> {
        if element.children_named(tag).next().is_some() {
            self.unexpected_element(tag, context)?;
        }
        Ok(())
    }

    /// Collects documentation children in document order.
    fn metadata(
        &self,
        element: &XmlElement,
        name: String,
        context: &str,
    ) -> Result<Metadata, ParseError> {
        let mut meta = Metadata::new(name);
        for child in &element.children {
            let tag = child.name.as_str();
            if !METADATA_TAGS.contains(&tag) {
                continue;
            }
            for nested in &child.children {
                self.unexpected_element(&nested.name, &format!("<{tag}> of {context}"))?;
            }
            let mut attrs = Attributes::new(child, format!("<{tag}> of {context}"));
            match tag {
                "description" => meta.description.push(child.text.clone()),
                "design_description" => meta.design_description.push(child.text.clone()),
                "todo" => meta.todos.push(child.text.clone()),
                _ => {
                    let creator = attrs.require("creator")?;
                    meta.issues.push(Issue::new(creator, child.text.clone()));
                }
            }
            attrs.finish(self.strict())?;
        }
        Ok(meta)
    }

    fn declare_enum(&mut self, element: &XmlElement) -> Result<EnumId, ParseError> {
        let mut attrs = Attributes::new(element, "enum");
        let name = attrs.require("name")?;
        let context = format!("enum '{name}'");
        attrs.set_context(&context);
        let internal_scope = attrs.take("internal_scope");
        attrs.finish(self.strict())?;

        let meta = self.metadata(element, name, &context)?;
        self.builder
            .declare_enum(meta, internal_scope)
            .map_err(|e| ParseError::model("interface", e))
    }

    fn declare_struct(&mut self, element: &XmlElement) -> Result<StructId, ParseError> {
        let mut attrs = Attributes::new(element, "struct");
        let name = attrs.require("name")?;
        let context = format!("struct '{name}'");
        attrs.set_context(&context);
        attrs.finish(self.strict())?;

        let meta = self.metadata(element, name, &context)?;
        self.builder
            .declare_struct(meta)
            .map_err(|e| ParseError::model("interface", e))
    }

    fn resolve_enum(&mut self, id: EnumId, element: &XmlElement) -> Result<(), ParseError> {
        let context = format!("enum '{}'", self.builder.enum_of(id).name());
        self.check_children(element, &["element"], &context)?;

        for child in element.children_named("element") {
            let mut attrs = Attributes::new(child, format!("element of {context}"));
            let name = attrs.require("name")?;
            let element_context = format!("{context} element '{name}'");
            attrs.set_context(&element_context);
            let internal_name = attrs.take("internal_name");
            let value = attrs.take_i64("value")?;
            attrs.finish(self.strict())?;
            self.check_children(child, &[], &element_context)?;

            let meta = self.metadata(child, name, &element_context)?;
            self.builder
                .add_element(id, meta, internal_name, value)
                .map_err(|e| ParseError::model(&element_context, e))?;
        }
        Ok(())
    }

    fn resolve_struct(&mut self, id: StructId, element: &XmlElement) -> Result<(), ParseError> {
        let context = format!("struct '{}'", self.builder.struct_of(id).name());
        self.check_children(element, &["param"], &context)?;

        for child in element.children_named("param") {
            let ParsedParam {
                meta,
                param_type,
                is_mandatory,
                attrs,
            } = self.parse_param(child, &context)?;
            let member_context = attrs.context().to_string();
            attrs.finish(self.strict())?;

            let member = StructMember::new(meta, param_type).mandatory(is_mandatory);
            self.builder
                .add_member(id, member)
                .map_err(|e| ParseError::model(&member_context, e))?;
        }
        Ok(())
    }

    fn resolve_function(&mut self, element: &XmlElement) -> Result<(), ParseError> {
        let mut attrs = Attributes::new(element, "function");
        let name = attrs.require("name")?;
        let context = format!("function '{name}'");
        attrs.set_context(&context);
        let function_id_name = attrs.require("functionID")?;
        let message_type_name = attrs.require("messagetype")?;
        let platform = attrs.take("platform");
        attrs.finish(self.strict())?;
        self.check_children(element, &["param"], &context)?;

        let function_id = self.key_element(
            self.config.function_id_enum_name(),
            &function_id_name,
            &context,
        )?;
        let message_type = self.key_element(
            self.config.message_type_enum_name(),
            &message_type_name,
            &context,
        )?;

        let meta = self.metadata(element, name, &context)?;
        let mut function = Function::new(meta, function_id, message_type, platform);

        for child in element.children_named("param") {
            let ParsedParam {
                meta,
                param_type,
                is_mandatory,
                mut attrs,
            } = self.parse_param(child, &context)?;
            let param_context = attrs.context().to_string();
            let platform = attrs.take("platform");
            let default_value = attrs
                .take("defvalue")
                .map(|text| self.parse_default(&text, &param_type, &param_context))
                .transpose()?;
            attrs.finish(self.strict())?;

            let param = FunctionParam {
                platform,
                default_value,
                ..FunctionParam::new(meta, param_type).mandatory(is_mandatory)
            };
            function
                .add_param(param)
                .map_err(|e| ParseError::model(&param_context, e))?;
        }

        self.builder
            .add_function(function)
            .map_err(|e| ParseError::model(&context, e))?;
        Ok(())
    }

    /// Resolves a function id or message type element by name.
    fn key_element(
        &self,
        enum_name: &str,
        element: &str,
        context: &str,
    ) -> Result<ElementRef, ParseError> {
        let enum_id = self
            .builder
            .enum_id(enum_name)
            .ok_or_else(|| ParseError::unknown_type(enum_name, context))?;
        self.builder
            .enum_of(enum_id)
            .element_ref(element)
            .ok_or_else(|| ParseError::UnknownElement {
                enum_name: enum_name.to_string(),
                element: element.to_string(),
                context: context.to_string(),
            })
    }

    /// Parses what struct members and function params share: name,
    /// mandatory flag, type and documentation. The remaining attributes
    /// are handed back to the caller.
    fn parse_param(&self, element: &XmlElement, owner: &str) -> Result<ParsedParam, ParseError> {
        let mut attrs = Attributes::new(element, format!("param of {owner}"));
        let name = attrs.require("name")?;
        let context = format!("{owner} param '{name}'");
        attrs.set_context(&context);
        let is_mandatory = attrs.take_bool("mandatory")?.unwrap_or(true);
        let param_type = self.resolve_type(element, &mut attrs, &context)?;
        self.check_children(element, &["element", "element_type"], &context)?;
        let meta = self.metadata(element, name, &context)?;

        Ok(ParsedParam {
            meta,
            param_type,
            is_mandatory,
            attrs,
        })
    }

    /// Resolves the `type` attribute of a param or `<element_type>`,
    /// honouring the `array="true"` shorthand.
    fn resolve_type(
        &self,
        element: &XmlElement,
        attrs: &mut Attributes,
        context: &str,
    ) -> Result<ParamType, ParseError> {
        let type_name = attrs.require("type")?;
        if attrs.take_bool("array")?.unwrap_or(false) {
            let min_size = attrs.take_i64("minsize")?;
            let max_size = attrs.take_i64("maxsize")?;
            let element_type = self.resolve_named_type(&type_name, element, attrs, context)?;
            let array = ArrayType::new(element_type, min_size, max_size)
                .map_err(|e| ParseError::model(context, e))?;
            return Ok(ParamType::Array(array));
        }
        self.resolve_named_type(&type_name, element, attrs, context)
    }

    /// Resolves a type keyword, then an enum name, then a struct name.
    fn resolve_named_type(
        &self,
        type_name: &str,
        element: &XmlElement,
        attrs: &mut Attributes,
        context: &str,
    ) -> Result<ParamType, ParseError> {
        let model = |e: ModelError| ParseError::model(context, e);

        let param_type = match type_name {
            "Integer" => {
                let min_value = attrs.take_i64("minvalue")?;
                let max_value = attrs.take_i64("maxvalue")?;
                ParamType::Integer(IntegerType::new(min_value, max_value).map_err(model)?)
            }
            "Double" | "Float" => {
                let min_value = attrs.take_f64("minvalue")?;
                let max_value = attrs.take_f64("maxvalue")?;
                ParamType::Double(DoubleType::new(min_value, max_value).map_err(model)?)
            }
            "Boolean" => ParamType::Boolean,
            "String" => {
                let min_length = attrs.take_i64("minlength")?;
                let max_length = attrs.take_i64("maxlength")?;
                ParamType::String(StringType::new(min_length, max_length).map_err(model)?)
            }
            "Array" => {
                let min_size = attrs.take_i64("minsize")?;
                let max_size = attrs.take_i64("maxsize")?;
                let element_type = self.resolve_element_type(element, context)?;
                ParamType::Array(ArrayType::new(element_type, min_size, max_size).map_err(model)?)
            }
            name => {
                if let Some(enum_id) = self.builder.enum_id(name) {
                    self.resolve_enum_reference(enum_id, element, context)?
                } else if let Some(struct_id) = self.builder.struct_id(name) {
                    ParamType::Struct(struct_id)
                } else {
                    return Err(ParseError::unknown_type(name, context));
                }
            }
        };

        if param_type.enum_id().is_none() {
            self.reject_children(element, "element", context)?;
        }
        if type_name != "Array" {
            self.reject_children(element, "element_type", context)?;
        }
        Ok(param_type)
    }

    /// Resolves the single `<element_type>` child of an `Array` type.
    fn resolve_element_type(
        &self,
        element: &XmlElement,
        context: &str,
    ) -> Result<ParamType, ParseError> {
        let mut nested = element.children_named("element_type");
        let (Some(child), None) = (nested.next(), nested.next()) else {
            return Err(ParseError::structure(format!(
                "{context}: Array type requires exactly one <element_type>"
            )));
        };

        let nested_context = format!("{context} element_type");
        let mut attrs = Attributes::new(child, nested_context.clone());
        let element_type = self.resolve_type(child, &mut attrs, &nested_context)?;
        attrs.finish(self.strict())?;
        self.check_children(child, &["element", "element_type"], &nested_context)?;
        Ok(element_type)
    }

    /// Builds an enum reference, or an enum subset if `<element>` children
    /// list allowed names.
    fn resolve_enum_reference(
        &self,
        enum_id: EnumId,
        element: &XmlElement,
        context: &str,
    ) -> Result<ParamType, ParseError> {
        let mut allowed = Vec::new();
        for child in element.children_named("element") {
            let mut attrs = Attributes::new(child, format!("allowed element of {context}"));
            allowed.push(attrs.require("name")?);
            attrs.finish(self.strict())?;
            for nested in &child.children {
                self.unexpected_element(&nested.name, &format!("allowed element of {context}"))?;
            }
        }
        if allowed.is_empty() {
            return Ok(ParamType::Enum(enum_id));
        }

        let enum_def = self.builder.enum_of(enum_id);
        EnumSubset::new(enum_def, allowed.iter().map(String::as_str))
            .map(ParamType::EnumSubset)
            .map_err(|e| match e {
                ModelError::UnknownElement { enum_name, element } => ParseError::UnknownElement {
                    enum_name,
                    element,
                    context: context.to_string(),
                },
                other => ParseError::model(context, other),
            })
    }

    /// Parses a `defvalue` literal according to the param type.
    fn parse_default(
        &self,
        text: &str,
        param_type: &ParamType,
        context: &str,
    ) -> Result<DefaultValue, ParseError> {
        let invalid = |reason: String| ParseError::InvalidDefault {
            value: text.to_string(),
            type_name: param_type.kind_name().to_string(),
            context: context.to_string(),
            reason,
        };
        let unknown_element = |enum_id: EnumId| ParseError::UnknownElement {
            enum_name: self.builder.enum_of(enum_id).name().to_string(),
            element: text.to_string(),
            context: context.to_string(),
        };

        match param_type {
            ParamType::Boolean => match text {
                "true" => Ok(DefaultValue::Boolean(true)),
                "false" => Ok(DefaultValue::Boolean(false)),
                _ => Err(invalid("expected 'true' or 'false'".to_string())),
            },
            ParamType::Integer(int) => {
                let value: i64 = text
                    .trim()
                    .parse()
                    .map_err(|_| invalid("not an integer".to_string()))?;
                if !int.contains(value) {
                    return Err(invalid(format!(
                        "outside {}",
                        describe_bounds(int.min_value(), int.max_value())
                    )));
                }
                Ok(DefaultValue::Integer(value))
            }
            ParamType::Double(double) => {
                let value = text
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| invalid("not a finite number".to_string()))?;
                if !double.contains(value) {
                    return Err(invalid(format!(
                        "outside {}",
                        describe_bounds(double.min_value(), double.max_value())
                    )));
                }
                Ok(DefaultValue::Double(value))
            }
            ParamType::String(string) => {
                let len = text.chars().count();
                if !string.accepts_length(len) {
                    return Err(invalid(format!(
                        "length {len} outside {}",
                        describe_bounds(string.min_length(), string.max_length())
                    )));
                }
                Ok(DefaultValue::String(text.to_string()))
            }
            ParamType::Enum(enum_id) => self
                .builder
                .enum_of(*enum_id)
                .element_ref(text)
                .map(DefaultValue::Element)
                .ok_or_else(|| unknown_element(*enum_id)),
            ParamType::EnumSubset(subset) => subset
                .get(text)
                .map(DefaultValue::Element)
                .ok_or_else(|| unknown_element(subset.enum_id())),
            ParamType::Array(_) | ParamType::Struct(_) => {
                Err(invalid("type does not accept a default value".to_string()))
            }
        }
    }
}

fn describe_bounds<T: std::fmt::Display>(min: Option<T>, max: Option<T>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("[{min}, {max}]"),
        (Some(min), None) => format!("[{min}, ..)"),
        (None, Some(max)) => format!("(.., {max}]"),
        (None, None) => "(.., ..)".to_string(),
    }
}
