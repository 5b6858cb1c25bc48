//! Interface entities and their builder.
//!
//! [`Interface`] is the root of a parsed document and the sole owner of
//! every enum, struct and function. Entities reference each other through
//! the handles in [`crate::types`]. The only way to create or grow an
//! interface is [`InterfaceBuilder`]; once [`InterfaceBuilder::finish`]
//! returns, the graph is read-only.

use crate::doc::Metadata;
use crate::error::{ModelError, Result};
use crate::map::{Named, NamedMap};
use crate::types::{DefaultValue, ElementRef, EnumId, ParamType, StructId};
use std::collections::HashMap;

/// Element of an enum.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumElement {
    meta: Metadata,
    internal_name: Option<String>,
    explicit_value: Option<i64>,
    value: i64,
    handle: ElementRef,
}

impl EnumElement {
    /// Element name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.meta.name
    }

    /// Documentation metadata.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.meta
    }

    /// Alternative name used by generators.
    #[must_use]
    pub fn internal_name(&self) -> Option<&str> {
        self.internal_name.as_deref()
    }

    /// Value as written in the document.
    #[must_use]
    pub const fn explicit_value(&self) -> Option<i64> {
        self.explicit_value
    }

    /// Resolved value: the explicit one, or the previous element's value
    /// plus one (zero for the first element).
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.value
    }

    /// Handle identifying this element.
    #[must_use]
    pub const fn handle(&self) -> ElementRef {
        self.handle
    }
}

impl Named for EnumElement {
    fn name(&self) -> &str {
        &self.meta.name
    }
}

/// Enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct Enum {
    id: EnumId,
    meta: Metadata,
    internal_scope: Option<String>,
    elements: NamedMap<EnumElement>,
}

impl Enum {
    /// Handle identifying this enum.
    #[must_use]
    pub const fn id(&self) -> EnumId {
        self.id
    }

    /// Enum name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.meta.name
    }

    /// Documentation metadata.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.meta
    }

    /// Scope used to disambiguate element names across enums.
    #[must_use]
    pub fn internal_scope(&self) -> Option<&str> {
        self.internal_scope.as_deref()
    }

    /// Elements in declaration order.
    #[must_use]
    pub fn elements(&self) -> &NamedMap<EnumElement> {
        &self.elements
    }

    /// Looks up an element by name.
    #[must_use]
    pub fn element(&self, name: &str) -> Option<&EnumElement> {
        self.elements.get(name)
    }

    /// Looks up an element handle by name.
    #[must_use]
    pub fn element_ref(&self, name: &str) -> Option<ElementRef> {
        self.elements.get(name).map(EnumElement::handle)
    }
}

impl Named for Enum {
    fn name(&self) -> &str {
        &self.meta.name
    }
}

/// Member of a struct.
#[derive(Debug, Clone, PartialEq)]
pub struct StructMember {
    /// Name and documentation.
    pub meta: Metadata,
    /// Member type.
    pub param_type: ParamType,
    /// Whether the member must be present.
    pub is_mandatory: bool,
}

impl StructMember {
    /// Creates a mandatory member.
    #[must_use]
    pub fn new(meta: Metadata, param_type: ParamType) -> Self {
        Self {
            meta,
            param_type,
            is_mandatory: true,
        }
    }

    /// Sets whether the member is mandatory.
    #[must_use]
    pub fn mandatory(mut self, is_mandatory: bool) -> Self {
        self.is_mandatory = is_mandatory;
        self
    }
}

impl Named for StructMember {
    fn name(&self) -> &str {
        &self.meta.name
    }
}

/// Structure.
#[derive(Debug, Clone)]
pub struct Struct {
    id: StructId,
    meta: Metadata,
    members: NamedMap<StructMember>,
}

impl Struct {
    /// Handle identifying this struct.
    #[must_use]
    pub const fn id(&self) -> StructId {
        self.id
    }

    /// Struct name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.meta.name
    }

    /// Documentation metadata.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.meta
    }

    /// Members in declaration order.
    #[must_use]
    pub fn members(&self) -> &NamedMap<StructMember> {
        &self.members
    }

    /// Looks up a member by name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&StructMember> {
        self.members.get(name)
    }
}

impl Named for Struct {
    fn name(&self) -> &str {
        &self.meta.name
    }
}

/// Parameter of a function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionParam {
    /// Name and documentation.
    pub meta: Metadata,
    /// Parameter type.
    pub param_type: ParamType,
    /// Whether the parameter must be present.
    pub is_mandatory: bool,
    /// Platform override.
    pub platform: Option<String>,
    /// Default value, typed after `param_type`.
    pub default_value: Option<DefaultValue>,
}

impl FunctionParam {
    /// Creates a mandatory parameter without platform or default value.
    #[must_use]
    pub fn new(meta: Metadata, param_type: ParamType) -> Self {
        Self {
            meta,
            param_type,
            is_mandatory: true,
            platform: None,
            default_value: None,
        }
    }

    /// Sets whether the parameter is mandatory.
    #[must_use]
    pub fn mandatory(mut self, is_mandatory: bool) -> Self {
        self.is_mandatory = is_mandatory;
        self
    }
}

impl Named for FunctionParam {
    fn name(&self) -> &str {
        &self.meta.name
    }
}

/// Unique key of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionKey {
    /// Element of the function id enum.
    pub function_id: ElementRef,
    /// Element of the message type enum.
    pub message_type: ElementRef,
}

/// Function (request, response or notification).
#[derive(Debug, Clone)]
pub struct Function {
    meta: Metadata,
    function_id: ElementRef,
    message_type: ElementRef,
    platform: Option<String>,
    params: NamedMap<FunctionParam>,
}

impl Function {
    /// Creates a function without parameters.
    #[must_use]
    pub fn new(
        meta: Metadata,
        function_id: ElementRef,
        message_type: ElementRef,
        platform: Option<String>,
    ) -> Self {
        Self {
            meta,
            function_id,
            message_type,
            platform,
            params: NamedMap::new(),
        }
    }

    /// Appends a parameter.
    ///
    /// # Errors
    /// Returns `ModelError` if the name is empty or already used in this
    /// function.
    pub fn add_param(&mut self, param: FunctionParam) -> Result<()> {
        require_name("param", &param.meta)?;
        self.params.insert(param).map_err(|param| {
            ModelError::duplicate(
                "param",
                param.meta.name,
                format!("function '{}'", self.meta.name),
            )
        })?;
        Ok(())
    }

    /// Function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.meta.name
    }

    /// Documentation metadata.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.meta
    }

    /// Function id element.
    #[must_use]
    pub const fn function_id(&self) -> ElementRef {
        self.function_id
    }

    /// Message type element.
    #[must_use]
    pub const fn message_type(&self) -> ElementRef {
        self.message_type
    }

    /// Key of the function.
    #[must_use]
    pub const fn key(&self) -> FunctionKey {
        FunctionKey {
            function_id: self.function_id,
            message_type: self.message_type,
        }
    }

    /// Target platform.
    #[must_use]
    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    /// Parameters in declaration order.
    #[must_use]
    pub fn params(&self) -> &NamedMap<FunctionParam> {
        &self.params
    }

    /// Looks up a parameter by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&FunctionParam> {
        self.params.get(name)
    }
}

/// Root of a parsed interface document.
#[derive(Debug, Clone, Default)]
pub struct Interface {
    params: Vec<(String, String)>,
    enums: NamedMap<Enum>,
    structs: NamedMap<Struct>,
    functions: Vec<Function>,
    function_index: HashMap<FunctionKey, usize>,
}

impl Interface {
    /// Top-level interface attributes in document order.
    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Looks up a top-level attribute.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Enums in declaration order.
    #[must_use]
    pub fn enums(&self) -> &NamedMap<Enum> {
        &self.enums
    }

    /// Structs in declaration order.
    #[must_use]
    pub fn structs(&self) -> &NamedMap<Struct> {
        &self.structs
    }

    /// Functions in declaration order.
    pub fn functions(&self) -> std::slice::Iter<'_, Function> {
        self.functions.iter()
    }

    /// Number of functions.
    #[must_use]
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Looks up an enum by name.
    #[must_use]
    pub fn enum_by_name(&self, name: &str) -> Option<&Enum> {
        self.enums.get(name)
    }

    /// Looks up a struct by name.
    #[must_use]
    pub fn struct_by_name(&self, name: &str) -> Option<&Struct> {
        self.structs.get(name)
    }

    /// Resolves an enum handle.
    ///
    /// # Panics
    /// Panics if the handle was issued by a different interface.
    #[must_use]
    pub fn enum_of(&self, id: EnumId) -> &Enum {
        &self.enums[id.0]
    }

    /// Resolves a struct handle.
    ///
    /// # Panics
    /// Panics if the handle was issued by a different interface.
    #[must_use]
    pub fn struct_of(&self, id: StructId) -> &Struct {
        &self.structs[id.0]
    }

    /// Resolves an element handle.
    ///
    /// # Panics
    /// Panics if the handle was issued by a different interface.
    #[must_use]
    pub fn element(&self, element: ElementRef) -> &EnumElement {
        &self.enum_of(element.enum_id).elements[element.index]
    }

    /// Looks up a function by key.
    #[must_use]
    pub fn function(&self, key: FunctionKey) -> Option<&Function> {
        self.function_index.get(&key).map(|&idx| &self.functions[idx])
    }

    /// Looks up a function by the names of its id and message type elements.
    #[must_use]
    pub fn function_by_names(&self, function_id: &str, message_type: &str) -> Option<&Function> {
        self.functions.iter().find(|function| {
            self.element(function.function_id).name() == function_id
                && self.element(function.message_type).name() == message_type
        })
    }

    fn get_element(&self, element: ElementRef) -> Option<&EnumElement> {
        self.enums
            .get_index(element.enum_id.0)
            .and_then(|e| e.elements.get_index(element.index))
    }
}

/// Incremental constructor of an [`Interface`].
///
/// Enums and structs are declared first (empty) and filled in later, so
/// types may reference entities declared further down in a document.
#[derive(Debug, Default)]
pub struct InterfaceBuilder {
    interface: Interface,
}

impl InterfaceBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a top-level interface attribute. Setting a name again
    /// replaces its value in place.
    pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let (name, value) = (name.into(), value.into());
        match self.interface.params.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.interface.params.push((name, value)),
        }
    }

    /// Declares an enum without elements.
    ///
    /// # Errors
    /// Returns `ModelError` if the name is empty or already declared as an enum.
    pub fn declare_enum(
        &mut self,
        meta: Metadata,
        internal_scope: Option<String>,
    ) -> Result<EnumId> {
        require_name("enum", &meta)?;
        let id = EnumId(self.interface.enums.len());
        let enum_def = Enum {
            id,
            meta,
            internal_scope,
            elements: NamedMap::new(),
        };
        self.interface
            .enums
            .insert(enum_def)
            .map_err(|e| ModelError::duplicate("enum", e.meta.name, "interface"))?;
        Ok(id)
    }

    /// Declares a struct without members.
    ///
    /// # Errors
    /// Returns `ModelError` if the name is empty or already declared as a struct.
    pub fn declare_struct(&mut self, meta: Metadata) -> Result<StructId> {
        require_name("struct", &meta)?;
        let id = StructId(self.interface.structs.len());
        let struct_def = Struct {
            id,
            meta,
            members: NamedMap::new(),
        };
        self.interface
            .structs
            .insert(struct_def)
            .map_err(|s| ModelError::duplicate("struct", s.meta.name, "interface"))?;
        Ok(id)
    }

    /// Finds a declared enum.
    #[must_use]
    pub fn enum_id(&self, name: &str) -> Option<EnumId> {
        self.interface.enums.get(name).map(Enum::id)
    }

    /// Finds a declared struct.
    #[must_use]
    pub fn struct_id(&self, name: &str) -> Option<StructId> {
        self.interface.structs.get(name).map(Struct::id)
    }

    /// Resolves an enum handle.
    ///
    /// # Panics
    /// Panics if the handle was issued by a different builder.
    #[must_use]
    pub fn enum_of(&self, id: EnumId) -> &Enum {
        self.interface.enum_of(id)
    }

    /// Resolves a struct handle.
    ///
    /// # Panics
    /// Panics if the handle was issued by a different builder.
    #[must_use]
    pub fn struct_of(&self, id: StructId) -> &Struct {
        self.interface.struct_of(id)
    }

    /// Read-only view of what has been built so far.
    #[must_use]
    pub fn interface(&self) -> &Interface {
        &self.interface
    }

    /// Appends an element to a declared enum.
    ///
    /// Without an explicit value the element takes the previous element's
    /// resolved value plus one, or zero if it is the first.
    ///
    /// # Errors
    /// Returns `ModelError` if the name is empty or already used in the
    /// enum, or if the implicit value overflows.
    ///
    /// # Panics
    /// Panics if the handle was issued by a different builder.
    pub fn add_element(
        &mut self,
        enum_id: EnumId,
        meta: Metadata,
        internal_name: Option<String>,
        explicit_value: Option<i64>,
    ) -> Result<ElementRef> {
        require_name("element", &meta)?;
        let enum_def = self
            .interface
            .enums
            .get_index_mut(enum_id.0)
            .ok_or_else(|| ModelError::constraint(format!("unknown enum handle {enum_id:?}")))?;

        let value = match explicit_value {
            Some(value) => value,
            None => match enum_def.elements.last() {
                Some(previous) => previous.value.checked_add(1).ok_or_else(|| {
                    ModelError::constraint(format!(
                        "implicit value after '{}' in enum '{}' overflows",
                        previous.name(),
                        enum_def.meta.name
                    ))
                })?,
                None => 0,
            },
        };

        let handle = ElementRef {
            enum_id,
            index: enum_def.elements.len(),
        };
        let element = EnumElement {
            meta,
            internal_name,
            explicit_value,
            value,
            handle,
        };
        enum_def.elements.insert(element).map_err(|e| {
            ModelError::duplicate(
                "element",
                e.meta.name,
                format!("enum '{}'", enum_def.meta.name),
            )
        })?;
        Ok(handle)
    }

    /// Appends a member to a declared struct.
    ///
    /// # Errors
    /// Returns `ModelError` if the name is empty or already used in the struct.
    pub fn add_member(&mut self, struct_id: StructId, member: StructMember) -> Result<()> {
        require_name("member", &member.meta)?;
        let struct_def = self
            .interface
            .structs
            .get_index_mut(struct_id.0)
            .ok_or_else(|| ModelError::constraint(format!("unknown struct handle {struct_id:?}")))?;
        struct_def.members.insert(member).map_err(|m| {
            ModelError::duplicate(
                "member",
                m.meta.name,
                format!("struct '{}'", struct_def.meta.name),
            )
        })?;
        Ok(())
    }

    /// Adds a function.
    ///
    /// # Errors
    /// Returns `ModelError::DuplicateFunctionKey` if a function with the
    /// same (function id, message type) pair exists, and
    /// `ModelError::Constraint` if either handle does not belong to this
    /// builder.
    pub fn add_function(&mut self, function: Function) -> Result<FunctionKey> {
        require_name("function", &function.meta)?;
        let key = function.key();
        let (Some(function_id), Some(message_type)) = (
            self.interface.get_element(key.function_id),
            self.interface.get_element(key.message_type),
        ) else {
            return Err(ModelError::constraint(format!(
                "function '{}' references an element outside this interface",
                function.meta.name
            )));
        };
        if self.interface.function_index.contains_key(&key) {
            return Err(ModelError::DuplicateFunctionKey {
                function_id: function_id.name().to_string(),
                message_type: message_type.name().to_string(),
            });
        }
        let idx = self.interface.functions.len();
        self.interface.functions.push(function);
        self.interface.function_index.insert(key, idx);
        Ok(key)
    }

    /// Completes construction.
    #[must_use]
    pub fn finish(self) -> Interface {
        self.interface
    }
}

fn require_name(kind: &'static str, meta: &Metadata) -> Result<()> {
    if meta.name.is_empty() {
        return Err(ModelError::EmptyName { kind });
    }
    Ok(())
}
