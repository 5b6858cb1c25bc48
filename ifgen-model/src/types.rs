//! Parameter type algebra.
//!
//! A [`ParamType`] is a closed set of variants. Primitive variants carry
//! their own constraints, validated when they are constructed. Struct and
//! enum variants hold handles into the owning [`Interface`] rather than
//! copies, so two references to the same enum compare equal by identity.
//!
//! [`Interface`]: crate::interface::Interface

use crate::error::{ModelError, Result};
use crate::interface::Enum;

/// Handle to an enum owned by an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnumId(pub(crate) usize);

impl EnumId {
    /// Declaration index of the enum.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Handle to a struct owned by an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructId(pub(crate) usize);

impl StructId {
    /// Declaration index of the struct.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Handle to one element of an enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementRef {
    pub(crate) enum_id: EnumId,
    pub(crate) index: usize,
}

impl ElementRef {
    /// Enum the element belongs to.
    #[must_use]
    pub const fn enum_id(self) -> EnumId {
        self.enum_id
    }

    /// Declaration index of the element inside its enum.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

/// Integer type with optional bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntegerType {
    min_value: Option<i64>,
    max_value: Option<i64>,
}

impl IntegerType {
    /// Creates an integer type.
    ///
    /// # Errors
    /// Returns `ModelError::Constraint` if `min_value > max_value`.
    pub fn new(min_value: Option<i64>, max_value: Option<i64>) -> Result<Self> {
        if let (Some(min), Some(max)) = (min_value, max_value) {
            if min > max {
                return Err(ModelError::constraint(format!(
                    "Integer minvalue {min} is greater than maxvalue {max}"
                )));
            }
        }
        Ok(Self {
            min_value,
            max_value,
        })
    }

    /// Lower bound.
    #[must_use]
    pub const fn min_value(&self) -> Option<i64> {
        self.min_value
    }

    /// Upper bound.
    #[must_use]
    pub const fn max_value(&self) -> Option<i64> {
        self.max_value
    }

    /// Returns true if `value` satisfies both bounds.
    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        self.min_value.is_none_or(|min| value >= min) && self.max_value.is_none_or(|max| value <= max)
    }
}

/// Floating point type with optional bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DoubleType {
    min_value: Option<f64>,
    max_value: Option<f64>,
}

impl DoubleType {
    /// Creates a floating point type.
    ///
    /// # Errors
    /// Returns `ModelError::Constraint` if a bound is not finite or
    /// `min_value > max_value`.
    pub fn new(min_value: Option<f64>, max_value: Option<f64>) -> Result<Self> {
        for bound in [min_value, max_value].into_iter().flatten() {
            if !bound.is_finite() {
                return Err(ModelError::constraint(format!(
                    "Double bound {bound} is not finite"
                )));
            }
        }
        if let (Some(min), Some(max)) = (min_value, max_value) {
            if min > max {
                return Err(ModelError::constraint(format!(
                    "Double minvalue {min} is greater than maxvalue {max}"
                )));
            }
        }
        Ok(Self {
            min_value,
            max_value,
        })
    }

    /// Lower bound.
    #[must_use]
    pub const fn min_value(&self) -> Option<f64> {
        self.min_value
    }

    /// Upper bound.
    #[must_use]
    pub const fn max_value(&self) -> Option<f64> {
        self.max_value
    }

    /// Returns true if `value` satisfies both bounds.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min_value.is_none_or(|min| value >= min) && self.max_value.is_none_or(|max| value <= max)
    }
}

/// String type with optional length bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StringType {
    min_length: Option<usize>,
    max_length: Option<usize>,
}

impl StringType {
    /// Creates a string type.
    ///
    /// # Errors
    /// Returns `ModelError::Constraint` on a negative length or
    /// `min_length > max_length`.
    pub fn new(min_length: Option<i64>, max_length: Option<i64>) -> Result<Self> {
        let min_length = non_negative("String minlength", min_length)?;
        let max_length = non_negative("String maxlength", max_length)?;
        ordered("String", "length", min_length, max_length)?;
        Ok(Self {
            min_length,
            max_length,
        })
    }

    /// Minimum length in characters.
    #[must_use]
    pub const fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    /// Maximum length in characters.
    #[must_use]
    pub const fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Returns true if a string of `len` characters satisfies both bounds.
    #[must_use]
    pub fn accepts_length(&self, len: usize) -> bool {
        self.min_length.is_none_or(|min| len >= min) && self.max_length.is_none_or(|max| len <= max)
    }
}

/// Array type with an element type and optional size bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    element_type: Box<ParamType>,
    min_size: Option<usize>,
    max_size: Option<usize>,
}

impl ArrayType {
    /// Creates an array type.
    ///
    /// # Errors
    /// Returns `ModelError::Constraint` on a negative size or
    /// `min_size > max_size`.
    pub fn new(
        element_type: ParamType,
        min_size: Option<i64>,
        max_size: Option<i64>,
    ) -> Result<Self> {
        let min_size = non_negative("Array minsize", min_size)?;
        let max_size = non_negative("Array maxsize", max_size)?;
        ordered("Array", "size", min_size, max_size)?;
        Ok(Self {
            element_type: Box::new(element_type),
            min_size,
            max_size,
        })
    }

    /// Type of the array elements.
    #[must_use]
    pub fn element_type(&self) -> &ParamType {
        &self.element_type
    }

    /// Minimum number of elements.
    #[must_use]
    pub const fn min_size(&self) -> Option<usize> {
        self.min_size
    }

    /// Maximum number of elements.
    #[must_use]
    pub const fn max_size(&self) -> Option<usize> {
        self.max_size
    }
}

/// An enum narrowed to an allow-list of its elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSubset {
    enum_id: EnumId,
    allowed_elements: Vec<(String, ElementRef)>,
}

impl EnumSubset {
    /// Creates a subset of `enum_def` restricted to `names`, in the given order.
    ///
    /// # Errors
    /// Returns `ModelError::UnknownElement` if a name is not an element of
    /// the enum, `ModelError::DuplicateName` if a name is listed twice, and
    /// `ModelError::Constraint` if the list is empty.
    pub fn new<'a>(enum_def: &Enum, names: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut allowed_elements: Vec<(String, ElementRef)> = Vec::new();
        for name in names {
            let element = enum_def
                .element_ref(name)
                .ok_or_else(|| ModelError::UnknownElement {
                    enum_name: enum_def.name().to_string(),
                    element: name.to_string(),
                })?;
            if allowed_elements.iter().any(|(n, _)| n == name) {
                return Err(ModelError::duplicate(
                    "allowed element",
                    name,
                    format!("subset of enum '{}'", enum_def.name()),
                ));
            }
            allowed_elements.push((name.to_string(), element));
        }
        if allowed_elements.is_empty() {
            return Err(ModelError::constraint(format!(
                "subset of enum '{}' must allow at least one element",
                enum_def.name()
            )));
        }
        Ok(Self {
            enum_id: enum_def.id(),
            allowed_elements,
        })
    }

    /// The underlying enum.
    #[must_use]
    pub const fn enum_id(&self) -> EnumId {
        self.enum_id
    }

    /// Allowed elements in allow-list order.
    #[must_use]
    pub fn allowed_elements(&self) -> &[(String, ElementRef)] {
        &self.allowed_elements
    }

    /// Looks up an allowed element by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ElementRef> {
        self.allowed_elements
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, element)| element)
    }

    /// Returns true if the element is allowed.
    #[must_use]
    pub fn allows(&self, element: ElementRef) -> bool {
        self.allowed_elements.iter().any(|&(_, e)| e == element)
    }
}

/// Type of a struct member or function parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamType {
    /// Integer number.
    Integer(IntegerType),
    /// Floating point number.
    Double(DoubleType),
    /// Boolean flag.
    Boolean,
    /// Character string.
    String(StringType),
    /// Sequence of values.
    Array(ArrayType),
    /// Reference to a struct.
    Struct(StructId),
    /// Reference to an enum.
    Enum(EnumId),
    /// Reference to an enum restricted to some of its elements.
    EnumSubset(EnumSubset),
}

impl ParamType {
    /// Returns the IDL keyword of the variant.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "Integer",
            Self::Double(_) => "Double",
            Self::Boolean => "Boolean",
            Self::String(_) => "String",
            Self::Array(_) => "Array",
            Self::Struct(_) => "Struct",
            Self::Enum(_) => "Enum",
            Self::EnumSubset(_) => "EnumSubset",
        }
    }

    /// Returns true for Integer, Double, Boolean and String.
    #[must_use]
    pub const fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::Integer(_) | Self::Double(_) | Self::Boolean | Self::String(_)
        )
    }

    /// Returns the enum this type draws its values from, if any.
    #[must_use]
    pub const fn enum_id(&self) -> Option<EnumId> {
        match self {
            Self::Enum(id) => Some(*id),
            Self::EnumSubset(subset) => Some(subset.enum_id()),
            _ => None,
        }
    }

    /// Returns the struct referenced by this type, if any.
    #[must_use]
    pub const fn struct_id(&self) -> Option<StructId> {
        match self {
            Self::Struct(id) => Some(*id),
            _ => None,
        }
    }

    /// Strips any array layers and returns the innermost element type.
    #[must_use]
    pub fn innermost(&self) -> &ParamType {
        match self {
            Self::Array(array) => array.element_type().innermost(),
            other => other,
        }
    }
}

/// Typed default value of a function parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// Boolean literal.
    Boolean(bool),
    /// Integer literal.
    Integer(i64),
    /// Floating point literal.
    Double(f64),
    /// String literal.
    String(String),
    /// Enum element.
    Element(ElementRef),
}

fn non_negative(what: &str, value: Option<i64>) -> Result<Option<usize>> {
    value
        .map(|v| {
            usize::try_from(v)
                .map_err(|_| ModelError::constraint(format!("{what} must not be negative, got {v}")))
        })
        .transpose()
}

fn ordered(kind: &str, what: &str, min: Option<usize>, max: Option<usize>) -> Result<()> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(ModelError::constraint(format!(
            "{kind} min{what} {min} is greater than max{what} {max}"
        ))),
        _ => Ok(()),
    }
}
