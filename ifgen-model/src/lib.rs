//! # ifgen Model
//!
//! In-memory model of an RPC interface described in XML.
//!
//! This crate provides:
//! - The parameter type algebra (primitives with constraints, arrays,
//!   struct/enum references, enum subsets)
//! - Documentation metadata attached to every named entity
//! - The entity graph rooted at [`Interface`] and its [`InterfaceBuilder`]
//! - Advisory checks for generators

pub mod doc;
pub mod error;
pub mod interface;
pub mod map;
pub mod types;
pub mod validation;

pub use doc::{Issue, Metadata};
pub use error::ModelError;
pub use interface::{
    Enum, EnumElement, Function, FunctionKey, FunctionParam, Interface, InterfaceBuilder, Struct,
    StructMember,
};
pub use map::{Named, NamedMap};
pub use types::{
    ArrayType, DefaultValue, DoubleType, ElementRef, EnumId, EnumSubset, IntegerType, ParamType,
    StringType, StructId,
};
pub use validation::{Warning, lint};
