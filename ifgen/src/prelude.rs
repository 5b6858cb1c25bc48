//! Prelude module for convenient imports.
//!
//! ```ignore
//! use ifgen::prelude::*;
//! ```

// Model types
pub use ifgen_model::{
    ArrayType, DefaultValue, DoubleType, ElementRef, Enum, EnumElement, EnumId, EnumSubset,
    Function, FunctionKey, FunctionParam, IntegerType, Interface, Issue, Metadata, ParamType,
    StringType, Struct, StructId, StructMember, Warning, lint,
};

// Parser types
pub use ifgen_parser::{ErrorKind, ParseError, Parser, ParserConfig, parse_interface};
