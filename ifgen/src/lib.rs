//! # ifgen
//!
//! Front-end for RPC interfaces described in XML.
//!
//! An interface document declares enums, structs and functions. The parser
//! resolves every type reference and builds a strongly-typed, read-only
//! [`Interface`](model::Interface) that code generators walk.
//!
//! ## Quick Start
//!
//! ```ignore
//! use ifgen::prelude::*;
//!
//! let interface = ifgen::parse_file("api.xml")?;
//! for function in interface.functions() {
//!     let id = interface.element(function.function_id());
//!     println!("{} = {}", function.name(), id.value());
//! }
//! ```
//!
//! ## Crate Organization
//!
//! - [`model`] - Types, documentation metadata and the entity graph
//! - [`parser`] - XML parsing and name resolution

use std::path::Path;

pub mod prelude;

/// Interface model: type algebra, entities and advisory checks.
pub mod model {
    pub use ifgen_model::*;
}

/// XML interface parser.
pub mod parser {
    pub use ifgen_parser::*;
}

/// Parses an interface document file with the default configuration.
///
/// # Errors
/// Returns `ParseError` if the file cannot be read or the document is
/// invalid.
pub fn parse_file(path: impl AsRef<Path>) -> Result<model::Interface, parser::ParseError> {
    parse_file_with(path, parser::ParserConfig::default())
}

/// Parses an interface document file with a custom configuration.
///
/// # Errors
/// Returns `ParseError` if the file cannot be read or the document is
/// invalid.
pub fn parse_file_with(
    path: impl AsRef<Path>,
    config: parser::ParserConfig,
) -> Result<model::Interface, parser::ParseError> {
    let path = path.as_ref();
    match parser::Parser::new(config).parse_file(path) {
        Ok(interface) => {
            tracing::info!(
                path = %path.display(),
                functions = interface.function_count(),
                "parsed interface"
            );
            Ok(interface)
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to parse interface");
            Err(e)
        }
    }
}

/// Parses an interface document from a string with the default configuration.
///
/// # Errors
/// Returns `ParseError` if the document is invalid.
pub fn parse_str(xml: &str) -> Result<model::Interface, parser::ParseError> {
    parser::parse_interface(xml)
}
