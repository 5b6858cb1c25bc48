//! # ifgen Parser
//!
//! XML interface definition parser.
//!
//! This crate provides:
//! - Parsing of `<interface>` documents into an [`Interface`](ifgen_model::Interface)
//! - Two-pass name resolution, so declaration order does not matter
//! - Typed default values and enum subsets
//! - Strict or lenient handling of unknown attributes and elements

pub mod attrs;
pub mod config;
pub mod error;
pub mod parser;
pub mod xml;

#[cfg(test)]
mod fixture_tests;

pub use config::ParserConfig;
pub use error::{ErrorKind, ParseError};
pub use parser::{Parser, parse_interface};
pub use xml::{XmlElement, parse_document};
