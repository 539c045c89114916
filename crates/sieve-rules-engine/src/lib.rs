//! # sieve-rules-engine
//!
//! The structured side of the Sieve transform: a [`ScriptModel`] of rules and
//! raw blocks, lifted from the syntax tree ([`parse_script`]), rendered back
//! to text ([`generate`]), and mapped to and from the UI's JSON document
//! ([`to_json`], [`from_json`]).
//!
//! ```
//! use sieve_rules_engine::{generate, parse_script};
//!
//! let source = "if anyof (address :contains \"from\" \"github.com\") {\n    fileinto \"GitHub\";\n}\n";
//! let model = parse_script(source);
//! assert_eq!(model.rules().len(), 1);
//! assert!(generate(&model).starts_with("require [\"fileinto\"];\n\n"));
//! ```

pub mod document;
pub mod generating;
pub mod io;
pub mod models;
pub mod parsing;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use document::{Document, DocumentError, from_document, from_json, to_document, to_json};
pub use generating::{GeneratorOptions, generate, generate_with, required_extensions};
pub use io::*;
pub use models::*;
pub use parsing::parse_script;
