//! # sieve-rules-syntax
//!
//! A lossless Sieve (RFC 5228) syntax tree using [Rowan] + [Logos], following
//! the [rust-analyzer] architecture model.
//!
//! [Rowan]: https://docs.rs/rowan
//! [Logos]: https://docs.rs/logos
//! [rust-analyzer]: https://rust-analyzer.github.io/book/contributing/syntax.html
//!
//! ## What this crate recognizes
//!
//! This is not a full Sieve parser. It splits a script into top-level items
//! and classifies each one:
//!
//! - `REQUIRE` - a `require` line
//! - `RULE` - an `if` statement in the simple shape a rule editor can model,
//!   optionally named by the comment line above it
//! - `DISABLED_RULE` - a rule commented out with the `# [disabled]` markers
//!   (see [`conventions`])
//! - `RAW_BLOCK` - everything else, kept byte for byte
//!
//! Because the tree is lossless, `tree.text()` always equals the input, and
//! anything not understood survives untouched.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Rowan Tree
//!               (Logos)          (Grammar)        (GreenNodeBuilder)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! Every character becomes part of some token. Strings, comments and
//! `text:` literals are single tokens, so braces inside them never confuse
//! the recognizer.
//!
//! ### 2. Parser ([`parser`] module)
//!
//! The parser consumes tokens and emits **events** (Start, Token, Finish).
//! Classification is all-or-nothing: the grammar takes a checkpoint before
//! trying a rule and rewinds if anything turns out to be unsupported.
//!
//! ### 3. Sink ([`parser::sink`] module)
//!
//! The sink consumes events and builds a Rowan green tree using
//! `GreenNodeBuilder`.
//!
//! ## Module Structure
//!
//! ```text
//! sieve-rules-syntax/
//! ├── lib.rs           # This file - public API and integration tests
//! ├── syntax_kind.rs   # SyntaxKind enum (tokens + nodes) and Rowan integration
//! ├── lexer.rs         # Logos-based tokenizer, string escapes
//! ├── conventions.rs   # Rule-name and disabled-rule comment conventions
//! └── parser/
//!     ├── mod.rs       # Parser struct, Marker, Checkpoint, parse()
//!     ├── event.rs     # Event enum (Start, Token, Finish, Placeholder)
//!     ├── sink.rs      # Converts events to Rowan GreenNode
//!     └── grammar/
//!         ├── mod.rs       # Root parsing, shared helpers
//!         ├── top_level.rs # Require, rules, disabled rules, raw text
//!         └── rule.rs      # Tests and actions
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use sieve_rules_syntax::{parse, SyntaxKind};
//!
//! let source = "require \"fileinto\";\n\nif header :is \"to\" \"me\" { fileinto \"Me\"; }\n";
//! let tree = parse(source);
//!
//! // The tree preserves all text
//! assert_eq!(tree.text().to_string(), source);
//!
//! let kinds: Vec<_> = tree.children().map(|n| n.kind()).collect();
//! assert_eq!(kinds, vec![SyntaxKind::REQUIRE, SyntaxKind::RULE]);
//! ```

pub mod conventions;
pub mod lexer;
pub mod parser;
pub mod syntax_kind;

pub use parser::{Unsupported, parse};
pub use syntax_kind::{SieveLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
