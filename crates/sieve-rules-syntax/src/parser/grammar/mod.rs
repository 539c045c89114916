//! # Grammar Rules
//!
//! Each function takes a `&mut Parser` and uses its methods to:
//!
//! 1. Inspect the current token (`p.current()`, `p.at()`, `p.nth()`)
//! 2. Consume tokens (`p.bump()`, `p.eat()`)
//! 3. Build tree structure (`p.start()` → marker → `complete()`/`abandon()`)
//!
//! ## Module Structure
//!
//! - [`top_level`] - Root items: require lines, rules, disabled rules, raw text
//! - [`rule`] - The supported `if` shape: tests and actions
//!
//! ## Classification
//!
//! Everything at the top level is one of two things: a construct the model
//! understands, or a `RAW_BLOCK` carried byte for byte. Classifying functions
//! return `Result<(), Unsupported>`; on `Err` the caller rewinds to its
//! checkpoint and consumes the same tokens again as raw text. Nothing is
//! ever reported as a parse error.
//!
//! ```ignore
//! fn try_rule(p: &mut Parser) -> bool {
//!     let cp = p.checkpoint();
//!     let m = p.start();
//!     match rule::rule_body(p, false) {
//!         Ok(()) => { m.complete(p, SyntaxKind::RULE); true }
//!         Err(_) => { m.abandon(p); p.rewind(cp); false }
//!     }
//! }
//! ```

mod rule;
mod top_level;

use std::fmt;

use crate::parser::{Marker, Parser};
use crate::syntax_kind::SyntaxKind;

/// Why a construct was kept verbatim instead of being modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unsupported(pub &'static str);

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for Unsupported {}

type Classify = Result<(), Unsupported>;

/// Parse the root document.
///
/// This is the entry point for parsing. It creates a ROOT node containing
/// all top-level items in source order.
pub fn root(p: &mut Parser<'_, '_>) {
    let m = p.start();

    while !p.at_end() {
        top_level::item(p);
    }

    m.complete(p, SyntaxKind::ROOT);
}

/// Run `body` inside a node of `kind`, dropping the node if it fails.
fn node(
    p: &mut Parser<'_, '_>,
    kind: SyntaxKind,
    body: impl FnOnce(&mut Parser<'_, '_>) -> Classify,
) -> Classify {
    let m = p.start();
    finish(p, m, kind, body)
}

fn finish(
    p: &mut Parser<'_, '_>,
    m: Marker,
    kind: SyntaxKind,
    body: impl FnOnce(&mut Parser<'_, '_>) -> Classify,
) -> Classify {
    match body(p) {
        Ok(()) => {
            m.complete(p, kind);
            Ok(())
        }
        Err(reason) => {
            m.abandon(p);
            Err(reason)
        }
    }
}

/// Consume a token of `kind` or fail with `reason`.
fn expect(p: &mut Parser<'_, '_>, kind: SyntaxKind, reason: &'static str) -> Classify {
    if p.eat(kind) {
        Ok(())
    } else {
        Err(Unsupported(reason))
    }
}

/// Consume a quoted string whose value the model can represent.
fn string(p: &mut Parser<'_, '_>) -> Classify {
    match p.current() {
        SyntaxKind::STRING if crate::lexer::string_value(p.current_text()).is_some() => {
            p.bump();
            Ok(())
        }
        SyntaxKind::STRING => Err(Unsupported("string with unsupported escapes")),
        SyntaxKind::MULTILINE_STRING => Err(Unsupported("multi-line string")),
        SyntaxKind::L_BRACKET => Err(Unsupported("string list argument")),
        _ => Err(Unsupported("expected a quoted string")),
    }
}

/// Consume the rest of the line: optional whitespace, then NEWLINE or EOF.
///
/// The NEWLINE itself is left for the caller.
fn end_of_line(p: &mut Parser<'_, '_>, reason: &'static str) -> Classify {
    p.eat(SyntaxKind::WHITESPACE);
    if matches!(p.current(), SyntaxKind::NEWLINE | SyntaxKind::EOF) {
        Ok(())
    } else {
        Err(Unsupported(reason))
    }
}
