//! # Parsing - Sieve Text to Script Model
//!
//! The syntax crate classifies every top-level item of a script. This module
//! walks the resulting tree once and lifts it into a [`ScriptModel`]:
//!
//! - `REQUIRE` lines are dropped; the generator recomputes them. Names
//!   outside its own vocabulary are noted on the model so raw code that uses
//!   them keeps working.
//! - `RULE` and `DISABLED_RULE` nodes become [`Rule`]s.
//! - Runs of `RAW_BLOCK` nodes become one [`RawBlock`] each. A run is sliced
//!   straight from the source, from the first raw node's first byte to the
//!   last raw node's last byte, so blank lines inside it are kept. Line
//!   breaks at the very end of a run are separators too and are dropped.
//!
//! Blank lines between items are separators and are not stored anywhere.
//!
//! [`Rule`]: crate::models::Rule

mod rules;

#[cfg(test)]
mod tests;

use rowan::TextRange;
use sieve_rules_syntax::lexer::string_value;
use sieve_rules_syntax::{SyntaxKind, SyntaxNode};

use crate::generating::extensions;
use crate::models::{RawBlock, ScriptModel};

/// Parse script text into a model. Never fails: anything not understood
/// becomes a raw block.
pub fn parse_script(source: &str) -> ScriptModel {
    let tree = sieve_rules_syntax::parse(source);
    let mut builder = ModelBuilder::new(source);

    for node in tree.children() {
        match node.kind() {
            SyntaxKind::REQUIRE => builder.require(&node),
            SyntaxKind::RULE => match rules::lift_rule(&node) {
                Some(rule) => builder.rule(rule),
                None => builder.raw(&node),
            },
            SyntaxKind::DISABLED_RULE => match rules::lift_disabled(&node) {
                Some(rule) => builder.rule(rule),
                None => builder.raw(&node),
            },
            _ => builder.raw(&node),
        }
    }

    let model = builder.finish();
    log::trace!(
        "parsed script: {} rules, {} raw blocks",
        model.rules().len(),
        model.raw_blocks().len()
    );
    model
}

/// Accumulates the model while merging adjacent raw nodes.
struct ModelBuilder<'a> {
    source: &'a str,
    model: ScriptModel,
    pending_raw: Option<TextRange>,
}

impl<'a> ModelBuilder<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            model: ScriptModel::new(),
            pending_raw: None,
        }
    }

    fn raw(&mut self, node: &SyntaxNode) {
        let range = node.text_range();
        self.pending_raw = Some(match self.pending_raw {
            Some(pending) => pending.cover(range),
            None => range,
        });
    }

    fn rule(&mut self, rule: crate::models::Rule) {
        self.flush_raw();
        self.model.push_rule(rule);
    }

    fn require(&mut self, node: &SyntaxNode) {
        self.flush_raw();
        let names = node
            .descendants_with_tokens()
            .filter_map(|element| element.into_token())
            .filter(|token| token.kind() == SyntaxKind::STRING)
            .filter_map(|token| string_value(token.text()));

        for name in names {
            if !extensions::is_vocabulary(&name) {
                log::debug!("noting extension {name:?} for raw code");
                self.model.note_extension(name);
            }
        }
    }

    fn flush_raw(&mut self) {
        if let Some(range) = self.pending_raw.take() {
            let start = usize::from(range.start());
            let end = usize::from(range.end());
            // A run cut short by end of input can carry the final line breaks
            let text = self.source[start..end].trim_end_matches(['\r', '\n']);
            self.model.push_raw(RawBlock::new(text));
        }
    }

    fn finish(mut self) -> ScriptModel {
        self.flush_raw();
        self.model
    }
}
