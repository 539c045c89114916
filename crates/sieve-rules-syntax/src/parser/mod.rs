//! # Parser - Event-Based Tree Construction
//!
//! This module implements the block recognizer, transforming a token stream
//! into a lossless syntax tree using the **event-based** architecture from
//! rust-analyzer.
//!
//! ## The Event Model
//!
//! Parsing produces a flat list of events:
//! ```text
//! Start(RULE)
//!   Token(IDENT)        "if"
//!   Token(WHITESPACE)
//!   Start(TEST) ... Finish
//!   ...
//! Finish
//! ```
//!
//! The [`Sink`] processes these in order, calling `start_node()` for Start,
//! `token()` for Token, and `finish_node()` for Finish.
//!
//! ## Markers
//!
//! `parser.start()` returns a [`Marker`] which **must** be completed with
//! `marker.complete(parser, KIND)` or dropped with `marker.abandon(parser)`.
//! Dropping it otherwise panics, which catches grammar bugs early.
//!
//! ## Commit Points
//!
//! Classifying an `if` block is all-or-nothing. Before trying, the grammar
//! takes a [`Checkpoint`]; if any part of the block turns out to be
//! unsupported it calls [`Parser::rewind`], which drops every event emitted
//! since the checkpoint and moves the cursor back. The same tokens are then
//! consumed again as a verbatim `RAW_BLOCK`. No partially classified rule ever
//! reaches the tree.
//!
//! ```
//! use sieve_rules_syntax::{parse, SyntaxKind};
//!
//! let tree = parse("if size :over 1M { discard; }\n");
//! let raw = tree.children().next().unwrap();
//! assert_eq!(raw.kind(), SyntaxKind::RAW_BLOCK);
//! ```
//!
//! ## Module Structure
//!
//! - [`event`] - The Event enum
//! - [`sink`] - Converts events to Rowan tree
//! - `grammar` - Top-level, test and action rules

pub mod event;
pub mod sink;

mod grammar;

use crate::lexer::{Token, lex};
use crate::syntax_kind::{SyntaxKind, SyntaxNode};
use event::Event;
use sink::Sink;

pub use grammar::Unsupported;

/// The parser state machine.
///
/// Holds the token stream, current position, and accumulated events.
/// Grammar functions receive `&mut Parser` and use its methods to:
///
/// - Inspect tokens: `current()`, `nth()`, `at()`, `at_end()`
/// - Consume tokens: `bump()`, `eat()`
/// - Build structure: `start()` → `Marker` → `complete()`/`abandon()`
/// - Back out of a failed classification: `checkpoint()` → `rewind()`
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    pos: usize,
    events: Vec<Event>,
}

/// A commit point in the token stream and event list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pos: usize,
    events: usize,
}

impl<'t, 'input> Parser<'t, 'input> {
    /// Create a new parser from a slice of tokens.
    pub fn new(tokens: &'t [Token<'input>]) -> Self {
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
        }
    }

    /// Parse the tokens and return a syntax tree.
    pub fn parse(mut self) -> SyntaxNode {
        grammar::root(&mut self);
        let sink = Sink::new(self.tokens, self.events);
        sink.finish()
    }

    /// Start a new node and return a marker.
    pub fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Placeholder);
        Marker {
            pos,
            completed: false,
        }
    }

    /// Remember the current position so a failed attempt can be undone.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            events: self.events.len(),
        }
    }

    /// Return to `checkpoint`, discarding every event emitted since.
    ///
    /// Markers started after the checkpoint must be abandoned first.
    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        debug_assert!(checkpoint.pos <= self.pos);
        self.pos = checkpoint.pos;
        self.events.truncate(checkpoint.events);
    }

    /// Current token kind, or EOF if past end.
    pub fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Look ahead n tokens.
    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    /// Look ahead n tokens, returning the whole token.
    pub fn nth_token(&self, n: usize) -> Option<&Token<'input>> {
        self.tokens.get(self.pos + n)
    }

    /// Check if at end of input.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Check if current token is of given kind.
    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Check if current token is the given keyword (case-insensitive).
    pub fn at_keyword(&self, keyword: &str) -> bool {
        self.nth_token(0).is_some_and(|t| t.is_keyword(keyword))
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume any whitespace and newlines.
    pub fn eat_trivia(&mut self) {
        while self.current().is_trivia() {
            self.bump();
        }
    }

    /// Consume the current token unconditionally.
    pub fn bump(&mut self) {
        if !self.at_end() {
            let kind = self.current();
            self.events.push(Event::token(kind));
            self.pos += 1;
        }
    }

    /// Get the text of the current token.
    pub fn current_text(&self) -> &'input str {
        self.tokens.get(self.pos).map(|t| t.text).unwrap_or("")
    }

    /// Check if we're at the start of a line (after newline or at start).
    pub fn at_line_start(&self) -> bool {
        if self.pos == 0 {
            return true;
        }
        self.tokens
            .get(self.pos - 1)
            .map(|t| t.kind == SyntaxKind::NEWLINE)
            .unwrap_or(false)
    }

    /// Offset of the first token at or after `n` that is not horizontal whitespace.
    pub fn skip_whitespace_from(&self, n: usize) -> usize {
        let mut i = n;
        while self.nth(i) == SyntaxKind::WHITESPACE {
            i += 1;
        }
        i
    }
}

/// A marker for a node being constructed.
///
/// When you call `parser.start()`, a `Placeholder` event is pushed and you
/// get a `Marker` pointing to it. Every marker must be either:
///
/// - **Completed** via `marker.complete(parser, KIND)` - converts the
///   placeholder to a `Start` event and pushes a `Finish` event
/// - **Abandoned** via `marker.abandon(parser)` - removes the placeholder
///   (only works if nothing was pushed after it)
///
/// Dropping a marker without doing either panics.
#[must_use = "Markers must be completed or abandoned, dropping them is a bug"]
pub struct Marker {
    /// Position in the events vector where our Placeholder lives
    pos: usize,
    /// Tracks whether complete() or abandon() was called
    completed: bool,
}

impl Marker {
    /// Complete this marker, creating a node of the given kind.
    pub fn complete(mut self, p: &mut Parser<'_, '_>, kind: SyntaxKind) {
        self.completed = true;
        let event_at_pos = &mut p.events[self.pos];
        assert!(matches!(event_at_pos, Event::Placeholder));
        *event_at_pos = Event::start(kind);
        p.events.push(Event::Finish);
    }

    /// Abandon this marker without creating a node.
    ///
    /// **Note**: This only removes the placeholder if it's the last event.
    /// If other events were pushed after `start()`, the placeholder becomes
    /// inert and is ignored by the Sink (or is truncated by a rewind).
    pub fn abandon(mut self, p: &mut Parser<'_, '_>) {
        self.completed = true;
        if self.pos + 1 == p.events.len() {
            match p.events.pop() {
                Some(Event::Placeholder) => {}
                _ => unreachable!(),
            }
        }
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        if !self.completed && !std::thread::panicking() {
            panic!("Marker must be either completed or abandoned");
        }
    }
}

/// Parse Sieve source into a lossless syntax tree.
pub fn parse(source: &str) -> SyntaxNode {
    let tokens = lex(source);
    let parser = Parser::new(&tokens);
    parser.parse()
}
