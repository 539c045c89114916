//! Top-level items.
//!
//! Items are only classified when they begin at the start of a line. A line
//! that is none of require, rule or disabled rule becomes a `RAW_BLOCK`, and
//! so does anything a classifier gives up on.

use super::{Classify, Unsupported, end_of_line, expect, finish, node, rule, string};
use crate::conventions::{self, DISABLED_BEGIN, DISABLED_END};
use crate::lexer::lex;
use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse one top-level item.
pub(super) fn item(p: &mut Parser<'_, '_>) {
    // Line breaks and whitespace-only lines sit directly under ROOT
    if p.at(SyntaxKind::NEWLINE) || at_blank_whitespace(p) {
        p.bump();
        return;
    }

    if p.at_line_start() && classified(p) {
        return;
    }

    raw_line(p);
}

fn at_blank_whitespace(p: &Parser<'_, '_>) -> bool {
    p.at(SyntaxKind::WHITESPACE) && matches!(p.nth(1), SyntaxKind::NEWLINE | SyntaxKind::EOF)
}

/// What a name comment sits above.
enum Named {
    Rule,
    Disabled,
}

fn classified(p: &mut Parser<'_, '_>) -> bool {
    let first = p.skip_whitespace_from(0);
    let Some(token) = p.nth_token(first) else {
        return false;
    };

    if token.is_keyword("require") {
        return attempt(p, SyntaxKind::REQUIRE, require_body, "require line");
    }

    if token.is_keyword("if") {
        if !attempt(p, SyntaxKind::RULE, |p| rule_item(p, false), "if block") {
            raw_if_chain(p);
        }
        return true;
    }

    if token.kind == SyntaxKind::COMMENT {
        if first == 0 && conventions::is_marker(token.text, DISABLED_BEGIN) {
            return attempt(
                p,
                SyntaxKind::DISABLED_RULE,
                |p| disabled_body(p, false),
                "disabled block",
            );
        }

        if conventions::comment_name(token.text).is_some() {
            return match named_target(p, first) {
                Some(Named::Rule) => {
                    attempt(p, SyntaxKind::RULE, |p| rule_item(p, true), "named if block")
                }
                Some(Named::Disabled) => attempt(
                    p,
                    SyntaxKind::DISABLED_RULE,
                    |p| disabled_body(p, true),
                    "named disabled block",
                ),
                None => false,
            };
        }
    }

    false
}

/// Try `body` as a node of `kind`; rewind and log on failure.
fn attempt(
    p: &mut Parser<'_, '_>,
    kind: SyntaxKind,
    body: impl FnOnce(&mut Parser<'_, '_>) -> Classify,
    what: &str,
) -> bool {
    let cp = p.checkpoint();
    let m = p.start();
    match finish(p, m, kind, body) {
        Ok(()) => true,
        Err(reason) => {
            p.rewind(cp);
            log::debug!("{what} kept verbatim: {reason}");
            false
        }
    }
}

/// Look past a name comment at `first` for the rule it names.
fn named_target(p: &Parser<'_, '_>, first: usize) -> Option<Named> {
    let eol = p.skip_whitespace_from(first + 1);
    if p.nth(eol) != SyntaxKind::NEWLINE {
        return None;
    }

    let next = eol + 1;
    let marker = p
        .nth_token(next)
        .is_some_and(|t| t.kind == SyntaxKind::COMMENT && conventions::is_marker(t.text, DISABLED_BEGIN));
    if marker {
        return Some(Named::Disabled);
    }

    let keyword = p.skip_whitespace_from(next);
    p.nth_token(keyword)
        .is_some_and(|t| t.is_keyword("if"))
        .then_some(Named::Rule)
}

/// A comment line naming the item below it.
fn name_line(p: &mut Parser<'_, '_>) -> Classify {
    node(p, SyntaxKind::RULE_NAME, |p| {
        expect(p, SyntaxKind::COMMENT, "expected a name comment")
    })?;
    end_of_line(p, "name comment followed by code")?;
    expect(p, SyntaxKind::NEWLINE, "name comment at end of input")
}

fn rule_item(p: &mut Parser<'_, '_>, named: bool) -> Classify {
    p.eat(SyntaxKind::WHITESPACE);
    if named {
        name_line(p)?;
        p.eat(SyntaxKind::WHITESPACE);
    }
    rule::if_statement(p)
}

fn require_body(p: &mut Parser<'_, '_>) -> Classify {
    p.eat(SyntaxKind::WHITESPACE);
    p.bump();
    p.eat_trivia();

    if p.at(SyntaxKind::L_BRACKET) {
        string_list(p)?;
    } else {
        string(p)?;
    }

    p.eat_trivia();
    expect(p, SyntaxKind::SEMICOLON, "require without semicolon")?;
    end_of_line(p, "code after require")
}

fn string_list(p: &mut Parser<'_, '_>) -> Classify {
    node(p, SyntaxKind::STRING_LIST, |p| {
        p.bump();
        loop {
            p.eat_trivia();
            string(p)?;
            p.eat_trivia();
            if !p.eat(SyntaxKind::COMMA) {
                return expect(p, SyntaxKind::R_BRACKET, "malformed string list");
            }
        }
    })
}

fn disabled_body(p: &mut Parser<'_, '_>, named: bool) -> Classify {
    if named {
        p.eat(SyntaxKind::WHITESPACE);
        name_line(p)?;
    }

    let at_begin = p
        .nth_token(0)
        .is_some_and(|t| t.kind == SyntaxKind::COMMENT && conventions::is_marker(t.text, DISABLED_BEGIN));
    if !at_begin {
        return Err(Unsupported("missing disabled marker"));
    }
    p.bump();
    expect(p, SyntaxKind::NEWLINE, "empty disabled block")?;

    // An end marker only closes the block once the lines above it form a
    // rule; before that it is part of a string spanning lines
    let mut lines = Vec::new();
    loop {
        if !p.at(SyntaxKind::COMMENT) {
            return Err(Unsupported("disabled line without # at column 0"));
        }
        let text = p.current_text();
        p.bump();
        if conventions::is_marker(text, DISABLED_END)
            && holds_single_rule(&conventions::disabled_interior(lines.iter().copied()))
        {
            return Ok(());
        }
        lines.push(text);
        if !p.eat(SyntaxKind::NEWLINE) {
            return Err(Unsupported("disabled block does not hold one supported rule"));
        }
    }
}

/// Whether `text` is exactly one supported rule, surrounded by trivia.
fn holds_single_rule(text: &str) -> bool {
    let tokens = lex(text);
    let mut sub = Parser::new(&tokens);
    sub.eat_trivia();
    let supported = rule::if_statement(&mut sub).is_ok();
    sub.eat_trivia();
    supported && sub.at_end()
}

/// Everything up to the end of the line, continuing while braces are open.
fn raw_line(p: &mut Parser<'_, '_>) {
    let m = p.start();
    let mut depth = 0usize;

    while !p.at_end() {
        match p.current() {
            SyntaxKind::NEWLINE if depth == 0 => break,
            SyntaxKind::L_BRACE => depth += 1,
            SyntaxKind::R_BRACE => depth = depth.saturating_sub(1),
            _ => {}
        }
        p.bump();
    }

    m.complete(p, SyntaxKind::RAW_BLOCK);
}

/// An unsupported `if`, with every `elsif`/`else` branch that follows it.
fn raw_if_chain(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.eat(SyntaxKind::WHITESPACE);

    loop {
        p.bump();
        skip_branch(p);
        match rule::branch_follows(p) {
            Some(offset) => {
                for _ in 0..offset {
                    p.bump();
                }
            }
            None => break,
        }
    }

    if at_blank_whitespace(p) {
        p.bump();
    }
    m.complete(p, SyntaxKind::RAW_BLOCK);
}

/// Skip a branch's test and block.
fn skip_branch(p: &mut Parser<'_, '_>) {
    let mut depth = 0usize;
    while !p.at_end() {
        match p.current() {
            SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET => depth += 1,
            SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET => depth = depth.saturating_sub(1),
            SyntaxKind::SEMICOLON if depth == 0 => {
                p.bump();
                return;
            }
            SyntaxKind::L_BRACE => {
                skip_braces(p);
                return;
            }
            _ => {}
        }
        p.bump();
    }
}

fn skip_braces(p: &mut Parser<'_, '_>) {
    let mut depth = 0usize;
    while !p.at_end() {
        match p.current() {
            SyntaxKind::L_BRACE => depth += 1,
            SyntaxKind::R_BRACE => depth = depth.saturating_sub(1),
            _ => {}
        }
        p.bump();
        if depth == 0 {
            return;
        }
    }
}
