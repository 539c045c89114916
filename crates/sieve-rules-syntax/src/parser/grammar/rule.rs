//! The supported `if` shape.
//!
//! ```text
//! if TEST { ACTION; ... }
//! if anyof|allof (TEST, ...) { ACTION; ... }
//!
//! TEST   = [not] LEAF | not ( LEAF )
//! LEAF   = header|address :contains|:is|:matches|:regex "name" "value"
//! ACTION = fileinto [:copy] "folder" | redirect "addr" | addflag "flag"
//!        | reject "message" | keep | discard | stop
//! ```
//!
//! Anything outside this shape (other tests, comparators, string lists,
//! nested blocks, comments inside the rule, `elsif`/`else`) is reported as
//! [`Unsupported`] and the whole statement stays raw.

use super::{Classify, Unsupported, end_of_line, expect, node, string};
use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

const MATCH_TAGS: [&str; 4] = ["contains", "is", "matches", "regex"];

/// An `if` statement with no trailing branches, up to its line end.
pub(super) fn if_statement(p: &mut Parser<'_, '_>) -> Classify {
    if !p.at_keyword("if") {
        return Err(Unsupported("expected if"));
    }
    p.bump();
    p.eat_trivia();

    condition(p)?;
    p.eat_trivia();
    block(p)?;

    if branch_follows(p).is_some() {
        return Err(Unsupported("elsif/else branch"));
    }
    end_of_line(p, "code after closing brace")
}

/// Offset of an `elsif`/`else` keyword following the current position,
/// skipping whitespace and comments.
pub(super) fn branch_follows(p: &Parser<'_, '_>) -> Option<usize> {
    let mut i = 0;
    while p.nth(i).is_trivia() || p.nth(i).is_comment() {
        i += 1;
    }
    p.nth_token(i)
        .filter(|t| t.is_keyword("elsif") || t.is_keyword("else"))
        .map(|_| i)
}

fn condition(p: &mut Parser<'_, '_>) -> Classify {
    if !(p.at_keyword("anyof") || p.at_keyword("allof")) {
        return test(p);
    }

    node(p, SyntaxKind::TEST_LIST, |p| {
        p.bump();
        p.eat_trivia();
        expect(p, SyntaxKind::L_PAREN, "test list without parentheses")?;
        loop {
            p.eat_trivia();
            test(p)?;
            p.eat_trivia();
            if !p.eat(SyntaxKind::COMMA) {
                return expect(p, SyntaxKind::R_PAREN, "malformed test list");
            }
        }
    })
}

fn test(p: &mut Parser<'_, '_>) -> Classify {
    if !p.at_keyword("not") {
        return leaf(p);
    }

    node(p, SyntaxKind::NOT_TEST, |p| {
        p.bump();
        p.eat_trivia();
        if p.eat(SyntaxKind::L_PAREN) {
            p.eat_trivia();
            leaf(p)?;
            p.eat_trivia();
            expect(p, SyntaxKind::R_PAREN, "unbalanced parentheses")
        } else {
            leaf(p)
        }
    })
}

fn leaf(p: &mut Parser<'_, '_>) -> Classify {
    node(p, SyntaxKind::TEST, |p| {
        if p.at_keyword("anyof") || p.at_keyword("allof") {
            return Err(Unsupported("nested test list"));
        }
        if !(p.at_keyword("header") || p.at_keyword("address")) {
            return Err(Unsupported("unsupported test"));
        }
        p.bump();
        p.eat_trivia();

        let supported_tag = p
            .nth_token(0)
            .is_some_and(|t| MATCH_TAGS.iter().any(|tag| t.is_tag(tag)));
        if !supported_tag {
            return Err(Unsupported("unsupported match type, comparator or address part"));
        }
        p.bump();
        p.eat_trivia();

        string(p)?;
        p.eat_trivia();
        string(p)
    })
}

fn block(p: &mut Parser<'_, '_>) -> Classify {
    node(p, SyntaxKind::BLOCK, |p| {
        expect(p, SyntaxKind::L_BRACE, "expected block")?;
        loop {
            p.eat_trivia();
            match p.current() {
                SyntaxKind::R_BRACE => {
                    p.bump();
                    return Ok(());
                }
                SyntaxKind::EOF => return Err(Unsupported("unterminated block")),
                kind if kind.is_comment() => return Err(Unsupported("comment inside block")),
                _ => action(p)?,
            }
        }
    })
}

fn action(p: &mut Parser<'_, '_>) -> Classify {
    node(p, SyntaxKind::ACTION, |p| {
        let Some(command) = p.nth_token(0) else {
            return Err(Unsupported("unterminated block"));
        };

        let takes_string = ["fileinto", "redirect", "addflag", "reject"]
            .iter()
            .any(|name| command.is_keyword(name));
        let bare = ["keep", "discard", "stop"]
            .iter()
            .any(|name| command.is_keyword(name));
        let is_fileinto = command.is_keyword("fileinto");

        if command.is_keyword("if") {
            return Err(Unsupported("nested if"));
        }
        if !(takes_string || bare) {
            return Err(Unsupported("unsupported action"));
        }

        p.bump();
        p.eat_trivia();

        if is_fileinto && p.nth_token(0).is_some_and(|t| t.is_tag("copy")) {
            p.bump();
            p.eat_trivia();
        }
        if takes_string {
            string(p)?;
            p.eat_trivia();
        }

        expect(p, SyntaxKind::SEMICOLON, "action without semicolon")
    })
}
