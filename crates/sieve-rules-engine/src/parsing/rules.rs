//! Lifting `RULE` and `DISABLED_RULE` nodes into [`Rule`]s.
//!
//! The grammar only produces these nodes for the supported shape, so lifting
//! mostly reads tokens off in order. It still returns `Option` rather than
//! trusting the tree; the caller keeps a node it can't lift as raw text.

use sieve_rules_syntax::conventions;
use sieve_rules_syntax::lexer::string_value;
use sieve_rules_syntax::{SyntaxKind, SyntaxNode, SyntaxToken};

use crate::models::{Action, Condition, MatchKind, MatchType, Rule};

pub(super) fn lift_rule(node: &SyntaxNode) -> Option<Rule> {
    let mut rule = Rule::new(MatchKind::AllOf);
    rule.name = rule_name(node);

    for child in node.children() {
        match child.kind() {
            SyntaxKind::TEST_LIST => {
                let keyword = significant_tokens(&child).next()?;
                rule.match_kind = MatchKind::from_keyword(keyword.text())?;
                for test in child.children() {
                    rule.conditions.push(lift_condition(&test)?);
                }
            }
            SyntaxKind::TEST | SyntaxKind::NOT_TEST => {
                rule.conditions.push(lift_condition(&child)?);
            }
            SyntaxKind::BLOCK => {
                for action in child.children() {
                    rule.actions.push(lift_action(&action)?);
                }
            }
            _ => {}
        }
    }

    (!rule.conditions.is_empty()).then_some(rule)
}

/// Unwrap a disabled rule and lift the rule inside it.
pub(super) fn lift_disabled(node: &SyntaxNode) -> Option<Rule> {
    let comments: Vec<SyntaxToken> = node
        .children_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| token.kind() == SyntaxKind::COMMENT)
        .collect();

    // First and last comments are the markers
    let interior = comments.get(1..comments.len().checked_sub(1)?)?;
    let source = conventions::disabled_interior(interior.iter().map(|t| t.text()));

    let inner = sieve_rules_syntax::parse(&source);
    let rule_node = inner
        .children()
        .find(|child| child.kind() == SyntaxKind::RULE)?;

    let mut rule = lift_rule(&rule_node)?;
    rule.enabled = false;
    rule.name = rule_name(node);
    Some(rule)
}

fn rule_name(node: &SyntaxNode) -> Option<String> {
    let name = node
        .children()
        .find(|child| child.kind() == SyntaxKind::RULE_NAME)?;
    let comment = significant_tokens(&name).next()?;
    conventions::comment_name(comment.text())
}

fn lift_condition(node: &SyntaxNode) -> Option<Condition> {
    let (negate, test) = match node.kind() {
        SyntaxKind::NOT_TEST => (
            true,
            node.children()
                .find(|child| child.kind() == SyntaxKind::TEST)?,
        ),
        SyntaxKind::TEST => (false, node.clone()),
        _ => return None,
    };

    let mut tokens = significant_tokens(&test);
    let command = tokens.next()?;
    let tag = tokens.next()?;
    let header = string_value(tokens.next()?.text())?;
    let value = string_value(tokens.next()?.text())?;

    Some(Condition {
        header,
        match_type: MatchType::from_tag(tag.text().strip_prefix(':')?)?,
        value,
        address_test: command.text().eq_ignore_ascii_case("address"),
        negate,
    })
}

fn lift_action(node: &SyntaxNode) -> Option<Action> {
    let tokens: Vec<SyntaxToken> = significant_tokens(node).collect();
    let command = tokens.first()?.text().to_ascii_lowercase();
    let copy = tokens.iter().any(|t| {
        t.kind() == SyntaxKind::TAG && t.text()[1..].eq_ignore_ascii_case("copy")
    });
    let argument = || {
        tokens
            .iter()
            .find(|t| t.kind() == SyntaxKind::STRING)
            .and_then(|t| string_value(t.text()))
    };

    let action = match command.as_str() {
        "fileinto" if copy => Action::FileIntoCopy {
            folder: argument()?,
        },
        "fileinto" => Action::FileInto {
            folder: argument()?,
        },
        "redirect" => Action::Redirect {
            address: argument()?,
        },
        "addflag" => Action::AddFlag { flag: argument()? },
        "reject" => Action::Reject {
            message: argument()?,
        },
        "keep" => Action::Keep,
        "discard" => Action::Discard,
        "stop" => Action::Stop,
        _ => return None,
    };
    Some(action)
}

/// Tokens of `node` that are not whitespace or line breaks.
fn significant_tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> {
    node.descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| !token.kind().is_trivia())
}
