//! Which `require` capabilities a script needs.

use std::collections::BTreeSet;

use sieve_rules_syntax::SyntaxKind;
use sieve_rules_syntax::lexer::lex;

use crate::models::{Action, Item, MatchType, Rule, ScriptModel};

/// Extensions the generator infers by itself. Anything else named in a
/// source `require` is noted on the model instead.
pub const VOCABULARY: [&str; 5] = ["copy", "fileinto", "imap4flags", "regex", "reject"];

pub fn is_vocabulary(name: &str) -> bool {
    VOCABULARY.contains(&name)
}

/// Extensions implied by an enabled rule's conditions and actions.
pub fn rule_extensions(rule: &Rule) -> BTreeSet<&'static str> {
    let mut needed = BTreeSet::new();

    for action in &rule.actions {
        match action {
            Action::FileInto { .. } => {
                needed.insert("fileinto");
            }
            Action::FileIntoCopy { .. } => {
                needed.insert("fileinto");
                needed.insert("copy");
            }
            Action::AddFlag { .. } => {
                needed.insert("imap4flags");
            }
            Action::Reject { .. } => {
                needed.insert("reject");
            }
            Action::Redirect { .. } | Action::Keep | Action::Discard | Action::Stop => {}
        }
    }

    if rule
        .conditions
        .iter()
        .any(|c| c.match_type == MatchType::Regex)
    {
        needed.insert("regex");
    }

    needed
}

/// Vocabulary extensions used by code inside a raw block.
///
/// Words inside comments and strings don't count.
pub fn raw_extensions(text: &str) -> BTreeSet<&'static str> {
    let mut needed = BTreeSet::new();

    for token in lex(text) {
        let extension = match token.kind {
            SyntaxKind::IDENT => ident_extension(token.text),
            SyntaxKind::TAG => tag_extension(&token.text[1..]),
            _ => None,
        };
        if let Some(extension) = extension {
            needed.insert(extension);
        }
    }

    needed
}

fn ident_extension(ident: &str) -> Option<&'static str> {
    let ident = ident.to_ascii_lowercase();
    match ident.as_str() {
        "fileinto" => Some("fileinto"),
        "addflag" | "setflag" | "removeflag" | "hasflag" => Some("imap4flags"),
        "reject" => Some("reject"),
        _ => None,
    }
}

fn tag_extension(tag: &str) -> Option<&'static str> {
    if tag.eq_ignore_ascii_case("copy") {
        Some("copy")
    } else if tag.eq_ignore_ascii_case("regex") {
        Some("regex")
    } else if tag.eq_ignore_ascii_case("flags") {
        Some("imap4flags")
    } else {
        None
    }
}

/// Sorted, deduplicated `require` list for the whole script.
///
/// Disabled rules are comments in the output, so they contribute nothing.
pub fn required_extensions(model: &ScriptModel) -> BTreeSet<String> {
    let mut needed: BTreeSet<String> = model.noted_extensions().clone();

    for item in model.items() {
        let found = match item {
            Item::Rule(rule) if rule.enabled => rule_extensions(rule),
            Item::Rule(_) => BTreeSet::new(),
            Item::Raw(raw) => raw_extensions(raw.text()),
        };
        needed.extend(found.into_iter().map(str::to_string));
    }

    needed
}
