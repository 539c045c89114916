//! # Generator - Script Model to Sieve Text
//!
//! Rendering is pure and deterministic. The layout is fixed:
//!
//! ```text
//! require ["fileinto", "imap4flags"];
//!
//! # GitHub
//! if anyof (
//!     address :contains "from" "github.com",
//!     not header :is "subject" "spam"
//! ) {
//!     fileinto "GitHub";
//!     stop;
//! }
//!
//! <raw block, verbatim>
//! ```
//!
//! Items are separated by one blank line and the text ends with a single
//! newline. Parsing this output and rendering it again gives the same text.

pub mod extensions;

use sieve_rules_syntax::conventions;
use sieve_rules_syntax::lexer::quote;

use crate::models::{Action, Condition, Item, Rule, ScriptModel};

pub use extensions::required_extensions;

/// Formatting knobs for generated rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Spaces per indentation level inside a rule
    pub indent: usize,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self { indent: 4 }
    }
}

impl GeneratorOptions {
    pub fn with_indent(indent: usize) -> Self {
        Self { indent }
    }
}

/// Render a model with default options.
pub fn generate(model: &ScriptModel) -> String {
    generate_with(model, &GeneratorOptions::default())
}

/// Render a model.
pub fn generate_with(model: &ScriptModel, options: &GeneratorOptions) -> String {
    let mut sections = Vec::with_capacity(model.order().len() + 1);

    let requires = required_extensions(model);
    if !requires.is_empty() {
        let names: Vec<String> = requires.iter().map(|name| quote(name)).collect();
        sections.push(format!("require [{}];", names.join(", ")));
    }

    for item in model.items() {
        sections.push(match item {
            Item::Rule(rule) => render_rule(rule, options),
            Item::Raw(raw) => raw.text().to_string(),
        });
    }

    if sections.is_empty() {
        return String::new();
    }

    let mut out = sections.join("\n\n");
    out.push('\n');
    log::trace!(
        "generated {} bytes from {} items",
        out.len(),
        model.order().len()
    );
    out
}

/// One rule, including its name line and disabled wrapper.
pub fn render_rule(rule: &Rule, options: &GeneratorOptions) -> String {
    let body = render_if(rule, options);
    let body = if rule.enabled {
        body
    } else {
        conventions::disable(&body)
    };

    match rule.name.as_deref().and_then(name_comment) {
        Some(line) => format!("{line}\n{body}"),
        None => body,
    }
}

/// The `# name` line for a rule name, if the name survives being read back.
fn name_comment(name: &str) -> Option<String> {
    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    let line = format!("# {collapsed}");
    conventions::comment_name(&line).map(|_| line)
}

fn render_if(rule: &Rule, options: &GeneratorOptions) -> String {
    let pad = " ".repeat(options.indent);
    let mut out = String::new();

    if rule.conditions.is_empty() {
        // Empty anyof is false, empty allof is true
        let constant = match rule.match_kind {
            crate::models::MatchKind::AnyOf => "false",
            crate::models::MatchKind::AllOf => "true",
        };
        out.push_str(&format!("if {constant} {{\n"));
    } else {
        out.push_str(&format!("if {} (\n", rule.match_kind.keyword()));
        let tests: Vec<String> = rule
            .conditions
            .iter()
            .map(|condition| format!("{pad}{}", render_condition(condition)))
            .collect();
        out.push_str(&tests.join(",\n"));
        out.push_str("\n) {\n");
    }

    for action in &rule.actions {
        out.push_str(&format!("{pad}{}\n", render_action(action)));
    }
    out.push('}');
    out
}

fn render_condition(condition: &Condition) -> String {
    format!(
        "{}{} :{} {} {}",
        if condition.negate { "not " } else { "" },
        if condition.address_test {
            "address"
        } else {
            "header"
        },
        condition.match_type.tag(),
        quote(&condition.header),
        quote(&condition.value),
    )
}

fn render_action(action: &Action) -> String {
    match action {
        Action::FileIntoCopy { folder } => format!("fileinto :copy {};", quote(folder)),
        other => match other.argument() {
            Some(argument) => format!("{} {};", other.command(), quote(argument)),
            None => format!("{};", other.command()),
        },
    }
}
