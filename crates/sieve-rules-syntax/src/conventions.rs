//! Comment conventions shared by the recognizer and the generator.
//!
//! Two things live in comments rather than in Sieve syntax: rule names and
//! disabled rules. Both directions of the transform go through this module so
//! that parsing generated text always yields the same rule back.
//!
//! ## Rule names
//!
//! A `#` comment alone on the line directly above a rule names it:
//!
//! ```text
//! # GitHub notifications
//! if anyof (...) { ... }
//! ```
//!
//! Leading `#`s, surrounding whitespace and `-` decorators are stripped, so
//! `# --- GITHUB ---` names the rule `GITHUB`. Comments that are empty, made
//! only of decoration (`# =====`) or are disabled-rule markers never name a
//! rule.
//!
//! ## Disabled rules
//!
//! ```text
//! # [disabled]
//! #if allof (
//! #    header :contains "from" "spam"
//! #) {
//! #    discard;
//! #}
//! # [/disabled]
//! ```
//!
//! Both marker lines start at column 0 and must match exactly (trailing
//! whitespace aside). Every line between them starts with `#` at column 0;
//! dropping that single character restores the rule text. An end marker only
//! closes the block once the lines above it hold a whole rule, so a string
//! value may itself contain a line reading `[/disabled]`.

/// First line of a disabled rule.
pub const DISABLED_BEGIN: &str = "# [disabled]";

/// Last line of a disabled rule.
pub const DISABLED_END: &str = "# [/disabled]";

/// Check a comment token against a disabled-rule marker.
pub fn is_marker(comment: &str, marker: &str) -> bool {
    comment.trim_end() == marker
}

/// Derive a rule name from a `#` comment, if it can name a rule.
pub fn comment_name(comment: &str) -> Option<String> {
    if is_marker(comment, DISABLED_BEGIN) || is_marker(comment, DISABLED_END) {
        return None;
    }

    let body = comment.trim_start_matches('#').trim();
    let is_decoration = body
        .chars()
        .all(|c| matches!(c, '-' | '=' | '*' | '#') || c.is_whitespace());
    if is_decoration {
        return None;
    }

    let name = body.trim_start_matches('-').trim_end_matches('-').trim();
    Some(name.to_string())
}

/// Rebuild rule text from the comment lines between the disabled markers.
pub fn disabled_interior<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    let mut interior = String::new();
    for line in lines {
        interior.push_str(line.strip_prefix('#').unwrap_or(line));
        interior.push('\n');
    }
    interior
}

/// Wrap rule text in the disabled-rule convention, one comment line per line.
pub fn disable(rule_text: &str) -> String {
    let mut out = String::from(DISABLED_BEGIN);
    out.push('\n');
    for line in rule_text.lines() {
        out.push('#');
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(DISABLED_END);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("# GitHub", Some("GitHub"))]
    #[case("#   Spaced out   ", Some("Spaced out"))]
    #[case("# --- NEWSLETTERS ---", Some("NEWSLETTERS"))]
    #[case("## Nested hashes", Some("Nested hashes"))]
    #[case("# #1 priority", Some("#1 priority"))]
    #[case("#", None)]
    #[case("# ======", None)]
    #[case("# - - -", None)]
    #[case("# [disabled]", None)]
    #[case("# [/disabled]  ", None)]
    fn names_from_comments(#[case] comment: &str, #[case] expected: Option<&str>) {
        assert_eq!(comment_name(comment).as_deref(), expected);
    }

    #[test]
    fn disable_then_interior_restores_text() {
        let rule = "if allof (\n    header :is \"a\" \"b\"\n) {\n    stop;\n}";
        let wrapped = disable(rule);

        assert_eq!(
            wrapped,
            "# [disabled]\n#if allof (\n#    header :is \"a\" \"b\"\n#) {\n#    stop;\n#}\n# [/disabled]"
        );

        let lines: Vec<&str> = wrapped.lines().collect();
        let interior = disabled_interior(lines[1..lines.len() - 1].iter().copied());
        assert_eq!(interior, format!("{rule}\n"));
    }
}
