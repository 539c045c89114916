use pretty_assertions::assert_eq;
use rstest::rstest;

use super::parse_script;
use crate::generating::generate;
use crate::models::{Action, Condition, MatchKind, MatchType, OrderEntry, Rule, ScriptModel};

#[test]
fn github_example() {
    let model = parse_script(
        "if anyof (address :contains \"from\" \"github.com\") {\n    fileinto \"GitHub\";\n}",
    );

    assert_eq!(
        model.rules(),
        &[Rule::new(MatchKind::AnyOf)
            .when(Condition::address("from", MatchType::Contains, "github.com"))
            .then(Action::FileInto {
                folder: "GitHub".to_string()
            })]
    );
    assert!(model.raw_blocks().is_empty());
    assert_eq!(model.order(), &[OrderEntry::Rule(0)]);
}

#[test]
fn comment_between_rules() {
    let model = parse_script(
        "if header :is \"a\" \"b\" { keep; }\n# a note\n\nif header :is \"c\" \"d\" { stop; }\n",
    );

    assert_eq!(
        model.order(),
        &[OrderEntry::Rule(0), OrderEntry::Raw(0), OrderEntry::Rule(1)]
    );
    assert_eq!(model.raw_blocks()[0].text(), "# a note");
}

#[test]
fn blank_comment_between_back_to_back_rules() {
    let model = parse_script("if header :is \"a\" \"b\" { keep; }\n#\nif header :is \"c\" \"d\" { stop; }\n");

    assert_eq!(
        model.order(),
        &[OrderEntry::Rule(0), OrderEntry::Raw(0), OrderEntry::Rule(1)]
    );
    assert_eq!(model.raw_blocks()[0].text(), "#");
    assert_eq!(model.rules()[1].name, None);
}

#[test]
fn unsupported_if_demotes_whole_block() {
    let source = "if allof (size :over \"1M\") { discard; }";
    let model = parse_script(source);

    assert!(model.rules().is_empty());
    assert_eq!(model.raw_blocks().len(), 1);
    assert_eq!(model.raw_blocks()[0].text(), source);
}

#[test]
fn single_test_is_allof() {
    let model = parse_script("if not header :matches \"subject\" \"*[SPAM]*\" { discard; }\n");
    let rule = &model.rules()[0];

    assert_eq!(rule.match_kind, MatchKind::AllOf);
    assert!(rule.conditions[0].negate);
    assert_eq!(rule.conditions[0].match_type, MatchType::Matches);
    assert_eq!(rule.actions, vec![Action::Discard]);
}

#[test]
fn every_action_is_lifted() {
    let model = parse_script(
        r#"if header :is "x" "y" {
    fileinto "A";
    fileinto :copy "B";
    redirect "c@example.com";
    keep;
    discard;
    stop;
    addflag "\\Flagged";
    reject "Go \"away\"";
}
"#,
    );

    assert_eq!(
        model.rules()[0].actions,
        vec![
            Action::FileInto {
                folder: "A".to_string()
            },
            Action::FileIntoCopy {
                folder: "B".to_string()
            },
            Action::Redirect {
                address: "c@example.com".to_string()
            },
            Action::Keep,
            Action::Discard,
            Action::Stop,
            Action::AddFlag {
                flag: "\\Flagged".to_string()
            },
            Action::Reject {
                message: "Go \"away\"".to_string()
            },
        ]
    );
}

#[rstest]
#[case("# GitHub", Some("GitHub"))]
#[case("# --- NEWSLETTERS ---", Some("NEWSLETTERS"))]
#[case("## spaced  ", Some("spaced"))]
fn names_come_from_comment_above(#[case] comment: &str, #[case] expected: Option<&str>) {
    let model = parse_script(&format!("{comment}\nif header :is \"a\" \"b\" {{ keep; }}\n"));
    assert_eq!(model.rules()[0].name.as_deref(), expected);
    assert!(model.raw_blocks().is_empty());
}

#[test]
fn disabled_rule_is_lifted() {
    let model = parse_script(
        "# Spam\n# [disabled]\n#if allof (\n#    header :contains \"from\" \"spam\"\n#) {\n#    discard;\n#}\n# [/disabled]\n",
    );

    let rule = &model.rules()[0];
    assert!(!rule.enabled);
    assert_eq!(rule.name.as_deref(), Some("Spam"));
    assert_eq!(rule.match_kind, MatchKind::AllOf);
    assert_eq!(rule.actions, vec![Action::Discard]);
    assert!(model.raw_blocks().is_empty());
}

#[test]
fn require_is_recomputed_and_foreign_names_noted() {
    let model = parse_script(
        "require [\"fileinto\", \"vacation\", \"copy\"];\n\nif true {\n    vacation \"away\";\n}\n",
    );

    let noted: Vec<&str> = model.noted_extensions().iter().map(String::as_str).collect();
    assert_eq!(noted, vec!["vacation"]);
    assert_eq!(model.raw_blocks().len(), 1);
    assert_eq!(
        generate(&model),
        "require [\"vacation\"];\n\nif true {\n    vacation \"away\";\n}\n"
    );
}

#[test]
fn raw_run_keeps_interior_blank_lines() {
    let source = "\n\n  # first\n\nkeep; \n\n\nif header :is \"a\" \"b\" { stop; }\n\n";
    let model = parse_script(source);

    assert_eq!(model.raw_blocks()[0].text(), "  # first\n\nkeep; ");
    assert_eq!(model.order(), &[OrderEntry::Raw(0), OrderEntry::Rule(0)]);
}

#[test]
fn require_splits_raw_runs() {
    let model = parse_script("keep;\nrequire \"fileinto\";\nstop;\n");
    assert_eq!(model.raw_blocks().len(), 2);
    assert_eq!(model.raw_blocks()[1].text(), "stop;");
}

#[test]
fn elsif_chain_stays_together() {
    let source = "if header :is \"a\" \"b\" {\n    keep;\n} elsif header :is \"c\" \"d\" {\n    stop;\n}";
    let model = parse_script(source);

    assert!(model.rules().is_empty());
    assert_eq!(model.raw_blocks()[0].text(), source);
}

#[rstest]
#[case("")]
#[case("\n\n\n")]
#[case("   \n\t\n")]
fn blank_scripts_are_empty(#[case] source: &str) {
    let model = parse_script(source);
    assert!(model.is_empty());
    assert_eq!(generate(&model), "");
}

#[test]
fn removal_after_parse_preserves_order() {
    let mut model = parse_script(
        "if header :is \"a\" \"1\" { keep; }\nredirect \"x@y\";\nif header :is \"a\" \"2\" { keep; }\nif header :is \"a\" \"3\" { keep; }\n",
    );
    assert_eq!(
        model.order(),
        &[
            OrderEntry::Rule(0),
            OrderEntry::Raw(0),
            OrderEntry::Rule(1),
            OrderEntry::Rule(2)
        ]
    );

    model.remove_rule(1);

    assert_eq!(
        model.order(),
        &[OrderEntry::Rule(0), OrderEntry::Raw(0), OrderEntry::Rule(1)]
    );
    assert_eq!(model.rules()[1].conditions[0].value, "3");
}

#[rstest]
#[case::open_if_block("if exists \"x\" {\n    keep;\n\n", "if exists \"x\" {\n    keep;\n")]
#[case::open_brace_line("keep; {\n  stop;\n\n\n", "keep; {\n  stop;\n")]
#[case::open_string("keep;\n\"never closed", "keep;\n\"never closed\n")]
#[case::open_block_comment("keep;\n/* open comment\n\n", "keep;\n/* open comment\n")]
#[case::open_text_literal("vacation text:\nback soon\n", "vacation text:\nback soon\n")]
fn raw_run_at_end_of_input_is_stable(#[case] source: &str, #[case] expected: &str) {
    let first = generate(&parse_script(source));
    assert_eq!(first, expected);
    assert_eq!(generate(&parse_script(&first)), first);
}

#[rstest]
#[case(
    "require [\"fileinto\", \"imap4flags\"];\nfileinto :flags \"\\\\Seen\" \"Archive\";\n",
    "require [\"fileinto\", \"imap4flags\"];\n\nfileinto :flags \"\\\\Seen\" \"Archive\";\n"
)]
#[case(
    "require \"imap4flags\";\nkeep :flags \"\\\\Flagged\";\n",
    "require [\"imap4flags\"];\n\nkeep :flags \"\\\\Flagged\";\n"
)]
fn flags_tag_in_raw_code_keeps_its_require(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(generate(&parse_script(source)), expected);
}

#[test]
fn disabled_rule_with_end_marker_in_a_value_survives() {
    let mut model = ScriptModel::new();
    model.push_rule(
        Rule::new(MatchKind::AllOf)
            .named("Tricky")
            .disabled()
            .when(Condition::header("subject", MatchType::Is, "a\n [/disabled]\nb"))
            .then(Action::Discard),
    );

    let text = generate(&model);
    assert!(text.contains("\n# [/disabled]\n#b\""));
    assert_eq!(parse_script(&text), model);
}

#[test]
fn disabling_a_parsed_rule_keeps_it_in_place() {
    let mut model = parse_script("keep;\n\n# Lists\nif header :is \"list-id\" \"rust\" { fileinto \"Rust\"; }\n");

    if let Some(rule) = model.rule_mut(0) {
        rule.enabled = false;
    }
    let text = generate(&model);

    assert_eq!(
        text,
        "keep;\n\n# Lists\n# [disabled]\n#if allof (\n#    header :is \"list-id\" \"rust\"\n#) {\n#    fileinto \"Rust\";\n#}\n# [/disabled]\n"
    );
    assert_eq!(parse_script(&text), model);
}
