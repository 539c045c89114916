use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use super::*;
use crate::parsing::parse_script;

fn sample_model() -> ScriptModel {
    parse_script(
        r#"require ["fileinto", "vacation"];

# Work
if anyof (
    address :contains "from" "@work.example",
    not header :is "x-list" "yes"
) {
    fileinto :copy "Work";
    stop;
}

if true {
    vacation "away";
}
"#,
    )
}

#[test]
fn forward_shape() {
    let value = serde_json::to_value(to_document(&sample_model())).unwrap();

    assert_eq!(
        value,
        json!({
            "requires": ["copy", "fileinto", "vacation"],
            "rules": [{
                "name": "Work",
                "enabled": true,
                "match": "anyOf",
                "conditions": [
                    {"header": "from", "matchType": "contains", "value": "@work.example",
                     "addressTest": true, "negate": false},
                    {"header": "x-list", "matchType": "is", "value": "yes",
                     "addressTest": false, "negate": true}
                ],
                "actions": [
                    {"type": "fileintoCopy", "folder": "Work"},
                    {"type": "stop"}
                ]
            }],
            "rawBlocks": [{"text": "if true {\n    vacation \"away\";\n}"}],
            "order": [{"kind": "rule", "index": 0}, {"kind": "raw", "index": 0}]
        })
    );
}

#[test]
fn json_round_trip_is_identity() {
    let model = sample_model();
    let json = to_json(&model).unwrap();
    assert_eq!(from_json(&json).unwrap(), model);
}

#[test]
fn defaults_fill_missing_fields() {
    let model = from_json(
        r#"{
            "rules": [{
                "conditions": [{"header": "subject", "value": "hello"}],
                "actions": [{"type": "keep"}],
                "someFutureField": 1
            }]
        }"#,
    )
    .unwrap();

    assert_eq!(
        model.rules(),
        &[Rule::new(MatchKind::AnyOf)
            .when(Condition::header("subject", MatchType::Contains, "hello"))
            .then(Action::Keep)]
    );
    assert_eq!(model.order(), &[OrderEntry::Rule(0)]);
    assert!(model.noted_extensions().is_empty());
}

#[test]
fn empty_order_puts_rules_before_raw_blocks() {
    let model = from_json(
        r#"{
            "rules": [{"conditions": [{"header": "a", "value": "b"}]}],
            "rawBlocks": [{"text": "keep;"}, {"text": "stop;"}]
        }"#,
    )
    .unwrap();

    assert_eq!(
        model.order(),
        &[OrderEntry::Rule(0), OrderEntry::Raw(0), OrderEntry::Raw(1)]
    );
}

#[rstest]
#[case(Some("  Newsletters  "), Some("Newsletters"))]
#[case(Some("two\nlines"), Some("two lines"))]
#[case(Some("   "), None)]
#[case(Some("--- Loud ---"), Some("Loud"))]
#[case(None, None)]
fn names_are_normalized(#[case] name: Option<&str>, #[case] expected: Option<&str>) {
    let document = json!({
        "rules": [{"name": name, "conditions": [{"header": "a", "value": "b"}]}]
    });

    let model = from_json(&document.to_string()).unwrap();
    assert_eq!(model.rules()[0].name.as_deref(), expected);
}

#[test]
fn vocabulary_requires_are_recomputed() {
    let model = from_json(
        r#"{"requires": ["fileinto", "imap4flags", "vacation", " "], "rawBlocks": [{"text": "keep;"}]}"#,
    )
    .unwrap();

    let noted: Vec<&str> = model.noted_extensions().iter().map(String::as_str).collect();
    assert_eq!(noted, vec!["vacation"]);
}

#[rstest]
#[case::unknown_action(
    r#"{"rules": [{"conditions": [{"header": "a", "value": "b"}], "actions": [{"type": "keep"}, {"type": "vacation"}]}]}"#,
    "rules[0].actions[1].type: unknown variant `vacation`"
)]
#[case::missing_action_type(
    r#"{"rules": [{"conditions": [{"header": "a", "value": "b"}], "actions": [{"folder": "x"}]}]}"#,
    "rules[0].actions[0].type: missing required field"
)]
#[case::missing_argument(
    r#"{"rules": [{"conditions": [{"header": "a", "value": "b"}], "actions": [{"type": "redirect"}]}]}"#,
    "rules[0].actions[0].address: missing required field"
)]
#[case::unknown_match(
    r#"{"rules": [{"match": "oneOf", "conditions": [{"header": "a", "value": "b"}]}]}"#,
    "rules[0].match: unknown variant `oneOf`"
)]
#[case::unknown_match_type(
    r#"{"rules": [{"conditions": [{"header": "a", "value": "b", "matchType": "count"}]}]}"#,
    "rules[0].conditions[0].matchType: unknown variant `count`"
)]
#[case::missing_header(
    r#"{"rules": [{"conditions": [{"value": "b"}]}]}"#,
    "rules[0].conditions[0].header: missing required field"
)]
#[case::no_conditions(
    r#"{"rules": [{"conditions": []}]}"#,
    "rules[0].conditions: a rule needs at least one condition"
)]
#[case::missing_conditions(
    r#"{"rules": [{"name": "x"}]}"#,
    "rules[0].conditions: missing required field"
)]
#[case::raw_without_text(r#"{"rawBlocks": [{}]}"#, "rawBlocks[0].text: missing required field")]
#[case::unknown_order_kind(
    r#"{"rawBlocks": [{"text": "keep;"}], "order": [{"kind": "comment", "index": 0}]}"#,
    "order[0].kind: unknown variant `comment`"
)]
#[case::dangling_order(
    r#"{"rawBlocks": [{"text": "keep;"}], "order": [{"kind": "raw", "index": 0}, {"kind": "rule", "index": 0}]}"#,
    "order[1] refers to rule 0, which does not exist"
)]
#[case::duplicate_order(
    r#"{"rawBlocks": [{"text": "keep;"}], "order": [{"kind": "raw", "index": 0}, {"kind": "raw", "index": 0}]}"#,
    "order[1] repeats raw block 0"
)]
#[case::incomplete_order(
    r#"{"rawBlocks": [{"text": "a;"}, {"text": "b;"}], "order": [{"kind": "raw", "index": 1}]}"#,
    "order does not mention raw block 0"
)]
fn invalid_documents_name_the_field(#[case] json: &str, #[case] expected: &str) {
    let err = from_json(json).unwrap_err();
    assert_eq!(err.to_string(), expected);
}

#[test]
fn malformed_json_is_rejected() {
    let err = from_json("{\"rules\": [").unwrap_err();
    assert!(matches!(err, DocumentError::Malformed(_)));

    let err = from_json(r#"{"order": [{"kind": "raw", "index": -1}]}"#).unwrap_err();
    assert!(matches!(err, DocumentError::Malformed(_)));
}

#[test]
fn rule_ids_travel_with_the_document_only() {
    let model = from_json(
        r#"{"rules": [
            {"id": "3f2a9c1e", "name": "Lists", "conditions": [{"header": "list-id", "value": "rust"}]},
            {"id": " ", "conditions": [{"header": "a", "value": "b"}]}
        ]}"#,
    )
    .unwrap();

    assert_eq!(
        model.rules()[0],
        Rule::new(MatchKind::AnyOf)
            .with_id("3f2a9c1e")
            .named("Lists")
            .when(Condition::header("list-id", MatchType::Contains, "rust"))
    );
    assert_eq!(model.rules()[1].id, None);
    assert_eq!(from_json(&to_json(&model).unwrap()).unwrap(), model);

    let text = crate::generating::generate(&model);
    assert!(!text.contains("3f2a9c1e"));
    assert_eq!(parse_script(&text).rules()[0].id, None);
}
