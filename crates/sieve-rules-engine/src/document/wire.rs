//! Wire shapes of the document.
//!
//! Every field is optional so that a missing field can be reported by path,
//! or defaulted, instead of failing deserialization as a whole. Unknown
//! fields are ignored.

use serde::{Deserialize, Serialize};

use crate::models::{Action, Condition, MatchKind, OrderEntry, Rule};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub match_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<ConditionDoc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<ActionDoc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_test: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negate: Option<bool>,
}

/// An action: `type` plus whichever argument field that type takes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDoc {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBlockDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl From<&Rule> for RuleDoc {
    fn from(rule: &Rule) -> Self {
        let match_kind = match rule.match_kind {
            MatchKind::AnyOf => "anyOf",
            MatchKind::AllOf => "allOf",
        };
        Self {
            id: rule.id.clone(),
            name: rule.name.clone(),
            enabled: Some(rule.enabled),
            match_kind: Some(match_kind.to_string()),
            conditions: Some(rule.conditions.iter().map(ConditionDoc::from).collect()),
            actions: Some(rule.actions.iter().map(ActionDoc::from).collect()),
        }
    }
}

impl From<&Condition> for ConditionDoc {
    fn from(condition: &Condition) -> Self {
        Self {
            header: Some(condition.header.clone()),
            match_type: Some(condition.match_type.tag().to_string()),
            value: Some(condition.value.clone()),
            address_test: Some(condition.address_test),
            negate: Some(condition.negate),
        }
    }
}

impl From<&Action> for ActionDoc {
    fn from(action: &Action) -> Self {
        let (kind, argument) = match action {
            Action::FileIntoCopy { folder } => ("fileintoCopy", Some(folder.clone())),
            other => (other.command(), other.argument().map(str::to_string)),
        };

        let mut doc = ActionDoc {
            kind: Some(kind.to_string()),
            ..Default::default()
        };
        match action {
            Action::FileInto { .. } | Action::FileIntoCopy { .. } => doc.folder = argument,
            Action::Redirect { .. } => doc.address = argument,
            Action::AddFlag { .. } => doc.flag = argument,
            Action::Reject { .. } => doc.message = argument,
            Action::Keep | Action::Discard | Action::Stop => {}
        }
        doc
    }
}

impl From<OrderEntry> for OrderDoc {
    fn from(entry: OrderEntry) -> Self {
        let (kind, index) = match entry {
            OrderEntry::Rule(i) => ("rule", i),
            OrderEntry::Raw(i) => ("raw", i),
        };
        Self {
            kind: Some(kind.to_string()),
            index: Some(index),
        }
    }
}
