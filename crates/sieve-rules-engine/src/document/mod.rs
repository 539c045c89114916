//! # Document Mapper - Script Model to and from the UI's JSON
//!
//! ```json
//! {
//!   "requires": ["fileinto", "vacation"],
//!   "rules": [{
//!     "id": "3f2a9c1e", "name": "GitHub", "enabled": true, "match": "anyOf",
//!     "conditions": [{"header": "from", "matchType": "contains",
//!                     "value": "github.com", "addressTest": true, "negate": false}],
//!     "actions": [{"type": "fileinto", "folder": "GitHub"}]
//!   }],
//!   "rawBlocks": [{"text": "# comment"}],
//!   "order": [{"kind": "raw", "index": 0}, {"kind": "rule", "index": 0}]
//! }
//! ```
//!
//! Going out is total. Coming back in, the document is untrusted: every field
//! is optional on the wire, defaults fill the gaps, and anything that can't
//! be defaulted fails with a [`DocumentError`] naming the field path.
//!
//! A rule's `id` is optional and only round-trips through the document.
//!
//! `requires` is informational on the way out (the full computed list). On
//! the way in, names the generator infers itself are ignored and the rest are
//! noted on the model.

mod wire;

use serde::{Deserialize, Serialize};

use crate::generating::{extensions, required_extensions};
use crate::models::{
    Action, Condition, MatchKind, MatchType, ModelError, OrderEntry, RawBlock, Rule, ScriptModel,
};

pub use wire::{ActionDoc, ConditionDoc, OrderDoc, RawBlockDoc, RuleDoc};

/// The UI-facing document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(default)]
    pub rules: Vec<RuleDoc>,
    #[serde(default)]
    pub raw_blocks: Vec<RawBlockDoc>,
    #[serde(default)]
    pub order: Vec<OrderDoc>,
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("{field}: unknown variant `{tag}`")]
    UnknownVariant { field: String, tag: String },
    #[error("{field}: missing required field")]
    MissingField { field: String },
    #[error("{field}: {reason}")]
    Invalid { field: String, reason: &'static str },
    #[error(transparent)]
    Order(#[from] ModelError),
}

/// Describe a model for the UI.
pub fn to_document(model: &ScriptModel) -> Document {
    Document {
        requires: required_extensions(model).into_iter().collect(),
        rules: model.rules().iter().map(RuleDoc::from).collect(),
        raw_blocks: model
            .raw_blocks()
            .iter()
            .map(|raw| RawBlockDoc {
                text: Some(raw.text().to_string()),
            })
            .collect(),
        order: model.order().iter().copied().map(OrderDoc::from).collect(),
    }
}

/// Rebuild a model from a document, validating everything.
pub fn from_document(document: Document) -> Result<ScriptModel, DocumentError> {
    let rules = document
        .rules
        .into_iter()
        .enumerate()
        .map(|(i, rule)| rule_from_doc(rule, &format!("rules[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    let raw_blocks = document
        .raw_blocks
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            raw.text
                .map(RawBlock::new)
                .ok_or_else(|| missing(format!("rawBlocks[{i}].text")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let order = if document.order.is_empty() {
        (0..rules.len())
            .map(OrderEntry::Rule)
            .chain((0..raw_blocks.len()).map(OrderEntry::Raw))
            .collect()
    } else {
        document
            .order
            .into_iter()
            .enumerate()
            .map(|(i, entry)| order_from_doc(entry, &format!("order[{i}]")))
            .collect::<Result<Vec<_>, _>>()?
    };

    let noted = document
        .requires
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty() && !extensions::is_vocabulary(name));

    Ok(ScriptModel::from_parts(rules, raw_blocks, order, noted)?)
}

/// Serialize a model's document as pretty JSON.
pub fn to_json(model: &ScriptModel) -> Result<String, DocumentError> {
    Ok(serde_json::to_string_pretty(&to_document(model))?)
}

/// Parse and validate a JSON document.
pub fn from_json(json: &str) -> Result<ScriptModel, DocumentError> {
    let document: Document = serde_json::from_str(json)?;
    from_document(document)
}

fn missing(field: String) -> DocumentError {
    DocumentError::MissingField { field }
}

fn unknown(field: String, tag: &str) -> DocumentError {
    DocumentError::UnknownVariant {
        field,
        tag: tag.to_string(),
    }
}

/// Collapse whitespace and keep only names the script can carry.
fn normalize_name(name: Option<String>) -> Option<String> {
    let collapsed = name?.split_whitespace().collect::<Vec<_>>().join(" ");
    sieve_rules_syntax::conventions::comment_name(&format!("# {collapsed}"))
}

fn rule_from_doc(doc: RuleDoc, path: &str) -> Result<Rule, DocumentError> {
    let match_kind = match doc.match_kind.as_deref() {
        None => MatchKind::default(),
        Some("anyOf") => MatchKind::AnyOf,
        Some("allOf") => MatchKind::AllOf,
        Some(other) => return Err(unknown(format!("{path}.match"), other)),
    };

    let conditions = doc
        .conditions
        .ok_or_else(|| missing(format!("{path}.conditions")))?
        .into_iter()
        .enumerate()
        .map(|(i, c)| condition_from_doc(c, &format!("{path}.conditions[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;
    if conditions.is_empty() {
        return Err(DocumentError::Invalid {
            field: format!("{path}.conditions"),
            reason: "a rule needs at least one condition",
        });
    }

    let actions = doc
        .actions
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, a)| action_from_doc(a, &format!("{path}.actions[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Rule {
        id: doc.id.filter(|id| !id.trim().is_empty()),
        name: normalize_name(doc.name),
        enabled: doc.enabled.unwrap_or(true),
        match_kind,
        conditions,
        actions,
    })
}

fn condition_from_doc(doc: ConditionDoc, path: &str) -> Result<Condition, DocumentError> {
    let match_type = match doc.match_type.as_deref() {
        None => MatchType::default(),
        Some(tag) => MatchType::ALL
            .into_iter()
            .find(|m| m.tag() == tag)
            .ok_or_else(|| unknown(format!("{path}.matchType"), tag))?,
    };

    Ok(Condition {
        header: doc.header.ok_or_else(|| missing(format!("{path}.header")))?,
        match_type,
        value: doc.value.ok_or_else(|| missing(format!("{path}.value")))?,
        address_test: doc.address_test.unwrap_or(false),
        negate: doc.negate.unwrap_or(false),
    })
}

fn action_from_doc(doc: ActionDoc, path: &str) -> Result<Action, DocumentError> {
    let tag = doc.kind.ok_or_else(|| missing(format!("{path}.type")))?;
    let require = |value: Option<String>, field: &str| {
        value.ok_or_else(|| missing(format!("{path}.{field}")))
    };

    let action = match tag.as_str() {
        "fileinto" => Action::FileInto {
            folder: require(doc.folder, "folder")?,
        },
        "fileintoCopy" => Action::FileIntoCopy {
            folder: require(doc.folder, "folder")?,
        },
        "redirect" => Action::Redirect {
            address: require(doc.address, "address")?,
        },
        "addflag" => Action::AddFlag {
            flag: require(doc.flag, "flag")?,
        },
        "reject" => Action::Reject {
            message: require(doc.message, "message")?,
        },
        "keep" => Action::Keep,
        "discard" => Action::Discard,
        "stop" => Action::Stop,
        other => return Err(unknown(format!("{path}.type"), other)),
    };
    Ok(action)
}

fn order_from_doc(doc: OrderDoc, path: &str) -> Result<OrderEntry, DocumentError> {
    let index = doc.index.ok_or_else(|| missing(format!("{path}.index")))?;
    match doc.kind.as_deref() {
        Some("rule") => Ok(OrderEntry::Rule(index)),
        Some("raw") => Ok(OrderEntry::Raw(index)),
        Some(other) => Err(unknown(format!("{path}.kind"), other)),
        None => Err(missing(format!("{path}.kind"))),
    }
}

#[cfg(test)]
mod tests;
