use std::collections::BTreeSet;
use std::fmt;

use super::rule::{RawBlock, Rule};

/// One slot in the script's interleaving of rules and raw blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OrderEntry {
    Rule(usize),
    Raw(usize),
}

impl fmt::Display for OrderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderEntry::Rule(i) => write!(f, "rule {i}"),
            OrderEntry::Raw(i) => write!(f, "raw block {i}"),
        }
    }
}

/// A resolved order entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item<'a> {
    Rule(&'a Rule),
    Raw(&'a RawBlock),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("order[{position}] refers to {entry}, which does not exist")]
    Dangling { position: usize, entry: OrderEntry },
    #[error("order[{position}] repeats {entry}")]
    Duplicate { position: usize, entry: OrderEntry },
    #[error("order does not mention {entry}")]
    Missing { entry: OrderEntry },
}

/// Rules and raw blocks of one script, in their original interleaving.
///
/// The order always holds exactly one entry per rule and per raw block, so
/// the fields are private and every mutation keeps them in step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptModel {
    rules: Vec<Rule>,
    raw_blocks: Vec<RawBlock>,
    order: Vec<OrderEntry>,
    /// Extensions the source required that rule generation does not infer
    noted_extensions: BTreeSet<String>,
}

impl ScriptModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from separately supplied parts, checking the order.
    pub fn from_parts(
        rules: Vec<Rule>,
        raw_blocks: Vec<RawBlock>,
        order: Vec<OrderEntry>,
        noted_extensions: impl IntoIterator<Item = String>,
    ) -> Result<Self, ModelError> {
        let mut seen = BTreeSet::new();
        for (position, entry) in order.iter().copied().enumerate() {
            let exists = match entry {
                OrderEntry::Rule(i) => i < rules.len(),
                OrderEntry::Raw(i) => i < raw_blocks.len(),
            };
            if !exists {
                return Err(ModelError::Dangling { position, entry });
            }
            if !seen.insert(entry) {
                return Err(ModelError::Duplicate { position, entry });
            }
        }

        let expected = (0..rules.len())
            .map(OrderEntry::Rule)
            .chain((0..raw_blocks.len()).map(OrderEntry::Raw));
        for entry in expected {
            if !seen.contains(&entry) {
                return Err(ModelError::Missing { entry });
            }
        }

        Ok(Self {
            rules,
            raw_blocks,
            order,
            noted_extensions: noted_extensions.into_iter().collect(),
        })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn raw_blocks(&self) -> &[RawBlock] {
        &self.raw_blocks
    }

    pub fn order(&self) -> &[OrderEntry] {
        &self.order
    }

    pub fn noted_extensions(&self) -> &BTreeSet<String> {
        &self.noted_extensions
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Append a rule at the end of the script, returning its index.
    pub fn push_rule(&mut self, rule: Rule) -> usize {
        let index = self.rules.len();
        self.rules.push(rule);
        self.order.push(OrderEntry::Rule(index));
        index
    }

    /// Append a raw block at the end of the script, returning its index.
    pub fn push_raw(&mut self, raw: RawBlock) -> usize {
        let index = self.raw_blocks.len();
        self.raw_blocks.push(raw);
        self.order.push(OrderEntry::Raw(index));
        index
    }

    /// Remove rule `index`, renumbering later rule entries in the order.
    ///
    /// Raw block entries and the relative order of everything else are
    /// untouched.
    pub fn remove_rule(&mut self, index: usize) -> Option<Rule> {
        if index >= self.rules.len() {
            return None;
        }

        let rule = self.rules.remove(index);
        self.order.retain(|entry| *entry != OrderEntry::Rule(index));
        for entry in &mut self.order {
            if let OrderEntry::Rule(i) = entry
                && *i > index
            {
                *i -= 1;
            }
        }
        Some(rule)
    }

    pub fn rule_mut(&mut self, index: usize) -> Option<&mut Rule> {
        self.rules.get_mut(index)
    }

    /// Remember an extension the script needs for reasons the model can't see.
    pub fn note_extension(&mut self, name: impl Into<String>) {
        self.noted_extensions.insert(name.into());
    }

    /// Rules and raw blocks in script order.
    pub fn items(&self) -> impl Iterator<Item = Item<'_>> + '_ {
        self.order.iter().filter_map(|entry| match *entry {
            OrderEntry::Rule(i) => self.rules.get(i).map(Item::Rule),
            OrderEntry::Raw(i) => self.raw_blocks.get(i).map(Item::Raw),
        })
    }
}
