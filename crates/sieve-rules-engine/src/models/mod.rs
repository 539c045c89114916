pub mod rule;
pub mod script_model;

pub use rule::{Action, Condition, MatchKind, MatchType, RawBlock, Rule};
pub use script_model::{Item, ModelError, OrderEntry, ScriptModel};
