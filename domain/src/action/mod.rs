//! The JSON action contract between the model and the tool executor.
//!
//! - [`entities::Action`] - one validated model decision
//! - [`parsing::parse_action`] - raw model text to [`ParsedAction`]

pub mod entities;
pub mod parsing;

pub use entities::{Action, ActionKind, DEFAULT_SEARCH_RESULTS, ParsedAction};
pub use parsing::{ActionParseError, extract_json_object, parse_action, repair_string_controls, strip_code_fence};
