pub mod language;
pub mod types;

pub use language::{LanguageRules, rules_for};
pub use types::*;
