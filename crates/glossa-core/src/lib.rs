pub mod analyzer;
pub mod error;
pub mod fallback;
pub mod lemma;
pub mod pipeline;
pub mod preprocess;
pub mod prompts;
pub mod senses;
pub mod settings;
pub mod usage;

#[cfg(test)]
mod tests;

pub use analyzer::LinguisticAnalyzer;
pub use error::PipelineError;
pub use fallback::FullLlmFallback;
pub use lemma::{LemmaResolution, LemmaResolver};
pub use pipeline::{LookupOutcome, LookupPipeline};
pub use senses::{SenseSelection, SenseSelector};
pub use settings::PipelineSettings;
pub use usage::{Operation, UsageRecord, UsageSink};
