pub mod analysis;
pub mod analyzer;
pub mod conllu;
pub mod parser;

pub use analysis::analyze;
pub use analyzer::GermanAnalyzer;
pub use conllu::{ConlluError, ConlluToken, parse_conllu};
pub use parser::{AnalyzerError, DependencyParser, UdpipeParser};
