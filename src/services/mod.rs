// reasoncheck Core Services
// Parser -> Analyzer -> Suggestion Engine -> Report Assembler

pub mod config_store;
pub mod detection;
pub mod error;
pub mod guidance;
pub mod parser;
pub mod report;
pub mod signals;
pub mod suggestions;
pub mod text_processor;

pub use config_store::{AnalyzerConfig, ConfigStore, Lexicons, SentimentEntry, Thresholds};
pub use detection::Analyzer;
pub use error::{AnalysisError, AnalysisOutcome, SignalError};
pub use guidance::ContextAdvisor;
pub use parser::ChainParser;
pub use report::{assemble, ReasoningDebugger};
pub use signals::{LexiconSignalProvider, SignalProvider};
pub use suggestions::{flow_verdict, SuggestionEngine};
