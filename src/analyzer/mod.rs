//! Analyzer contract, registration, and built-in analyzers.

pub mod base;
pub mod counting;
pub mod registry;
pub mod standard;

pub use base::{Analyzer, HookResult};
pub use counting::CounterTally;
pub use registry::{AnalyzerSource, Registry};
