//! Grading-activity statistics for codePost-style platforms.
//!
//! Gradewalk walks a course's full hierarchy - assignments, then the
//! rooms or submissions under each one, then the comments under each
//! submission - and dispatches every record to a set of registered
//! analyzers. Each analyzer accumulates per-entry, per-subcategory
//! counters; after a run the merged counters are available by analyzer
//! name and can be rendered as a Markdown or JSON report.
//!
//! The pieces compose as follows:
//!
//! - [`analyzer::Analyzer`] is the hook contract; unimplemented hooks
//!   default to doing nothing.
//! - [`analyzer::Registry`] holds the analyzers for one run, keyed by
//!   their unique names.
//! - [`client::GradebookClient`] abstracts the platform's read-only,
//!   cursor-paginated API.
//! - [`engine::CourseEventLoop`] performs the pre-order walk and is the
//!   result accessor afterwards.

pub mod analyzer;
pub mod cli;
pub mod client;
pub mod config;
pub mod counter;
pub mod engine;
pub mod error;
pub mod helpers;
pub mod models;
pub mod report;

pub use analyzer::{Analyzer, AnalyzerSource, HookResult, Registry};
pub use counter::CounterStore;
pub use engine::CourseEventLoop;
pub use error::StatsError;
