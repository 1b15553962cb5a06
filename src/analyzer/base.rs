//! The analyzer contract.
//!
//! An analyzer is a named participant that receives one event per entity
//! visited during a traversal and accumulates whatever it likes into its
//! own [`CounterStore`]. Implementing any subset of the hooks is legal;
//! the default bodies are no-ops, which is how "unimplemented hooks are
//! silently skipped" renders in a trait.
//!
//! Hooks are fallible. Any error returned from a hook aborts the entire
//! run: a partially aggregated result must never be surfaced as "the"
//! result.

use crate::counter::CounterStore;
use crate::models::{Assignment, Comment, Course, Room, Submission};
use serde_json::{Map, Value};

/// Outcome of a single hook invocation.
pub type HookResult = anyhow::Result<()>;

/// The capability set every analyzer exposes to the engine.
pub trait Analyzer {
    /// Stable identity, used as the registry key and the result key.
    fn name(&self) -> &str;

    /// Clear accumulated state ahead of a fresh run.
    fn reset(&mut self);

    /// The analyzer's own counter store, read by the result accessor.
    fn counters(&self) -> &CounterStore;

    /// Apply loosely-typed options, e.g. from an `[analyzers.<name>]`
    /// config table. Analyzers without options ignore this.
    fn configure(&mut self, _options: &Map<String, Value>) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_course(&mut self, _course: &Course) -> HookResult {
        Ok(())
    }

    fn on_assignment(&mut self, _assignment: &Assignment) -> HookResult {
        Ok(())
    }

    fn on_room(&mut self, _room: &Room) -> HookResult {
        Ok(())
    }

    fn on_submission(&mut self, _assignment: &Assignment, _submission: &Submission) -> HookResult {
        Ok(())
    }

    fn on_comment(
        &mut self,
        _assignment: &Assignment,
        _submission: &Submission,
        _comment: &Comment,
    ) -> HookResult {
        Ok(())
    }
}
