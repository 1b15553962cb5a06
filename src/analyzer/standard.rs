//! Built-in analyzers.
//!
//! Each counts per-grader activity with the assignment name (normalized)
//! as the subcategory. They are ordinary implementations of the
//! [`Analyzer`] contract; nothing here is special-cased by the engine.

use crate::analyzer::base::{Analyzer, HookResult};
use crate::analyzer::counting::CounterTally;
use crate::counter::CounterStore;
use crate::error::StatsError;
use crate::helpers::{check_int_like, normalize_label};
use crate::models::{Assignment, Comment, Submission};
use serde_json::{Map, Value};
use tracing::warn;

pub const SUBMISSIONS_GRADED: &str = "submissions.graded";
pub const COMMENTS_COUNTER: &str = "comments.counter";
pub const COMMENTS_COUNTER_CUSTOM: &str = "comments.counter.custom";
pub const COMMENTS_COUNTER_RUBRIC: &str = "comments.counter.rubric";

/// Explicit factory table of the built-in analyzers, in a stable order.
/// Callers seed a [`Registry`](crate::analyzer::Registry) from this
/// table (or a filtered subset); there is no ambient global registry.
pub fn builtin_table() -> Vec<(&'static str, fn() -> Box<dyn Analyzer>)> {
    vec![
        (SUBMISSIONS_GRADED, || {
            Box::new(SubmissionsGradedCounter::new()) as Box<dyn Analyzer>
        }),
        (COMMENTS_COUNTER, || {
            Box::new(GenericCommentsCounter::new()) as Box<dyn Analyzer>
        }),
        (COMMENTS_COUNTER_CUSTOM, || {
            Box::new(CustomCommentsCounter::new()) as Box<dyn Analyzer>
        }),
        (COMMENTS_COUNTER_RUBRIC, || {
            Box::new(RubricCommentsCounter::new()) as Box<dyn Analyzer>
        }),
    ]
}

/// Counts finalized submissions per grader, per assignment.
#[derive(Debug, Default)]
pub struct SubmissionsGradedCounter {
    tally: CounterTally,
}

impl SubmissionsGradedCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Analyzer for SubmissionsGradedCounter {
    fn name(&self) -> &str {
        SUBMISSIONS_GRADED
    }

    fn reset(&mut self) {
        self.tally.reset();
    }

    fn counters(&self) -> &CounterStore {
        self.tally.store()
    }

    fn on_submission(&mut self, assignment: &Assignment, submission: &Submission) -> HookResult {
        // unclaimed submissions have no grader to credit
        let Some(grader) = submission.grader.as_deref() else {
            return Ok(());
        };
        if !submission.finalized {
            return Ok(());
        }

        self.tally.add(grader, &normalize_label(&assignment.name))?;
        Ok(())
    }
}

/// Counts comments per author, per assignment, with size and authorship
/// filters. The `custom`/`rubric` variants below narrow it further.
#[derive(Debug)]
pub struct GenericCommentsCounter {
    tally: CounterTally,
    min_characters: Option<i64>,
    min_words: Option<i64>,
    only_graders: bool,
}

impl Default for GenericCommentsCounter {
    fn default() -> Self {
        Self {
            tally: CounterTally::new(),
            min_characters: None,
            min_words: None,
            only_graders: true,
        }
    }
}

impl GenericCommentsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only count comments with at least this many characters.
    pub fn min_characters(mut self, value: i64) -> Self {
        self.min_characters = (value >= 0).then_some(value);
        self
    }

    /// Only count comments with at least this many words.
    pub fn min_words(mut self, value: i64) -> Self {
        self.min_words = (value >= 0).then_some(value);
        self
    }

    /// Whether only the assigned grader's comments count (default true).
    pub fn only_graders(mut self, yes: bool) -> Self {
        self.only_graders = yes;
        self
    }

    /// Shared counting path for this analyzer and its variants.
    fn count_comment(
        &mut self,
        assignment: &Assignment,
        submission: &Submission,
        comment: &Comment,
    ) -> HookResult {
        let Some(grader) = submission.grader.as_deref() else {
            return Ok(());
        };
        if !submission.finalized {
            return Ok(());
        }
        let Some(author) = comment.author.as_deref() else {
            return Ok(());
        };
        if self.only_graders && author != grader {
            return Ok(());
        }

        if let Some(min) = self.min_characters {
            if (comment.text.chars().count() as i64) < min {
                return Ok(());
            }
        }
        if let Some(min) = self.min_words {
            if (comment.text.split_whitespace().count() as i64) < min {
                return Ok(());
            }
        }

        self.tally.add(author, &normalize_label(&assignment.name))?;
        Ok(())
    }

    /// Apply loosely-typed options. Integer coercion is strict: a value
    /// that is not integer-like fails with `TypeMismatch`, untouched
    /// state intact.
    fn apply_options(&mut self, options: &Map<String, Value>) -> anyhow::Result<()> {
        for (key, value) in options {
            match key.as_str() {
                "min_characters" => self.min_characters = check_int_like(Some(value))?,
                "min_words" => self.min_words = check_int_like(Some(value))?,
                "only_graders" => {
                    self.only_graders = value
                        .as_bool()
                        .ok_or_else(|| StatsError::TypeMismatch(value.to_string()))?;
                }
                other => warn!("Ignoring unknown comment-counter option `{}`", other),
            }
        }
        Ok(())
    }
}

impl Analyzer for GenericCommentsCounter {
    fn name(&self) -> &str {
        COMMENTS_COUNTER
    }

    fn reset(&mut self) {
        self.tally.reset();
    }

    fn counters(&self) -> &CounterStore {
        self.tally.store()
    }

    fn configure(&mut self, options: &Map<String, Value>) -> anyhow::Result<()> {
        self.apply_options(options)
    }

    fn on_comment(
        &mut self,
        assignment: &Assignment,
        submission: &Submission,
        comment: &Comment,
    ) -> HookResult {
        self.count_comment(assignment, submission, comment)
    }
}

/// Counts only free-form comments, i.e. those not applied from a rubric.
#[derive(Debug, Default)]
pub struct CustomCommentsCounter {
    inner: GenericCommentsCounter,
}

impl CustomCommentsCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Analyzer for CustomCommentsCounter {
    fn name(&self) -> &str {
        COMMENTS_COUNTER_CUSTOM
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn counters(&self) -> &CounterStore {
        self.inner.counters()
    }

    fn configure(&mut self, options: &Map<String, Value>) -> anyhow::Result<()> {
        self.inner.apply_options(options)
    }

    fn on_comment(
        &mut self,
        assignment: &Assignment,
        submission: &Submission,
        comment: &Comment,
    ) -> HookResult {
        if comment.rubric_comment.is_none() {
            self.inner.count_comment(assignment, submission, comment)
        } else {
            Ok(())
        }
    }
}

/// Counts only comments applied from a rubric item.
#[derive(Debug, Default)]
pub struct RubricCommentsCounter {
    inner: GenericCommentsCounter,
}

impl RubricCommentsCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Analyzer for RubricCommentsCounter {
    fn name(&self) -> &str {
        COMMENTS_COUNTER_RUBRIC
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn counters(&self) -> &CounterStore {
        self.inner.counters()
    }

    fn configure(&mut self, options: &Map<String, Value>) -> anyhow::Result<()> {
        self.inner.apply_options(options)
    }

    fn on_comment(
        &mut self,
        assignment: &Assignment,
        submission: &Submission,
        comment: &Comment,
    ) -> HookResult {
        if comment.rubric_comment.is_some() {
            self.inner.count_comment(assignment, submission, comment)
        } else {
            Ok(())
        }
    }
}
