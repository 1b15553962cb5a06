//! Course traversal and event dispatch.
//!
//! A [`CourseEventLoop`] drives one strictly sequential, single-pass,
//! pre-order walk over the fixed hierarchy
//! course -> assignments -> rooms/submissions -> comments, firing the
//! matching hook on every registered analyzer at each entity. Analyzers
//! run in registration order, and a parent's hook always fires before
//! any of its descendants' hooks. Assignments are visited in their
//! course sort-key order, whatever order the platform pages them in.
//!
//! The only suspension points are the paged fetches from the platform
//! client. A hook fault aborts the run immediately with the hierarchy
//! position attached; whatever counters were accumulated up to that
//! point stay in place, visible but never presented as a complete
//! result.

use crate::analyzer::base::{Analyzer, HookResult};
use crate::analyzer::registry::Registry;
use crate::client::GradebookClient;
use crate::counter::StoreSnapshot;
use crate::error::StatsError;
use crate::models::{Assignment, Position, Submission, Workspace};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Lifecycle of one event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// No run completed yet; counters may be partial or empty.
    #[default]
    Idle,
    /// The last run reached the end of the hierarchy.
    Done,
}

/// Entity counts from a completed run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RunSummary {
    pub assignments: usize,
    pub rooms: usize,
    pub submissions: usize,
    pub comments: usize,
}

/// The traversal engine for one course.
pub struct CourseEventLoop<C> {
    client: C,
    registry: Registry,
    course_name: String,
    course_period: String,
    selected_assignments: Option<Vec<String>>,
    state: RunState,
}

impl<C: GradebookClient> CourseEventLoop<C> {
    pub fn new(
        client: C,
        registry: Registry,
        course_name: impl Into<String>,
        course_period: impl Into<String>,
    ) -> Self {
        Self {
            client,
            registry,
            course_name: course_name.into(),
            course_period: course_period.into(),
            selected_assignments: None,
            state: RunState::Idle,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Restrict the run to assignments with these names. Unselected
    /// assignments are skipped entirely, descendants included.
    pub fn select_assignments(&mut self, names: Vec<String>) {
        self.selected_assignments = Some(names);
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == RunState::Done
    }

    /// Clear every analyzer's counters and rearm the loop.
    pub fn reset(&mut self) {
        for analyzer in self.registry.iter_mut() {
            analyzer.reset();
        }
        self.state = RunState::Idle;
    }

    /// Walk the course hierarchy once, dispatching events as entities
    /// are discovered. Aborts on the first hook or client fault.
    pub async fn run(&mut self) -> Result<RunSummary, StatsError> {
        let course = self
            .client
            .find_course(&self.course_name, &self.course_period)
            .await?;
        info!("Walking course `{}` ({})", course.name, course.period);

        let mut summary = RunSummary::default();

        self.dispatch(Position::course(&course), |a| a.on_course(&course))?;

        // Page order is arbitrary; the course defines assignment order
        // through sort keys, so collect before dispatching.
        let mut assignments = Vec::new();
        let mut cursor = None;
        loop {
            let page = self.client.assignments(&course, cursor).await?;
            assignments.extend(page.items);

            match page.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        assignments.sort_by_key(|a| a.sort_key);

        for assignment in &assignments {
            if !self.is_selected(&assignment.name) {
                debug!("Skipping unselected assignment `{}`", assignment.name);
                continue;
            }

            info!("Processing assignment `{}`", assignment.name);
            summary.assignments += 1;
            self.dispatch(Position::assignment(assignment), |a| {
                a.on_assignment(assignment)
            })?;
            self.walk_assignment(assignment, &mut summary).await?;
        }

        self.state = RunState::Done;
        info!(
            "Run complete: {} assignments, {} submissions, {} rooms, {} comments",
            summary.assignments, summary.submissions, summary.rooms, summary.comments
        );
        Ok(summary)
    }

    async fn walk_assignment(
        &mut self,
        assignment: &Assignment,
        summary: &mut RunSummary,
    ) -> Result<(), StatsError> {
        let mut cursor = None;
        loop {
            let page = self.client.workspaces(assignment, cursor).await?;
            for workspace in &page.items {
                match workspace {
                    Workspace::Room(room) => {
                        summary.rooms += 1;
                        self.dispatch(Position::room(room, assignment), |a| a.on_room(room))?;
                    }
                    Workspace::Submission(submission) => {
                        summary.submissions += 1;
                        self.dispatch(Position::submission(submission, assignment), |a| {
                            a.on_submission(assignment, submission)
                        })?;
                        self.walk_submission(assignment, submission, summary).await?;
                    }
                }
            }

            match page.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        Ok(())
    }

    async fn walk_submission(
        &mut self,
        assignment: &Assignment,
        submission: &Submission,
        summary: &mut RunSummary,
    ) -> Result<(), StatsError> {
        let mut cursor = None;
        loop {
            let page = self.client.comments(submission, cursor).await?;
            for comment in &page.items {
                summary.comments += 1;
                self.dispatch(Position::comment(comment, assignment, submission), |a| {
                    a.on_comment(assignment, submission, comment)
                })?;
            }

            match page.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        Ok(())
    }

    /// Fire `hook` on every analyzer, in registration order. The first
    /// failure aborts with the faulting analyzer and position attached.
    fn dispatch<F>(&mut self, position: Position, mut hook: F) -> Result<(), StatsError>
    where
        F: FnMut(&mut dyn Analyzer) -> HookResult,
    {
        for analyzer in self.registry.iter_mut() {
            if let Err(fault) = hook(analyzer.as_mut()) {
                return Err(StatsError::HookFault {
                    analyzer: analyzer.name().to_string(),
                    position,
                    source: fault.into(),
                });
            }
        }
        Ok(())
    }

    fn is_selected(&self, assignment_name: &str) -> bool {
        match &self.selected_assignments {
            Some(names) => names.iter().any(|n| n == assignment_name),
            None => true,
        }
    }

    /// Snapshot of the analyzer registered under `name`. Valid at any
    /// time; before `Done` it reflects whatever has accumulated so far.
    pub fn get_by_name(&self, name: &str) -> Result<StoreSnapshot, StatsError> {
        Ok(self.registry.resolve(name)?.counters().snapshot())
    }

    /// Registered analyzer names, in registration order.
    pub fn all_names(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// Snapshots for every registered analyzer, keyed by analyzer name.
    pub fn all_stats(&self) -> BTreeMap<String, StoreSnapshot> {
        self.registry
            .iter()
            .map(|a| (a.name().to_string(), a.counters().snapshot()))
            .collect()
    }
}
