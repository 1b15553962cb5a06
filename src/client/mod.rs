//! Grading-platform client abstraction.
//!
//! The engine consumes four read-only capabilities: course lookup and
//! the child listings for each hierarchy level. Listings are cursor
//! paginated; each level is consumed as a finite, one-pass lazy
//! sequence, one page at a time, exactly once per run.
//!
//! Failures here propagate as-is. Backoff and re-auth policy belongs to
//! the client implementation, never to the engine.

pub mod http;

pub use http::HttpGradebook;

use crate::models::{Assignment, Comment, Course, Submission, Workspace};
use async_trait::async_trait;
use thiserror::Error;

/// Opaque pagination cursor, platform-defined.
pub type Cursor = String;

/// One page of an ordered, finite child listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor for the next page; `None` on the last page.
    pub next: Option<Cursor>,
}

impl<T> Page<T> {
    /// A single, final page.
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }
}

/// Platform client failures.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("cannot find course with name `{name}` and period `{period}`")]
    CourseNotFound { name: String, period: String },

    #[error("authentication rejected by the platform")]
    Auth,

    #[error("platform returned HTTP {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("platform request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Read-only access to the grading platform's course hierarchy.
#[async_trait]
pub trait GradebookClient {
    /// Look up a course by name and enrollment period.
    async fn find_course(&self, name: &str, period: &str) -> Result<Course, ClientError>;

    /// One page of a course's assignments, in the platform's order.
    async fn assignments(
        &self,
        course: &Course,
        cursor: Option<Cursor>,
    ) -> Result<Page<Assignment>, ClientError>;

    /// One page of an assignment's rooms or submissions, per its
    /// grading mode.
    async fn workspaces(
        &self,
        assignment: &Assignment,
        cursor: Option<Cursor>,
    ) -> Result<Page<Workspace>, ClientError>;

    /// One page of a submission's comments.
    async fn comments(
        &self,
        submission: &Submission,
        cursor: Option<Cursor>,
    ) -> Result<Page<Comment>, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GradingMode;

    /// Scripted client serving assignments from memory, two per page.
    struct ScriptedClient {
        assignments: Vec<Assignment>,
    }

    #[async_trait]
    impl GradebookClient for ScriptedClient {
        async fn find_course(&self, name: &str, period: &str) -> Result<Course, ClientError> {
            if name == "COS126" {
                Ok(Course {
                    id: 1,
                    name: name.to_string(),
                    period: period.to_string(),
                })
            } else {
                Err(ClientError::CourseNotFound {
                    name: name.to_string(),
                    period: period.to_string(),
                })
            }
        }

        async fn assignments(
            &self,
            _course: &Course,
            cursor: Option<Cursor>,
        ) -> Result<Page<Assignment>, ClientError> {
            let offset: usize = cursor.as_deref().unwrap_or("0").parse().unwrap_or(0);
            let items: Vec<Assignment> =
                self.assignments.iter().skip(offset).take(2).cloned().collect();
            let consumed = offset + items.len();
            let next = (consumed < self.assignments.len()).then(|| consumed.to_string());
            Ok(Page { items, next })
        }

        async fn workspaces(
            &self,
            _assignment: &Assignment,
            _cursor: Option<Cursor>,
        ) -> Result<Page<Workspace>, ClientError> {
            Ok(Page::last(Vec::new()))
        }

        async fn comments(
            &self,
            _submission: &Submission,
            _cursor: Option<Cursor>,
        ) -> Result<Page<Comment>, ClientError> {
            Ok(Page::last(Vec::new()))
        }
    }

    fn scripted(count: usize) -> ScriptedClient {
        ScriptedClient {
            assignments: (0..count)
                .map(|i| Assignment {
                    id: i as u64,
                    name: format!("hw{:02}", i),
                    sort_key: i as i64,
                    grading_mode: GradingMode::Submissions,
                })
                .collect(),
        }
    }

    #[test]
    fn test_course_lookup() {
        let client = scripted(0);
        let course = tokio_test::block_on(client.find_course("COS126", "S2026")).unwrap();
        assert_eq!(course.name, "COS126");

        let err = tokio_test::block_on(client.find_course("COS999", "S2026")).unwrap_err();
        assert!(matches!(err, ClientError::CourseNotFound { .. }));
    }

    #[test]
    fn test_cursor_pagination_walks_every_page_once() {
        let client = scripted(5);
        let course = tokio_test::block_on(client.find_course("COS126", "S2026")).unwrap();

        let mut seen = Vec::new();
        let mut cursor = None;
        let mut pages = 0;
        loop {
            let page = tokio_test::block_on(client.assignments(&course, cursor)).unwrap();
            pages += 1;
            seen.extend(page.items.into_iter().map(|a| a.name));
            match page.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        assert_eq!(pages, 3);
        assert_eq!(seen, vec!["hw00", "hw01", "hw02", "hw03", "hw04"]);
    }
}
