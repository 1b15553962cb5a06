//! Data models for grading-platform entities.
//!
//! These mirror the platform's wire format: camelCase JSON objects with
//! at least an identifier and a name. The engine treats them as opaque
//! read-only data; nothing here is ever written back to the platform.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform-assigned entity identifier.
pub type Id = u64;

/// A course for one enrollment period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: Id,
    pub name: String,
    pub period: String,
}

/// How an assignment collects student work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradingMode {
    /// Individual submissions, each with its own comment thread.
    #[default]
    Submissions,
    /// Shared grading rooms with no per-student comment threads.
    Rooms,
}

/// An assignment within a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: Id,
    pub name: String,
    /// Position of the assignment within its course. Listings arrive in
    /// arbitrary page order; traversal orders by this key.
    #[serde(rename = "sortKey", default)]
    pub sort_key: i64,
    #[serde(rename = "gradingMode", default)]
    pub grading_mode: GradingMode,
}

/// A grading room attached to an assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: Id,
    pub name: String,
}

/// A student submission for an assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Id,
    /// Grader identifier, unset while the submission is unclaimed.
    #[serde(default)]
    pub grader: Option<String>,
    #[serde(rename = "isFinalized", default)]
    pub finalized: bool,
}

/// A comment left on a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Id,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub text: String,
    /// Link to the rubric item this comment was applied from, if any.
    #[serde(rename = "rubricComment", default)]
    pub rubric_comment: Option<Id>,
}

/// The third traversal level: an assignment's children are either rooms
/// or submissions, depending on its grading mode.
#[derive(Debug, Clone)]
pub enum Workspace {
    Room(Room),
    Submission(Submission),
}

/// The kind of entity being processed when an event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Course,
    Assignment,
    Room,
    Submission,
    Comment,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Course => write!(f, "course"),
            EntityKind::Assignment => write!(f, "assignment"),
            EntityKind::Room => write!(f, "room"),
            EntityKind::Submission => write!(f, "submission"),
            EntityKind::Comment => write!(f, "comment"),
        }
    }
}

/// Transient hierarchy position during a run, attached to hook faults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub kind: EntityKind,
    pub id: Id,
    /// Name of the enclosing assignment, where one exists.
    pub assignment: Option<String>,
    /// Id of the enclosing submission, where one exists.
    pub submission: Option<Id>,
}

impl Position {
    pub fn course(course: &Course) -> Self {
        Self {
            kind: EntityKind::Course,
            id: course.id,
            assignment: None,
            submission: None,
        }
    }

    pub fn assignment(assignment: &Assignment) -> Self {
        Self {
            kind: EntityKind::Assignment,
            id: assignment.id,
            assignment: Some(assignment.name.clone()),
            submission: None,
        }
    }

    pub fn room(room: &Room, assignment: &Assignment) -> Self {
        Self {
            kind: EntityKind::Room,
            id: room.id,
            assignment: Some(assignment.name.clone()),
            submission: None,
        }
    }

    pub fn submission(submission: &Submission, assignment: &Assignment) -> Self {
        Self {
            kind: EntityKind::Submission,
            id: submission.id,
            assignment: Some(assignment.name.clone()),
            submission: None,
        }
    }

    pub fn comment(comment: &Comment, assignment: &Assignment, submission: &Submission) -> Self {
        Self {
            kind: EntityKind::Comment,
            id: comment.id,
            assignment: Some(assignment.name.clone()),
            submission: Some(submission.id),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)?;

        let mut context = Vec::new();
        if let Some(submission) = self.submission {
            context.push(format!("submission {}", submission));
        }
        if let Some(ref assignment) = self.assignment {
            context.push(format!("assignment `{}`", assignment));
        }

        if !context.is_empty() {
            write!(f, " ({})", context.join(", "))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_wire_format() {
        let json = r#"{"id": 41, "grader": "grader@example.edu", "isFinalized": true}"#;
        let submission: Submission = serde_json::from_str(json).unwrap();
        assert_eq!(submission.id, 41);
        assert_eq!(submission.grader.as_deref(), Some("grader@example.edu"));
        assert!(submission.finalized);
    }

    #[test]
    fn test_submission_defaults() {
        let json = r#"{"id": 7}"#;
        let submission: Submission = serde_json::from_str(json).unwrap();
        assert!(submission.grader.is_none());
        assert!(!submission.finalized);
    }

    #[test]
    fn test_comment_rubric_link() {
        let json = r#"{"id": 9, "author": "grader@example.edu", "text": "nice", "rubricComment": 12}"#;
        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.rubric_comment, Some(12));
    }

    #[test]
    fn test_assignment_wire_format() {
        let json = r#"{"id": 3, "name": "hw01", "sortKey": 2, "gradingMode": "rooms"}"#;
        let assignment: Assignment = serde_json::from_str(json).unwrap();
        assert_eq!(assignment.sort_key, 2);
        assert_eq!(assignment.grading_mode, GradingMode::Rooms);

        let json = r#"{"id": 4, "name": "hw02"}"#;
        let assignment: Assignment = serde_json::from_str(json).unwrap();
        assert_eq!(assignment.sort_key, 0);
        assert_eq!(assignment.grading_mode, GradingMode::Submissions);
    }

    #[test]
    fn test_position_display() {
        let assignment = Assignment {
            id: 3,
            name: "hw02".to_string(),
            sort_key: 2,
            grading_mode: GradingMode::Submissions,
        };
        let submission = Submission {
            id: 41,
            grader: None,
            finalized: false,
        };
        let comment = Comment {
            id: 93,
            author: None,
            text: String::new(),
            rubric_comment: None,
        };

        let position = Position::comment(&comment, &assignment, &submission);
        assert_eq!(
            position.to_string(),
            "comment 93 (submission 41, assignment `hw02`)"
        );

        let position = Position::assignment(&assignment);
        assert_eq!(position.to_string(), "assignment 3 (assignment `hw02`)");
    }
}
