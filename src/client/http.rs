//! HTTP implementation of the gradebook client.
//!
//! Talks to the platform's REST API with bearer authentication. Listing
//! endpoints return DRF-style envelopes: a `results` array plus a `next`
//! URL that doubles as the pagination cursor.

use crate::client::{ClientError, Cursor, GradebookClient, Page};
use crate::models::{Assignment, Comment, Course, GradingMode, Submission, Workspace};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Wire envelope for paginated listings.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct PagedResponse<T> {
    #[serde(default)]
    results: Vec<T>,
    #[serde(default)]
    next: Option<String>,
}

/// Gradebook client over the platform's HTTP API.
pub struct HttpGradebook {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpGradebook {
    /// Build a client for `base_url`, authenticating with `api_key`.
    pub fn new(base_url: &str, api_key: &str, timeout_seconds: u64) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: api_key.to_string(),
        })
    }

    fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClientError::Auth);
        }
        if !status.is_success() {
            return Err(ClientError::Status {
                status,
                url: response.url().to_string(),
            });
        }
        Ok(response)
    }

    /// Fetch one page of `path`. A cursor, when present, is the absolute
    /// `next` URL from the previous page.
    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        cursor: Option<Cursor>,
    ) -> Result<Page<T>, ClientError> {
        let url = match cursor {
            Some(next) => next,
            None => format!("{}{}", self.base_url, path),
        };
        debug!("GET {}", url);

        let response = self.http.get(&url).bearer_auth(&self.token).send().await?;
        let response = Self::ensure_success(response)?;
        let body: PagedResponse<T> = response.json().await?;

        Ok(Page {
            items: body.results,
            next: body.next,
        })
    }
}

#[async_trait]
impl GradebookClient for HttpGradebook {
    async fn find_course(&self, name: &str, period: &str) -> Result<Course, ClientError> {
        let url = format!("{}/courses/", self.base_url);
        debug!("GET {} (name={}, period={})", url, name, period);

        let response = self
            .http
            .get(&url)
            .query(&[("name", name), ("period", period)])
            .bearer_auth(&self.token)
            .send()
            .await?;
        let response = Self::ensure_success(response)?;
        let body: PagedResponse<Course> = response.json().await?;

        body.results
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::CourseNotFound {
                name: name.to_string(),
                period: period.to_string(),
            })
    }

    async fn assignments(
        &self,
        course: &Course,
        cursor: Option<Cursor>,
    ) -> Result<Page<Assignment>, ClientError> {
        self.get_page(&format!("/courses/{}/assignments/", course.id), cursor)
            .await
    }

    async fn workspaces(
        &self,
        assignment: &Assignment,
        cursor: Option<Cursor>,
    ) -> Result<Page<Workspace>, ClientError> {
        match assignment.grading_mode {
            GradingMode::Submissions => {
                let page: Page<Submission> = self
                    .get_page(&format!("/assignments/{}/submissions/", assignment.id), cursor)
                    .await?;
                Ok(Page {
                    items: page.items.into_iter().map(Workspace::Submission).collect(),
                    next: page.next,
                })
            }
            GradingMode::Rooms => {
                let page: Page<crate::models::Room> = self
                    .get_page(&format!("/assignments/{}/rooms/", assignment.id), cursor)
                    .await?;
                Ok(Page {
                    items: page.items.into_iter().map(Workspace::Room).collect(),
                    next: page.next,
                })
            }
        }
    }

    async fn comments(
        &self,
        submission: &Submission,
        cursor: Option<Cursor>,
    ) -> Result<Page<Comment>, ClientError> {
        self.get_page(&format!("/submissions/{}/comments/", submission.id), cursor)
            .await
    }
}
