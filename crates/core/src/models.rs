use std::{fmt, str::FromStr};

use anyhow::{Context, Result};

/// The kind of event that started this invocation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum EventKind {
    PullRequest,
    PullRequestReview,
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::PullRequest => "pull_request",
            Self::PullRequestReview => "pull_request_review",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for EventKind {
    fn from(value: &str) -> Self {
        match value {
            "pull_request" => Self::PullRequest,
            "pull_request_review" => Self::PullRequestReview,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl FromStr for Repository {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, name) = s
            .split_once('/')
            .filter(|(owner, name)| !owner.is_empty() && !name.is_empty() && !name.contains('/'))
            .with_context(|| format!("Invalid repository '{s}', expected owner/name"))?;
        Ok(Self { owner: owner.to_string(), name: name.to_string() })
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Everything an invocation knows about the event that triggered it.
///
/// Built once at the process boundary and passed by reference to every
/// component, so nothing below reads ambient state.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InvocationContext {
    pub event: EventKind,
    pub repository: Repository,
    /// Head commit of the pull request.
    pub head_sha: String,
    pub pull_number: u64,
    /// Name of the job running this invocation. Earlier runs of the same job
    /// show up as check runs with this name.
    pub job_name: String,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
    Pending,
    Other(String),
}

impl ReviewState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Approved => "APPROVED",
            Self::ChangesRequested => "CHANGES_REQUESTED",
            Self::Commented => "COMMENTED",
            Self::Dismissed => "DISMISSED",
            Self::Pending => "PENDING",
            Self::Other(state) => state,
        }
    }
}

impl From<&str> for ReviewState {
    fn from(value: &str) -> Self {
        match value {
            "APPROVED" => Self::Approved,
            "CHANGES_REQUESTED" => Self::ChangesRequested,
            "COMMENTED" => Self::Commented,
            "DISMISSED" => Self::Dismissed,
            "PENDING" => Self::Pending,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ReviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Review {
    pub author: Option<String>,
    pub state: ReviewState,
}

/// A check run as listed on a commit.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CheckRun {
    pub id: u64,
    pub name: String,
    /// Detail page of the check run. For Actions jobs this is the job page,
    /// which is the only place the run and job ids are exposed.
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct WorkflowRun {
    pub id: u64,
    pub event: EventKind,
}

/// Title and summary shown on a check run.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CheckOutput {
    pub title: String,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind() {
        let cases: &[(&str, EventKind)] = &[
            ("pull_request", EventKind::PullRequest),
            ("pull_request_review", EventKind::PullRequestReview),
            ("pull_request_target", EventKind::Other("pull_request_target".to_string())),
            ("push", EventKind::Other("push".to_string())),
        ];
        for (name, expected) in cases {
            let kind = EventKind::from(*name);
            assert_eq!(&kind, expected);
            assert_eq!(kind.as_str(), *name);
        }
    }

    #[test]
    fn test_parse_repository() {
        let repo: Repository = "octo/hello-world".parse().unwrap();
        assert_eq!(repo.owner, "octo");
        assert_eq!(repo.name, "hello-world");
        assert_eq!(repo.to_string(), "octo/hello-world");
        for invalid in ["octo", "/hello", "octo/", "octo/hello/world"] {
            assert!(invalid.parse::<Repository>().is_err(), "{invalid} should not parse");
        }
    }

    #[test]
    fn test_review_state() {
        assert_eq!(ReviewState::from("APPROVED"), ReviewState::Approved);
        assert_eq!(ReviewState::from("CHANGES_REQUESTED"), ReviewState::ChangesRequested);
        assert_eq!(ReviewState::from("approved"), ReviewState::Other("approved".to_string()));
    }
}
