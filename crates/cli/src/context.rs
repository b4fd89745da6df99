use anyhow::{Context, Result};
use required_approvals_core::models::{EventKind, InvocationContext, Repository};
use serde::Deserialize;

#[derive(Deserialize)]
struct EventPayload {
    pull_request: Option<PullRequestPayload>,
}

#[derive(Deserialize)]
struct PullRequestPayload {
    number: u64,
    head: HeadPayload,
}

#[derive(Deserialize)]
struct HeadPayload {
    sha: String,
}

/// Pull request number and head commit of the triggering event.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PullRequestRef {
    pub number: u64,
    pub head_sha: String,
}

/// Reads the pull request out of a webhook event payload.
pub fn pull_request_from_payload(payload: &[u8]) -> Result<PullRequestRef> {
    let payload: EventPayload =
        serde_json::from_slice(payload).context("Failed to parse event payload")?;
    let pull_request =
        payload.pull_request.context("Event payload has no pull_request, nothing to check")?;
    Ok(PullRequestRef { number: pull_request.number, head_sha: pull_request.head.sha })
}

pub fn build_context(
    event_name: &str,
    repository: &str,
    job_name: &str,
    pull_request: PullRequestRef,
) -> Result<InvocationContext> {
    let repository: Repository = repository.parse()?;
    Ok(InvocationContext {
        event: EventKind::from(event_name),
        repository,
        head_sha: pull_request.head_sha,
        pull_number: pull_request.number,
        job_name: job_name.to_string(),
    })
}
