//! Re-running the pull request's earlier approval job after a review.
//!
//! A review event runs this job again, but the check run created by the
//! `pull_request` run stays stale until that job runs again too. Nothing in
//! the check run API exposes the workflow run or job behind a check run, so
//! both ids are scraped from the check run's detail page URL
//! (`.../actions/runs/<run id>/job/<job id>`). This breaks if GitHub changes
//! that URL shape.

use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::{
    host::Host,
    models::{EventKind, InvocationContext},
};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RecheckOutcome {
    Rerun { run_id: u64, job_id: u64 },
    /// The `pull_request` run was found, but its job id was not.
    MissingJobId { run_id: u64 },
    NothingToRerun,
}

pub fn extract_run_id(url: &str) -> Option<u64> {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = REGEX.get_or_init(|| Regex::new(r"/runs/(\d+)/").unwrap());
    regex.captures(url)?.get(1)?.as_str().parse().ok()
}

pub fn extract_job_id(url: &str) -> Option<u64> {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = REGEX.get_or_init(|| Regex::new(r"/job/(\d+)").unwrap());
    regex.captures(url)?.get(1)?.as_str().parse().ok()
}

/// Finds the earlier `pull_request` run of this job on the head commit and
/// re-runs it. Only the first such run is considered.
pub async fn trigger_recheck<H: Host>(host: &H, ctx: &InvocationContext) -> Result<RecheckOutcome> {
    let check_runs = host
        .list_completed_check_runs(ctx)
        .await
        .with_context(|| format!("Failed to list check runs on {}", ctx.head_sha))?;
    tracing::debug!("Found {} completed check runs on {}", check_runs.len(), ctx.head_sha);

    for check_run in check_runs.iter().filter(|c| c.name == ctx.job_name) {
        let url = check_run.html_url.as_deref().unwrap_or_default();
        let Some(run_id) = extract_run_id(url) else {
            tracing::warn!("Could not find a run_id for check run {}", check_run.id);
            continue;
        };

        let workflow_run = host
            .get_workflow_run(ctx, run_id)
            .await
            .with_context(|| format!("Failed to fetch workflow run {run_id}"))?;
        if workflow_run.event != EventKind::PullRequest {
            tracing::info!(
                "Workflow run {} is not a pull_request event ({}), skipping.",
                workflow_run.id,
                workflow_run.event
            );
            continue;
        }

        let Some(job_id) = extract_job_id(url) else {
            tracing::warn!("Could not find a job_id for check run {}", check_run.id);
            return Ok(RecheckOutcome::MissingJobId { run_id });
        };
        tracing::info!("Re-running pull_request job {} to update status", job_id);
        host.rerun_job(ctx, job_id)
            .await
            .with_context(|| format!("Failed to re-run job {job_id}"))?;
        return Ok(RecheckOutcome::Rerun { run_id, job_id });
    }

    Ok(RecheckOutcome::NothingToRerun)
}
