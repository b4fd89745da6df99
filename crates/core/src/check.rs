//! The approval check run on the pull request's head commit.
//!
//! | observed | verdict      | action                               |
//! | -------- | ------------ | ------------------------------------ |
//! | any      | passed/grace | create a completed, successful check |
//! | absent   | failed       | nothing                              |
//! | existing | failed       | update it to `in_progress`           |

use anyhow::{Context, Result};

use crate::{
    host::Host,
    models::{CheckOutput, EventKind, InvocationContext},
    policy::Evaluation,
};

pub const CHECK_NAME: &str = "Required number of approvals met";

/// The terminal outcome of an invocation.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Verdict {
    /// A pull request event arrived before anyone reviewed.
    NoReviewsYet,
    Passed,
    Failed,
}

impl Verdict {
    pub fn is_success(self) -> bool { !matches!(self, Self::Failed) }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum CheckPlan {
    /// Create a completed, successful check run.
    Complete(CheckOutput),
    /// Move an existing check run to `in_progress`, if there is one.
    MarkInProgress(CheckOutput),
}

/// What reconciliation did to the check run.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Reconciled {
    Created,
    Updated { check_run_id: u64 },
    /// Failing, and no check run existed to update.
    Absent,
}

/// Decides the verdict and the check run transition.
pub fn plan(
    event: &EventKind,
    review_count: usize,
    evaluation: &Evaluation,
) -> (Verdict, CheckPlan) {
    if *event == EventKind::PullRequest && review_count == 0 {
        return (
            Verdict::NoReviewsYet,
            CheckPlan::Complete(CheckOutput {
                title: "No reviews yet".to_string(),
                summary: "No reviews have been submitted yet.".to_string(),
            }),
        );
    }
    let title = evaluation.approvals_title();
    if evaluation.is_satisfied() {
        (
            Verdict::Passed,
            CheckPlan::Complete(CheckOutput {
                title,
                summary: "All required approvals have been met.".to_string(),
            }),
        )
    } else {
        (
            Verdict::Failed,
            CheckPlan::MarkInProgress(CheckOutput {
                title,
                summary: format!(
                    "{} approvals are required, but only {} were found.",
                    evaluation.max_approvals_required, evaluation.approvals
                ),
            }),
        )
    }
}

/// Applies `plan` to the check run on the head commit. Issues at most one
/// create or update call.
pub async fn reconcile<H: Host>(
    host: &H,
    ctx: &InvocationContext,
    plan: &CheckPlan,
) -> Result<Reconciled> {
    match plan {
        CheckPlan::Complete(output) => {
            host.create_completed_check_run(ctx, CHECK_NAME, output)
                .await
                .with_context(|| format!("Failed to create check run on {}", ctx.head_sha))?;
            Ok(Reconciled::Created)
        }
        CheckPlan::MarkInProgress(output) => {
            let existing = host
                .find_check_run(ctx, CHECK_NAME)
                .await
                .with_context(|| format!("Failed to look up check run on {}", ctx.head_sha))?;
            let Some(check_run) = existing else {
                tracing::debug!("No existing check run on {}, leaving it absent", ctx.head_sha);
                return Ok(Reconciled::Absent);
            };
            tracing::info!("Setting existing check to in_progress");
            host.set_check_run_in_progress(ctx, check_run.id, output)
                .await
                .with_context(|| format!("Failed to update check run {}", check_run.id))?;
            Ok(Reconciled::Updated { check_run_id: check_run.id })
        }
    }
}
