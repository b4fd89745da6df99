pub mod check;
pub mod config;
pub mod host;
pub mod models;
pub mod policy;
pub mod recheck;
#[cfg(test)]
mod test_util;

use anyhow::{Context, Result};

use crate::{
    check::{Reconciled, Verdict, plan, reconcile},
    config::Requirement,
    host::Host,
    models::{EventKind, InvocationContext},
    policy::{count_approvals, evaluate},
    recheck::{RecheckOutcome, trigger_recheck},
};

/// Everything one invocation decided and did.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub verdict: Verdict,
    pub approvals: u32,
    pub max_approvals_required: u32,
    /// One line per unmet requirement, in configuration order.
    pub unmet: Vec<String>,
    pub check: Reconciled,
    /// Set when a review event looked for a stale `pull_request` run.
    pub recheck: Option<RecheckOutcome>,
}

/// Runs the approval check for one pull request event.
///
/// Files and reviews are fetched once up front. On review events, the earlier
/// `pull_request` run of this job is re-run before evaluating.
pub async fn check_required_approvals<H: Host>(
    host: &H,
    ctx: &InvocationContext,
    requirements: &[Requirement],
) -> Result<Outcome> {
    let files = host.list_changed_files(ctx).await.with_context(|| {
        format!("Failed to fetch changed files for pull request #{}", ctx.pull_number)
    })?;
    let reviews = host
        .list_reviews(ctx)
        .await
        .with_context(|| format!("Failed to fetch reviews for pull request #{}", ctx.pull_number))?;

    tracing::info!("Found {} reviews.", reviews.len());
    for review in &reviews {
        tracing::info!("- {}: ({})", review.author.as_deref().unwrap_or("[unknown]"), review.state);
    }

    let recheck = if ctx.event == EventKind::PullRequestReview {
        tracing::info!("Pull request review event, re-running pull_request check.");
        Some(trigger_recheck(host, ctx).await?)
    } else {
        None
    };

    let approvals = count_approvals(&reviews);
    let evaluation = evaluate(requirements, &files, approvals);
    let (verdict, check_plan) = plan(&ctx.event, reviews.len(), &evaluation);
    let unmet = match verdict {
        Verdict::NoReviewsYet => vec![],
        Verdict::Passed | Verdict::Failed => evaluation.unmet_messages(),
    };
    for line in &unmet {
        tracing::info!("{line}");
    }

    let check = reconcile(host, ctx, &check_plan).await?;
    match verdict {
        Verdict::NoReviewsYet => {
            tracing::info!("No reviews yet, skipping check so the PR gets a green tick.")
        }
        Verdict::Passed => tracing::info!("All checks passed!"),
        Verdict::Failed => {}
    }

    Ok(Outcome {
        verdict,
        approvals,
        max_approvals_required: evaluation.max_approvals_required,
        unmet,
        check,
        recheck,
    })
}
