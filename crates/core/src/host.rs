use anyhow::Result;

use crate::models::{CheckOutput, CheckRun, InvocationContext, Review, WorkflowRun};

/// The hosting platform: queries and mutations on the pull request, its head
/// commit's check runs, and workflow runs.
///
/// Every call is a network round trip; failures propagate unchanged.
#[allow(async_fn_in_trait)]
pub trait Host {
    /// Paths of all files changed by the pull request.
    async fn list_changed_files(&self, ctx: &InvocationContext) -> Result<Vec<String>>;

    async fn list_reviews(&self, ctx: &InvocationContext) -> Result<Vec<Review>>;

    /// Completed check runs on the head commit, in listing order.
    async fn list_completed_check_runs(&self, ctx: &InvocationContext) -> Result<Vec<CheckRun>>;

    /// The first check run on the head commit with the given name, in any status.
    async fn find_check_run(&self, ctx: &InvocationContext, name: &str)
    -> Result<Option<CheckRun>>;

    async fn get_workflow_run(&self, ctx: &InvocationContext, run_id: u64) -> Result<WorkflowRun>;

    async fn rerun_job(&self, ctx: &InvocationContext, job_id: u64) -> Result<()>;

    /// Creates a completed, successful check run on the head commit.
    async fn create_completed_check_run(
        &self,
        ctx: &InvocationContext,
        name: &str,
        output: &CheckOutput,
    ) -> Result<()>;

    /// Moves an existing check run back to `in_progress`.
    async fn set_check_run_in_progress(
        &self,
        ctx: &InvocationContext,
        check_run_id: u64,
        output: &CheckOutput,
    ) -> Result<()>;
}
