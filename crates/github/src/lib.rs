pub mod models;

use anyhow::{Context, Result};
use chrono::Utc;
use octocrab::{
    Octocrab,
    models::{CheckRunId, RunId},
    params::{
        checks::{CheckRunConclusion, CheckRunStatus},
        repos::Commitish,
    },
};
use required_approvals_core::{
    config::GitHubConfig,
    host::Host,
    models::{CheckOutput, CheckRun, InvocationContext, Review, WorkflowRun},
};

const PER_PAGE: u8 = 100;

/// [`Host`] backed by the GitHub REST API.
#[derive(Clone)]
pub struct GitHub {
    pub client: Octocrab,
}

impl GitHub {
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(config.token.clone());
        if let Some(api_url) = &config.api_url {
            builder = builder
                .base_uri(api_url.as_str())
                .with_context(|| format!("Invalid GitHub API URL '{api_url}'"))?;
        }
        let client = builder.build().context("Failed to create GitHub client")?;
        Ok(Self { client })
    }

    /// Check runs on the head commit. The response is an object with a
    /// `total_count`, so it is paged by hand rather than with `all_pages`.
    async fn list_check_runs(
        &self,
        ctx: &InvocationContext,
        completed_only: bool,
    ) -> Result<Vec<CheckRun>> {
        let checks = self.client.checks(&ctx.repository.owner, &ctx.repository.name);
        let mut check_runs = vec![];
        let mut page = 1u32;
        loop {
            let mut builder = checks
                .list_check_runs_for_git_ref(Commitish(ctx.head_sha.clone()))
                .per_page(PER_PAGE)
                .page(page);
            if completed_only {
                builder = builder.status(CheckRunStatus::Completed);
            }
            let result = builder.send().await?;
            if result.check_runs.is_empty() {
                break;
            }
            check_runs.extend(result.check_runs.into_iter().map(models::check_run));
            if check_runs.len() as u64 >= result.total_count as u64 {
                break;
            }
            page += 1;
        }
        Ok(check_runs)
    }
}

impl Host for GitHub {
    async fn list_changed_files(&self, ctx: &InvocationContext) -> Result<Vec<String>> {
        let first = self
            .client
            .pulls(&ctx.repository.owner, &ctx.repository.name)
            .list_files(ctx.pull_number)
            .await?;
        let files = self.client.all_pages(first).await?;
        tracing::debug!("Pull request #{} changes {} files", ctx.pull_number, files.len());
        Ok(files.into_iter().map(|f| f.filename).collect())
    }

    async fn list_reviews(&self, ctx: &InvocationContext) -> Result<Vec<Review>> {
        let first = self
            .client
            .pulls(&ctx.repository.owner, &ctx.repository.name)
            .list_reviews(ctx.pull_number)
            .per_page(PER_PAGE)
            .send()
            .await?;
        let reviews = self.client.all_pages(first).await?;
        Ok(reviews.into_iter().map(models::review).collect())
    }

    async fn list_completed_check_runs(&self, ctx: &InvocationContext) -> Result<Vec<CheckRun>> {
        let check_runs = self.list_check_runs(ctx, true).await?;
        for check_run in &check_runs {
            tracing::debug!(
                "Check run {} {:?} ({})",
                check_run.id,
                check_run.name,
                check_run.html_url.as_deref().unwrap_or("[no url]")
            );
        }
        Ok(check_runs)
    }

    async fn find_check_run(
        &self,
        ctx: &InvocationContext,
        name: &str,
    ) -> Result<Option<CheckRun>> {
        let result = self
            .client
            .checks(&ctx.repository.owner, &ctx.repository.name)
            .list_check_runs_for_git_ref(Commitish(ctx.head_sha.clone()))
            .check_name(name)
            .per_page(1u8)
            .page(1u32)
            .send()
            .await?;
        Ok(result.check_runs.into_iter().next().map(models::check_run))
    }

    async fn get_workflow_run(&self, ctx: &InvocationContext, run_id: u64) -> Result<WorkflowRun> {
        let run = self
            .client
            .workflows(&ctx.repository.owner, &ctx.repository.name)
            .get(RunId(run_id))
            .await?;
        tracing::debug!("Workflow run {} was triggered by {}", run.id, run.event);
        Ok(models::workflow_run(run))
    }

    async fn rerun_job(&self, ctx: &InvocationContext, job_id: u64) -> Result<()> {
        let route = format!(
            "/repos/{}/{}/actions/jobs/{job_id}/rerun",
            ctx.repository.owner, ctx.repository.name
        );
        let uri = http::Uri::builder()
            .path_and_query(route.as_str())
            .build()
            .with_context(|| format!("Invalid route {route}"))?;
        // The response body is empty, so it can't go through `Octocrab::post`.
        let response = self.client._post(uri, None::<&()>).await?;
        octocrab::map_github_error(response).await?;
        Ok(())
    }

    async fn create_completed_check_run(
        &self,
        ctx: &InvocationContext,
        name: &str,
        output: &CheckOutput,
    ) -> Result<()> {
        let now = Utc::now();
        let check_run = self
            .client
            .checks(&ctx.repository.owner, &ctx.repository.name)
            .create_check_run(name, ctx.head_sha.as_str())
            .status(CheckRunStatus::Completed)
            .conclusion(CheckRunConclusion::Success)
            .started_at(now)
            .completed_at(now)
            .output(models::check_run_output(output))
            .send()
            .await?;
        tracing::debug!("Created check run {} ({})", check_run.id.into_inner(), output.title);
        Ok(())
    }

    async fn set_check_run_in_progress(
        &self,
        ctx: &InvocationContext,
        check_run_id: u64,
        output: &CheckOutput,
    ) -> Result<()> {
        self.client
            .checks(&ctx.repository.owner, &ctx.repository.name)
            .update_check_run(CheckRunId(check_run_id))
            .status(CheckRunStatus::InProgress)
            .started_at(Utc::now())
            .output(models::check_run_output(output))
            .send()
            .await?;
        Ok(())
    }
}
