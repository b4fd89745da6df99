use std::{collections::HashMap, sync::Mutex};

use anyhow::{Result, anyhow, bail};

use crate::{
    host::Host,
    models::{
        CheckOutput, CheckRun, EventKind, InvocationContext, Repository, Review, ReviewState,
        WorkflowRun,
    },
};

pub fn context() -> InvocationContext { context_for(EventKind::PullRequestReview) }

pub fn context_for(event: EventKind) -> InvocationContext {
    InvocationContext {
        event,
        repository: Repository {
            owner: "mocked-owner-value".to_string(),
            name: "mocked-repo-value".to_string(),
        },
        head_sha: "0123456789abcdef0123456789abcdef01234567".to_string(),
        pull_number: 99,
        job_name: "required-approvals".to_string(),
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Call {
    ListFiles,
    ListReviews,
    ListCompletedCheckRuns,
    FindCheckRun { name: String },
    GetWorkflowRun { run_id: u64 },
    RerunJob { job_id: u64 },
    Create { name: String, output: CheckOutput },
    SetInProgress { check_run_id: u64, output: CheckOutput },
}

impl Call {
    fn is_mutation(&self) -> bool {
        matches!(self, Self::RerunJob { .. } | Self::Create { .. } | Self::SetInProgress { .. })
    }
}

/// In-memory [`Host`] that records every call.
#[derive(Default)]
pub struct FakeHost {
    pub files: Vec<String>,
    pub reviews: Vec<Review>,
    pub existing_check: Option<u64>,
    pub completed_check_runs: Vec<CheckRun>,
    pub workflow_runs: HashMap<u64, EventKind>,
    pub fail_mutations: bool,
    calls: Mutex<Vec<Call>>,
}

impl FakeHost {
    pub fn with_files(mut self, files: &[&str]) -> Self {
        self.files = files.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_approvals(mut self, count: usize) -> Self {
        self.reviews = (0..count)
            .map(|i| Review { author: Some(format!("reviewer{i}")), state: ReviewState::Approved })
            .collect();
        self
    }

    pub fn with_existing_check(mut self, id: u64) -> Self {
        self.existing_check = Some(id);
        self
    }

    pub fn with_completed_check_run(mut self, id: u64, name: &str, html_url: Option<&str>) -> Self {
        self.completed_check_runs.push(CheckRun {
            id,
            name: name.to_string(),
            html_url: html_url.map(str::to_string),
        });
        self
    }

    pub fn with_workflow_run(mut self, run_id: u64, event: EventKind) -> Self {
        self.workflow_runs.insert(run_id, event);
        self
    }

    pub fn failing_mutations(mut self) -> Self {
        self.fail_mutations = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> { self.calls.lock().unwrap().clone() }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    fn record(&self, call: Call) -> Result<()> {
        let is_mutation = call.is_mutation();
        self.calls.lock().unwrap().push(call);
        if is_mutation && self.fail_mutations {
            bail!("HTTP 500 Internal Server Error");
        }
        Ok(())
    }
}

impl Host for FakeHost {
    async fn list_changed_files(&self, _ctx: &InvocationContext) -> Result<Vec<String>> {
        self.record(Call::ListFiles)?;
        Ok(self.files.clone())
    }

    async fn list_reviews(&self, _ctx: &InvocationContext) -> Result<Vec<Review>> {
        self.record(Call::ListReviews)?;
        Ok(self.reviews.clone())
    }

    async fn list_completed_check_runs(&self, _ctx: &InvocationContext) -> Result<Vec<CheckRun>> {
        self.record(Call::ListCompletedCheckRuns)?;
        Ok(self.completed_check_runs.clone())
    }

    async fn find_check_run(
        &self,
        _ctx: &InvocationContext,
        name: &str,
    ) -> Result<Option<CheckRun>> {
        self.record(Call::FindCheckRun { name: name.to_string() })?;
        Ok(self.existing_check.map(|id| CheckRun {
            id,
            name: name.to_string(),
            html_url: None,
        }))
    }

    async fn get_workflow_run(&self, _ctx: &InvocationContext, run_id: u64) -> Result<WorkflowRun> {
        self.record(Call::GetWorkflowRun { run_id })?;
        let event = self
            .workflow_runs
            .get(&run_id)
            .cloned()
            .ok_or_else(|| anyhow!("HTTP 404 Not Found: workflow run {run_id}"))?;
        Ok(WorkflowRun { id: run_id, event })
    }

    async fn rerun_job(&self, _ctx: &InvocationContext, job_id: u64) -> Result<()> {
        self.record(Call::RerunJob { job_id })
    }

    async fn create_completed_check_run(
        &self,
        _ctx: &InvocationContext,
        name: &str,
        output: &CheckOutput,
    ) -> Result<()> {
        self.record(Call::Create { name: name.to_string(), output: output.clone() })
    }

    async fn set_check_run_in_progress(
        &self,
        _ctx: &InvocationContext,
        check_run_id: u64,
        output: &CheckOutput,
    ) -> Result<()> {
        self.record(Call::SetInProgress { check_run_id, output: output.clone() })
    }
}
