//! Conversions from octocrab's REST models into the engine's models.

use octocrab::{
    models::{checks, pulls, workflows},
    params::checks::CheckRunOutput,
};
use required_approvals_core::models::{CheckOutput, CheckRun, EventKind, Review, ReviewState};

pub fn review(value: pulls::Review) -> Review {
    let state = match value.state {
        Some(pulls::ReviewState::Approved) => ReviewState::Approved,
        Some(pulls::ReviewState::ChangesRequested) => ReviewState::ChangesRequested,
        Some(pulls::ReviewState::Commented) => ReviewState::Commented,
        Some(pulls::ReviewState::Dismissed) => ReviewState::Dismissed,
        Some(pulls::ReviewState::Pending) => ReviewState::Pending,
        Some(other) => ReviewState::Other(format!("{other:?}")),
        None => ReviewState::Other(String::new()),
    };
    Review { author: value.user.map(|user| user.login), state }
}

pub fn check_run(value: checks::CheckRun) -> CheckRun {
    CheckRun { id: value.id.into_inner(), name: value.name, html_url: value.html_url }
}

pub fn workflow_run(value: workflows::Run) -> required_approvals_core::models::WorkflowRun {
    required_approvals_core::models::WorkflowRun {
        id: value.id.into_inner(),
        event: EventKind::from(value.event.as_str()),
    }
}

pub fn check_run_output(value: &CheckOutput) -> CheckRunOutput {
    CheckRunOutput {
        title: value.title.clone(),
        summary: value.summary.clone(),
        text: None,
        annotations: vec![],
        images: vec![],
    }
}
