use std::process::ExitCode;

use anyhow::{Context, Result};
use argp::FromArgs;
use required_approvals_core::{
    check_required_approvals,
    config::{Config, GitHubConfig},
};
use required_approvals_github::GitHub;
use typed_path::Utf8NativePathBuf;

use crate::{
    cmd::load_requirements,
    context::{PullRequestRef, build_context, pull_request_from_payload},
    util::{arg_or_env, native_path},
};

#[derive(FromArgs, PartialEq, Eq, Debug)]
/// Check the pull request's approvals against the requirements and update the check run.
#[argp(subcommand, name = "check")]
pub struct Args {
    #[argp(option, short = 'r')]
    /// requirements YAML (default: $INPUT_REQUIREMENTS)
    requirements: Option<String>,
    #[argp(option, short = 'f', from_str_fn(native_path))]
    /// read requirements YAML from a file
    requirements_file: Option<Utf8NativePathBuf>,
    #[argp(option)]
    /// GitHub token (default: $INPUT_GITHUB-TOKEN or $GITHUB_TOKEN)
    token: Option<String>,
    #[argp(option)]
    /// GitHub REST API URL (default: $GITHUB_API_URL)
    api_url: Option<String>,
    #[argp(option)]
    /// triggering event name (default: $GITHUB_EVENT_NAME)
    event_name: Option<String>,
    #[argp(option, from_str_fn(native_path))]
    /// triggering event payload (default: $GITHUB_EVENT_PATH)
    event_path: Option<Utf8NativePathBuf>,
    #[argp(option)]
    /// repository as owner/name (default: $GITHUB_REPOSITORY)
    repository: Option<String>,
    #[argp(option)]
    /// name of the running job (default: $GITHUB_JOB)
    job: Option<String>,
    #[argp(option)]
    /// pull request number, instead of reading the event payload
    pull_number: Option<u64>,
    #[argp(option)]
    /// head commit SHA, instead of reading the event payload
    head_sha: Option<String>,
}

pub async fn run(args: Args) -> Result<ExitCode> {
    let config = Config {
        requirements: load_requirements(args.requirements, args.requirements_file.as_ref())?,
        github: GitHubConfig {
            token: arg_or_env(args.token, &[
                "INPUT_GITHUB-TOKEN",
                "INPUT_GITHUB_TOKEN",
                "GITHUB_TOKEN",
            ])
            .context("No GitHub token given (--token or INPUT_GITHUB-TOKEN)")?,
            api_url: arg_or_env(args.api_url, &["GITHUB_API_URL"]),
        },
    };

    let event_name = arg_or_env(args.event_name, &["GITHUB_EVENT_NAME"])
        .context("No event name given (--event-name or GITHUB_EVENT_NAME)")?;
    let repository = arg_or_env(args.repository, &["GITHUB_REPOSITORY"])
        .context("No repository given (--repository or GITHUB_REPOSITORY)")?;
    let job_name =
        arg_or_env(args.job, &["GITHUB_JOB"]).context("No job name given (--job or GITHUB_JOB)")?;
    let pull_request = match (args.pull_number, args.head_sha) {
        (Some(number), Some(head_sha)) => PullRequestRef { number, head_sha },
        (number, head_sha) => {
            let path = match args.event_path {
                Some(path) => path,
                None => Utf8NativePathBuf::from(
                    arg_or_env(None, &["GITHUB_EVENT_PATH"])
                        .context("No event payload given (--event-path or GITHUB_EVENT_PATH)")?,
                ),
            };
            let payload = std::fs::read(path.with_platform_encoding())
                .with_context(|| format!("Failed to read {path}"))?;
            let from_payload = pull_request_from_payload(&payload)
                .with_context(|| format!("Failed to read pull request from {path}"))?;
            PullRequestRef {
                number: number.unwrap_or(from_payload.number),
                head_sha: head_sha.unwrap_or(from_payload.head_sha),
            }
        }
    };
    let ctx = build_context(&event_name, &repository, &job_name, pull_request)?;
    tracing::debug!(
        "Checking {}#{} at {} for {} event",
        ctx.repository,
        ctx.pull_number,
        ctx.head_sha,
        ctx.event
    );

    let github = GitHub::new(&config.github)?;
    let outcome = check_required_approvals(&github, &ctx, &config.requirements).await?;
    if outcome.verdict.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        println!("::error::Required approvals not met for one or more patterns");
        Ok(ExitCode::FAILURE)
    }
}
